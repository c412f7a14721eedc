#[cfg(test)]
mod common {
    use image::{DynamicImage, RgbaImage};

    pub fn scan(canvas: &RgbaImage) -> Vec<String> {
        let luma = DynamicImage::ImageRgba8(canvas.clone()).to_luma8();
        let mut img = rqrr::PreparedImage::prepare_from_greyscale(
            luma.width() as usize,
            luma.height() as usize,
            |x, y| luma.get_pixel(x as u32, y as u32).0[0],
        );
        img.detect_grids()
            .iter()
            .filter_map(|g| g.decode().ok())
            .map(|(_, content)| content)
            .collect()
    }
}

#[cfg(test)]
mod style_proptests {
    use prop::string::string_regex;
    use proptest::prelude::*;

    use qrstyle::*;

    use super::common::scan;

    static BYTE_CAPACITY_H: [usize; 40] = [
        7, 14, 24, 34, 44, 58, 64, 84, 98, 119, 137, 155, 177, 194, 220, 250, 280, 310, 338, 382,
        403, 439, 461, 511, 535, 593, 625, 658, 698, 742, 790, 842, 898, 958, 983, 1051, 1093, 1139,
        1219, 1273,
    ];

    fn gradient_strategy() -> BoxedStrategy<Gradient> {
        prop_oneof![
            Just(Gradient::from_hex("rb", &["#FF0000", "#0000FF"]).unwrap()),
            Just(Gradient::from_hex("dark", &["#000000", "#333333", "#1a237e"]).unwrap()),
            Just(Gradient::from_hex("green", &["#004d40"]).unwrap()),
        ]
        .boxed()
    }

    proptest! {
        #[test]
        fn proptest_matrix_size(len in 1usize..=1273) {
            let payload = "a".repeat(len);
            let m = encode(&payload, ECLevel::H).unwrap();
            let ver = BYTE_CAPACITY_H.iter().position(|&cap| len <= cap).unwrap() + 1;
            prop_assert_eq!(*m.version(), ver);
            prop_assert_eq!(m.width(), 17 + 4 * ver);
            prop_assert_eq!(m.rows().count(), m.width());
        }

        #[test]
        fn proptest_deterministic(payload in "[ -~]{1,200}") {
            let a = encode(&payload, ECLevel::H).unwrap();
            let b = encode(&payload, ECLevel::H).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        #[ignore]
        fn proptest_gradient_scan(
            payload in string_regex(r"[ -~]{1,120}").unwrap(),
            gradient in gradient_strategy(),
        ) {
            let styled = QRStyler::new(payload.clone()).gradient(gradient).render().unwrap();
            prop_assert_eq!(scan(&styled.canvas), vec![payload]);
        }
    }
}

#[cfg(test)]
mod style_tests {
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    use qrstyle::{
        style::colorize::{diagonal_position, is_dark},
        Glyph, Gradient, ImageSource, OutputFormat, OverlayContent, Platform, QRError, QRStyler,
        Rgb, Session,
    };

    use super::common::scan;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn solid_coverage() -> GrayImage {
        GrayImage::from_pixel(16, 16, Luma([255]))
    }

    fn red_blue() -> Gradient {
        Gradient::from_hex("rb", &["#FF0000", "#0000FF"]).unwrap()
    }

    #[test]
    fn test_solid_scan() {
        let styled = QRStyler::new("Hello World").render().unwrap();
        assert!(styled.warnings.is_empty());
        assert_eq!(styled.canvas.dimensions(), (400, 400));
        assert_eq!(scan(&styled.canvas), ["Hello World"]);
    }

    #[test]
    fn test_gradient_scan() {
        let styled = QRStyler::new("Hello World").gradient(red_blue()).render().unwrap();
        assert_eq!(scan(&styled.canvas), ["Hello World"]);
    }

    #[test]
    fn test_gradient_shifts_red_to_blue() {
        let plain = QRStyler::new("Hello World").render().unwrap();
        let styled = QRStyler::new("Hello World").gradient(red_blue()).render().unwrap();
        for (x, y, p) in plain.canvas.enumerate_pixels() {
            let q = *styled.canvas.get_pixel(x, y);
            if !is_dark(p, 128) {
                assert_eq!(q, WHITE, "light pixel recolored at ({x}, {y})");
                continue;
            }
            let t = diagonal_position(x, y, 400, 400);
            if t < 0.4 {
                assert!(q.0[0] > q.0[2], "expected reddish at ({x}, {y}): {q:?}");
            } else if t > 0.6 {
                assert!(q.0[2] > q.0[0], "expected bluish at ({x}, {y}): {q:?}");
            }
        }
    }

    #[test]
    fn test_gradient_with_logo_scan() {
        let payload = "https://example.com/styled-qr-code-overlay";
        let logo = RgbaImage::from_fn(64, 64, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgba([200, 30, 90, 255])
            } else {
                Rgba([20, 20, 20, 255])
            }
        });
        let styled = QRStyler::new(payload)
            .gradient(red_blue())
            .overlay(OverlayContent::Image(ImageSource::Decoded(DynamicImage::ImageRgba8(logo))))
            .render()
            .unwrap();
        assert!(styled.warnings.is_empty());
        assert_eq!(scan(&styled.canvas), [payload]);
    }

    #[test]
    fn test_glyph_scan() {
        let payload = "https://www.linkedin.com/in/someone";
        let glyph = Glyph::new(Platform::LinkedIn, solid_coverage());
        let styled = QRStyler::new(payload).overlay(OverlayContent::Glyph(glyph)).render().unwrap();
        assert_eq!(scan(&styled.canvas), [payload]);
    }

    #[test]
    fn test_oversized_overlay_keeps_code_scannable() {
        let glyph = Glyph::new(Platform::Instagram, solid_coverage());
        let styled = QRStyler::new("Hello World")
            .quiet_zone(30)
            .overlay(OverlayContent::Glyph(glyph))
            .render()
            .unwrap();
        assert!(matches!(styled.warnings[..], [QRError::Overlay(_)]));
        assert_eq!(scan(&styled.canvas), ["Hello World"]);
    }

    #[test]
    fn test_solid_gray_image_palette() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255])));
        let styled = QRStyler::new("Hello World").palette_image(img).render().unwrap();
        let gray = Rgb([128, 128, 128]);
        assert_eq!(styled.palette.primary, gray);
        assert_eq!(styled.palette.secondary, gray);
        assert_eq!(styled.palette.background, Rgb::WHITE);
        assert!(styled.warnings.is_empty());
    }

    #[test]
    fn test_missing_logo_reports_once() {
        let plain = QRStyler::new("Hello World").render().unwrap();
        let styled = QRStyler::new("Hello World")
            .overlay(OverlayContent::Image(ImageSource::Path("https/404/logo.png".into())))
            .render()
            .unwrap();
        assert_eq!(styled.canvas, plain.canvas);
        let overlay_errors =
            styled.warnings.iter().filter(|e| matches!(e, QRError::Overlay(_))).count();
        assert_eq!(overlay_errors, 1);
        assert_eq!(scan(&styled.canvas), ["Hello World"]);
    }

    #[test]
    fn test_encoding_errors_block_generation() {
        assert_eq!(QRStyler::new("").render().unwrap_err(), QRError::EmptyData);
        let long = "x".repeat(1274);
        assert_eq!(QRStyler::new(long).render().unwrap_err(), QRError::DataTooLong);
    }

    #[test]
    fn test_png_output_round_trip() {
        let styled = QRStyler::new("Hello World").render().unwrap();
        let bytes = styled.to_image_bytes(OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, styled.canvas);
        assert_eq!(scan(&decoded), ["Hello World"]);
    }

    #[test]
    fn test_session_keeps_newest_render() {
        let session = Session::new();
        let stale = session.begin();
        let fresh = session.begin();
        assert!(session.submit(fresh, QRStyler::new("fresh").render().unwrap()));
        assert!(!session.submit(stale, QRStyler::new("stale").render().unwrap()));
        let latest = session.latest().unwrap();
        assert_eq!(scan(&latest.canvas), ["fresh"]);
    }
}
