use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use image::{Rgba, RgbaImage};
use qrstyle::{
    style::file_name, Gradient, ImageSource, OutputFormat, OverlayContent, QRStyler,
};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "https://example.com/this-qr-code-has-a-gradient-and-a-logo";

    // Stand-in logo: a red disc on transparent background
    let logo = RgbaImage::from_fn(64, 64, |x, y| {
        let (dx, dy) = (x as i32 - 32, y as i32 - 32);
        if dx * dx + dy * dy < 28 * 28 {
            Rgba([220, 40, 60, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });

    let styled = QRStyler::new(data)
        .gradient(Gradient::presets().remove(0)) // Ocean Blue
        .overlay(OverlayContent::Image(ImageSource::Decoded(logo.into())))
        .size(400) // Canvas side in pixels - defaults to 400
        .render()?;

    for warning in &styled.warnings {
        println!("Styled with fallback: {warning}");
    }

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let name = file_name(ts);
    std::fs::write(&name, styled.to_image_bytes(OutputFormat::Png)?)?;

    println!("Styled QR code saved to: {name}");
    println!("Version: {}, Palette: {:?}", *styled.version, styled.palette);

    Ok(())
}
