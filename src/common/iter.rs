use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs right to left in a zig-zag, alternating upward & downward,
// skipping the vertical timing column. Yields every module; callers skip the
// ones already taken by function patterns.
#[derive(Clone)]
pub struct EncRegionIter {
    // Right column of the current pair
    right: i32,
    // Step along the current column pair
    vert: i32,
    // Column offset within the pair
    j: i32,
    w: i32,
}

impl EncRegionIter {
    pub fn new(ver: Version) -> Self {
        let w = ver.width() as i32;
        Self { right: w - 1, vert: 0, j: 0, w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.right < 1 {
            return None;
        }

        let x = self.right - self.j;
        let upward = (self.right + 1) & 2 == 0;
        let y = if upward { self.w - 1 - self.vert } else { self.vert };

        self.j += 1;
        if self.j == 2 {
            self.j = 0;
            self.vert += 1;
            if self.vert == self.w {
                self.vert = 0;
                self.right -= 2;
                if self.right == 6 {
                    self.right = 5;
                }
            }
        }

        Some((x, y))
    }
}

#[cfg(test)]
mod iter_tests {
    use super::EncRegionIter;
    use crate::common::metadata::Version;

    #[test]
    fn test_covers_all_but_timing_column() {
        for v in [1, 2, 7, 21, 40] {
            let ver = Version::new(v).unwrap();
            let w = ver.width();
            let coords = EncRegionIter::new(ver).collect::<Vec<_>>();
            assert_eq!(coords.len(), w * (w - 1));
            assert!(coords.iter().all(|&(x, _)| x != 6));
        }
    }

    #[test]
    fn test_zig_zag_start() {
        let coords = EncRegionIter::new(Version::new(1).unwrap()).take(6).collect::<Vec<_>>();
        assert_eq!(coords, [(20, 20), (19, 20), (20, 19), (19, 19), (20, 18), (19, 18)]);
    }

    #[test]
    fn test_turns_downward() {
        let mut coords = EncRegionIter::new(Version::new(1).unwrap()).skip(42);
        assert_eq!(coords.next(), Some((18, 0)));
        assert_eq!(coords.next(), Some((17, 0)));
        assert_eq!(coords.next(), Some((18, 1)));
    }
}
