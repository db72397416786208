use ht_core::{Image, Rgba8};

/// Two-valued image: `255` marks stroke pixels, `0` marks background.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: Image<u8>,
}

impl BinaryMask {
    pub const FOREGROUND: u8 = 255;
    pub const BACKGROUND: u8 = 0;

    pub fn new_empty(width: usize, height: usize) -> Self {
        Self {
            image: Image::new_fill(width, height, Self::BACKGROUND),
        }
    }

    /// Pixels are treated as foreground iff `> 0`.
    pub fn from_image(mut image: Image<u8>) -> Self {
        for v in image.data_mut() {
            *v = if *v > 0 {
                Self::FOREGROUND
            } else {
                Self::BACKGROUND
            };
        }
        Self { image }
    }

    /// Reads an already binarized RGBA raster where white is foreground.
    pub fn from_rgba_mask(rgba: &Image<Rgba8>) -> Self {
        Self {
            image: rgba.map(|&px| {
                if px == Rgba8::WHITE {
                    Self::FOREGROUND
                } else {
                    Self::BACKGROUND
                }
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.image.get(x, y).is_some_and(|&v| v != 0)
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if let Some(v) = self.image.get_mut(x, y) {
            *v = if on {
                Self::FOREGROUND
            } else {
                Self::BACKGROUND
            };
        }
    }

    pub fn count_foreground(&self) -> usize {
        self.image.data().iter().filter(|&&v| v != 0).count()
    }

    pub fn image(&self) -> &Image<u8> {
        &self.image
    }

    pub fn into_image(self) -> Image<u8> {
        self.image
    }

    /// Opaque white-on-black RGBA form of the mask.
    pub fn to_rgba(&self) -> Image<Rgba8> {
        self.image.map(|&v| {
            if v != 0 {
                Rgba8::WHITE
            } else {
                Rgba8::BLACK
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use ht_core::{Image, Rgba8};

    use super::BinaryMask;

    #[test]
    fn from_image_normalizes_to_two_values() {
        let img = Image::from_vec(4, 1, vec![0u8, 1, 128, 255]).expect("valid image");
        let mask = BinaryMask::from_image(img);

        assert_eq!(mask.image().data(), &[0, 255, 255, 255]);
        assert_eq!(mask.count_foreground(), 3);
        assert!(!mask.is_set(0, 0));
        assert!(mask.is_set(1, 0));
        assert!(!mask.is_set(9, 9));
    }

    #[test]
    fn rgba_form_reads_back_unchanged() {
        let mut mask = BinaryMask::new_empty(3, 2);
        mask.set(1, 1, true);
        mask.set(2, 0, true);

        let rgba = mask.to_rgba();
        assert_eq!(rgba.get(1, 1), Some(&Rgba8::WHITE));
        assert_eq!(rgba.get(0, 0), Some(&Rgba8::BLACK));
        assert_eq!(BinaryMask::from_rgba_mask(&rgba), mask);

        let renormalized = BinaryMask::from_image(mask.clone().into_image());
        assert_eq!(renormalized, mask);
    }
}
