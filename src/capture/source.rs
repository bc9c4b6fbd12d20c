use crate::error::AppError;
use image::{DynamicImage, Rgb, RgbImage};

/// A blocking frame producer driven from a dedicated capture thread.
pub trait FrameSource: Send {
    fn open(&mut self) -> Result<(), AppError>;
    fn read_frame(&mut self) -> Result<DynamicImage, AppError>;
    /// Frees the device. Must be safe to call more than once.
    fn release(&mut self);
    fn name(&self) -> &'static str;
}

/// Moving gradient used when no physical camera is attached.
#[derive(Debug, Clone)]
pub struct TestPatternSource {
    width: u32,
    height: u32,
    tick: u32,
    opened: bool,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
            opened: false,
        }
    }
}

impl FrameSource for TestPatternSource {
    fn open(&mut self) -> Result<(), AppError> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Camera(format!(
                "invalid capture size {}x{}",
                self.width, self.height
            )));
        }
        self.opened = true;
        self.tick = 0;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<DynamicImage, AppError> {
        if !self.opened {
            return Err(AppError::Camera("test pattern is not open".to_string()));
        }
        let shift = self.tick;
        self.tick = self.tick.wrapping_add(1);
        let (width, height) = (self.width, self.height);
        let image = RgbImage::from_fn(width, height, |x, y| {
            let r = (x.wrapping_add(shift) % width * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            Rgb([r, g, (shift % 256) as u8])
        });
        Ok(DynamicImage::ImageRgb8(image))
    }

    fn release(&mut self) {
        self.opened = false;
    }

    fn name(&self) -> &'static str {
        "TestPatternSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn frames_require_open() {
        let mut source = TestPatternSource::new(8, 4);
        assert!(matches!(source.read_frame(), Err(AppError::Camera(_))));

        source.open().unwrap();
        let frame = source.read_frame().unwrap();
        assert_eq!(frame.dimensions(), (8, 4));

        source.release();
        source.release();
        assert!(source.read_frame().is_err());
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(TestPatternSource::new(0, 10).open().is_err());
    }
}
