//! Output surface and keyboard input abstraction.

use crate::controller::InputCode;
use image::RgbImage;
use thiserror::Error;

/// A frame could not be shown. The render loop logs it and carries on.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("present failed: {0}")]
    Present(String),
}

/// A full-screen surface that also reports key presses.
pub trait Display {
    /// Show `image`. The image is already at display resolution.
    fn present(&mut self, image: &RgbImage) -> Result<(), DisplayError>;

    /// Next pending key press, without blocking.
    fn poll_input(&mut self) -> Option<InputCode>;

    /// Tear down the surface. Called exactly once by the render loop.
    fn release(&mut self);
}

impl<T: Display + ?Sized> Display for Box<T> {
    fn present(&mut self, image: &RgbImage) -> Result<(), DisplayError> {
        (**self).present(image)
    }

    fn poll_input(&mut self) -> Option<InputCode> {
        (**self).poll_input()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl Display for Failing {
        fn present(&mut self, _image: &RgbImage) -> Result<(), DisplayError> {
            Err(DisplayError::Present("no surface".into()))
        }

        fn poll_input(&mut self) -> Option<InputCode> {
            Some(InputCode::Escape)
        }

        fn release(&mut self) {}
    }

    #[test]
    fn test_boxed_display_forwards() {
        let mut display: Box<dyn Display> = Box::new(Failing);
        let err = display.present(&RgbImage::new(1, 1)).unwrap_err();
        assert_eq!(err.to_string(), "present failed: no surface");
        assert_eq!(display.poll_input(), Some(InputCode::Escape));
    }
}
