use voxcast_common::Rgba;

/// Errors from frame buffer construction or reuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },
    #[error("pixel count mismatch: {width}x{height} needs {expected} pixels, got {actual}")]
    PixelCount {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Row-major grid of packed `R<<24 | G<<16 | B<<8 | A` pixels, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// A frame of the given size, filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::BLACK.pack(); width as usize * height as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(FrameError::PixelCount {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Packed pixel at `(x, y)`. Panics if out of range.
    pub fn get(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of range");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn color(&self, x: u32, y: u32) -> Rgba {
        Rgba::unpack(self.get(x, y))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Bytes in R, G, B, A order per pixel, for texture upload or image export.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_be_bytes()).collect()
    }

    pub(crate) fn check_size(&self, width: u32, height: u32) -> Result<(), FrameError> {
        if self.width == width && self.height == height {
            Ok(())
        } else {
            Err(FrameError::SizeMismatch {
                expected_width: width,
                expected_height: height,
                width: self.width,
                height: self.height,
            })
        }
    }
}
