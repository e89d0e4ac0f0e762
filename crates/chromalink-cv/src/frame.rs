//! Owned video frames

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sample order of the three channels in a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Camera order (OpenCV `Mat` default)
    #[default]
    Bgr,
    /// Image file order
    Rgb,
}

/// A frame buffer whose shape does not describe a `height x width x 3` grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputShapeError {
    #[error("Expected {expected} channels per pixel, got {found}")]
    ChannelCount { expected: usize, found: usize },
    #[error("Buffer of {found} bytes does not match a {width}x{height} frame ({expected} bytes)")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
    #[error("Frame dimensions {width}x{height} overflow the address space")]
    Dimensions { width: u32, height: u32 },
}

/// One acquired frame: `height` rows of `width` interleaved 3-channel pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    /// Wrap a raw interleaved buffer, checking its shape.
    pub fn new(
        width: u32,
        height: u32,
        channels: usize,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, InputShapeError> {
        if channels != Self::CHANNELS {
            return Err(InputShapeError::ChannelCount {
                expected: Self::CHANNELS,
                found: channels,
            });
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(Self::CHANNELS))
            .ok_or(InputShapeError::Dimensions { width, height })?;

        if data.len() != expected {
            return Err(InputShapeError::BufferLength {
                width,
                height,
                expected,
                found: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            order: ChannelOrder::Rgb,
            data: image.into_raw(),
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_rgb_image(image.to_rgb8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterate pixels in raster order as `[r, g, b]`.
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        let order = self.order;
        self.data.chunks_exact(Self::CHANNELS).map(move |px| match order {
            ChannelOrder::Rgb => [px[0], px[1], px[2]],
            ChannelOrder::Bgr => [px[2], px[1], px[0]],
        })
    }

    /// Copy into an RGB image regardless of the native order.
    pub fn to_rgb_image(&self) -> RgbImage {
        let data: Vec<u8> = self.rgb_pixels().flatten().collect();
        RgbImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }
}
