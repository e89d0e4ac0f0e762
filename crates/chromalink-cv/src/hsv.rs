//! 8-bit HSV conversion
//!
//! Follows the OpenCV `COLOR_BGR2HSV` convention for `u8` images: hue is
//! degrees halved (`0..180`), saturation and value are scaled to `0..=255`.

use crate::frame::Frame;
use chromalink_core::classes::HUE_MAX;

/// Convert one RGB sample to `[h, s, v]`.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return [0, 0, max];
    }

    let diff = f32::from(max - min);
    let s = (255.0 * diff / f32::from(max)).round() as u8;

    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let mut degrees = if max == r {
        60.0 * (gf - bf) / diff
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if degrees < 0.0 {
        degrees += 360.0;
    }

    let mut h = (degrees / 2.0).round() as u8;
    if h >= HUE_MAX {
        h -= HUE_MAX;
    }

    [h, s, max]
}

/// A frame converted to HSV, computed once and shared by every class.
#[derive(Debug, Clone)]
pub struct HsvImage {
    width: u32,
    height: u32,
    data: Vec<[u8; 3]>,
}

impl HsvImage {
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            width: frame.width(),
            height: frame.height(),
            data: frame.rgb_pixels().map(rgb_to_hsv).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples in raster order.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.data
    }

    #[cfg(test)]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ChannelOrder;

    #[test]
    fn test_reference_values() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 255]), [90, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 0, 255]), [150, 255, 255]);
    }

    #[test]
    fn test_achromatic_samples() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
    }

    #[test]
    fn test_partial_saturation() {
        // diff 100 over max 200 -> 127.5 rounds up
        assert_eq!(rgb_to_hsv([200, 100, 100]), [0, 128, 200]);
    }

    #[test]
    fn test_hue_just_below_wrap_folds_to_zero() {
        // 359.x degrees rounds to 180, which is the same hue as 0
        let [h, _, _] = rgb_to_hsv([255, 0, 1]);
        assert_eq!(h, 0);
        let [h, _, _] = rgb_to_hsv([255, 0, 20]);
        assert!(h > 170 && h < HUE_MAX, "{h}");
    }

    #[test]
    fn test_from_frame_honors_channel_order() {
        let bgr = Frame::new(1, 1, 3, ChannelOrder::Bgr, vec![255, 0, 0]).unwrap();
        let rgb = Frame::new(1, 1, 3, ChannelOrder::Rgb, vec![0, 0, 255]).unwrap();

        assert_eq!(HsvImage::from_frame(&bgr).get(0, 0), Some([120, 255, 255]));
        assert_eq!(HsvImage::from_frame(&rgb).get(0, 0), Some([120, 255, 255]));
        assert_eq!(HsvImage::from_frame(&rgb).get(1, 0), None);
    }
}
