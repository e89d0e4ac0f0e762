//! Binary masks over an HSV frame

use crate::hsv::HsvImage;
use chromalink_core::ColorClass;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

pub const FOREGROUND: Luma<u8> = Luma([255]);
pub const BACKGROUND: Luma<u8> = Luma([0]);

/// Pixels inside any range of `class`, with near-gray and near-black pixels removed.
///
/// A pixel is kept when some range contains it (union over ranges) and
/// `s > min_saturation` and `v > min_value`.
pub fn class_mask(hsv: &HsvImage, class: &ColorClass, min_saturation: u8, min_value: u8) -> GrayImage {
    let data = hsv
        .pixels()
        .iter()
        .map(|&[h, s, v]| {
            let keep = s > min_saturation && v > min_value && class.matches(h, s, v);
            if keep { FOREGROUND.0[0] } else { BACKGROUND.0[0] }
        })
        .collect();

    GrayImage::from_raw(hsv.width(), hsv.height(), data)
        .unwrap_or_else(|| GrayImage::new(hsv.width(), hsv.height()))
}

/// Morphological opening with a square structuring element of `radius`.
///
/// Removes specks and bridges thinner than `2 * radius + 1` pixels. A radius of zero
/// returns the mask unchanged.
pub fn open(mask: GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return mask;
    }
    morphology::open(&mask, Norm::LInf, radius)
}

pub fn count_foreground(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| **p == FOREGROUND).count()
}
