//! Largest-region color classifier

use super::config::ClassifierParams;
use crate::bbox::{BBox, Point};
use crate::frame::Frame;
use crate::hsv::HsvImage;
use crate::mask;
use crate::region::{self, Region};
use chromalink_core::{ClassRegistry, ColorClass};
use serde::Serialize;

/// The largest sufficiently large region of one class in one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// Registry name of the class
    pub class: String,
    /// Label reported to the actuator
    pub label: String,
    pub bbox: BBox,
    pub centroid: Point,
    /// Filled area of the region, holes included
    pub area: u32,
}

impl Detection {
    fn new(class: &ColorClass, region: Region) -> Self {
        Self {
            class: class.name().to_string(),
            label: class.label().to_string(),
            bbox: region.bbox,
            centroid: region.bbox.center(),
            area: region.area,
        }
    }
}

/// Stateless classifier: thresholds plus the per-class pipeline.
#[derive(Debug, Clone, Default)]
pub struct ColorClassifier {
    params: ClassifierParams,
}

impl ColorClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Classify one frame against every class of `registry`.
    ///
    /// Detections come back in registry order, at most one per class.
    pub fn classify(&self, frame: &Frame, registry: &ClassRegistry) -> Vec<Detection> {
        let start_time = std::time::Instant::now();
        let hsv = HsvImage::from_frame(frame);
        let detections = self.classify_hsv(&hsv, registry);

        tracing::trace!(
            detections = detections.len(),
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "classified {}x{} frame",
            frame.width(),
            frame.height()
        );
        detections
    }

    /// Same as [`classify`](Self::classify) on an already converted frame.
    #[cfg(not(feature = "parallel"))]
    pub fn classify_hsv(&self, hsv: &HsvImage, registry: &ClassRegistry) -> Vec<Detection> {
        registry
            .iter()
            .filter_map(|class| self.detect_class(hsv, class))
            .collect()
    }

    /// Same as [`classify`](Self::classify) on an already converted frame.
    #[cfg(feature = "parallel")]
    pub fn classify_hsv(&self, hsv: &HsvImage, registry: &ClassRegistry) -> Vec<Detection> {
        use rayon::prelude::*;

        registry
            .as_slice()
            .par_iter()
            .filter_map(|class| self.detect_class(hsv, class))
            .collect()
    }

    /// Mask, denoise, label, pick the largest region, apply the area threshold.
    pub fn detect_class(&self, hsv: &HsvImage, class: &ColorClass) -> Option<Detection> {
        let params = &self.params;
        if hsv.width() == 0 || hsv.height() == 0 {
            return None;
        }

        let mask = mask::class_mask(hsv, class, params.min_saturation, params.min_value);
        let mask = mask::open(mask, params.open_radius);
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(
                class = class.name(),
                foreground = mask::count_foreground(&mask),
                "mask ready"
            );
        }

        let regions = region::extract_regions(&mask);
        let largest = region::largest_region(&regions)?;

        if largest.area <= params.min_area {
            tracing::trace!(
                class = class.name(),
                area = largest.area,
                "largest region below min_area"
            );
            return None;
        }

        Some(Detection::new(class, largest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
    const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);

    fn fill(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
        for yy in y..y + h {
            for xx in x..x + w {
                image.put_pixel(xx, yy, color);
            }
        }
    }

    #[test]
    fn test_classifier_creation() {
        let classifier = ColorClassifier::default();
        assert_eq!(classifier.params().min_area, 500);
    }

    #[test]
    fn test_black_frame_has_no_detections() {
        let classifier = ColorClassifier::default();
        let frame = Frame::from_rgb_image(RgbImage::new(100, 100));

        assert!(classifier.classify(&frame, &ClassRegistry::builtin()).is_empty());
    }

    #[test]
    fn test_detections_follow_registry_order() {
        let mut image = RgbImage::new(120, 60);
        fill(&mut image, 0, 0, 40, 40, BLUE);
        fill(&mut image, 60, 0, 40, 40, YELLOW);

        let classifier = ColorClassifier::default();
        let detections = classifier.classify(&Frame::from_rgb_image(image), &ClassRegistry::builtin());

        let labels: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Y", "B"]);
        assert_eq!(detections[0].bbox, BBox::new(60, 0, 40, 40));
        assert_eq!(detections[0].centroid, Point::new(80, 20));
        assert_eq!(detections[1].area, 1600);
    }

    #[test]
    fn test_opening_splits_bridged_blobs() {
        let mut image = RgbImage::new(100, 40);
        fill(&mut image, 0, 0, 30, 30, BLUE);
        fill(&mut image, 60, 0, 25, 25, BLUE);
        fill(&mut image, 30, 10, 30, 1, BLUE);

        let registry = ClassRegistry::builtin();
        let frame = Frame::from_rgb_image(image);

        let raw = ColorClassifier::default().classify(&frame, &registry);
        assert_eq!(raw[0].bbox, BBox::new(0, 0, 85, 30));

        let opened = ColorClassifier::new(ClassifierParams::denoised()).classify(&frame, &registry);
        assert_eq!(opened[0].bbox, BBox::new(0, 0, 30, 30));
        assert_eq!(opened[0].area, 900);
    }
}
