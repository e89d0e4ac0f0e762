//! Detection presenters

use chromalink_cv::{
    traits::{Control, Presenter},
    Detection, Frame, Result,
};
use serde::Serialize;
use std::io::Write;

/// Logs each detection through `tracing`.
#[derive(Debug, Default)]
pub struct LogPresenter {
    frames: u64,
}

impl Presenter for LogPresenter {
    fn present(&mut self, _frame: &Frame, detections: &[Detection]) -> Result<Control> {
        self.frames += 1;
        if detections.is_empty() {
            tracing::debug!(frame = self.frames, "no detections");
        }
        for d in detections {
            tracing::info!(
                frame = self.frames,
                class = %d.class,
                area = d.area,
                "{} at ({}, {}) bbox {}x{}+{}+{}",
                d.label,
                d.centroid.x,
                d.centroid.y,
                d.bbox.width,
                d.bbox.height,
                d.bbox.x,
                d.bbox.y
            );
        }
        Ok(Control::Continue)
    }
}

#[derive(Serialize)]
struct FrameReport<'a> {
    frame: u64,
    width: u32,
    height: u32,
    detections: &'a [Detection],
}

/// Writes one JSON object per frame, one per line.
pub struct JsonPresenter<W: Write> {
    writer: W,
    frames: u64,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, frames: 0 }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, frame: &Frame, detections: &[Detection]) -> Result<Control> {
        let report = FrameReport {
            frame: self.frames,
            width: frame.width(),
            height: frame.height(),
            detections,
        };
        self.frames += 1;

        serde_json::to_writer(&mut self.writer, &report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(Control::Continue)
    }
}

#[cfg(feature = "camera")]
pub use window::WindowPresenter;

#[cfg(feature = "camera")]
mod window {
    use super::*;
    use chromalink_cv::ChannelOrder;
    use opencv::{
        core::{Mat, Point, Rect, Scalar},
        highgui,
        imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
        prelude::*,
    };

    const QUIT_KEY: i32 = 'q' as i32;

    /// OpenCV window with a box, label and centroid dot per detection. `q` quits.
    pub struct WindowPresenter {
        title: String,
    }

    impl WindowPresenter {
        pub fn new(title: &str) -> Result<Self> {
            highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
            Ok(Self {
                title: title.to_string(),
            })
        }

        fn to_bgr_mat(frame: &Frame) -> Result<Mat> {
            let bytes: Vec<u8> = match frame.order() {
                ChannelOrder::Bgr => frame.as_bytes().to_vec(),
                ChannelOrder::Rgb => frame
                    .rgb_pixels()
                    .flat_map(|[r, g, b]| [b, g, r])
                    .collect(),
            };
            let flat = Mat::from_slice(&bytes)?;
            let shaped = flat.reshape(3, frame.height() as i32)?;
            Ok(shaped.try_clone()?)
        }
    }

    impl Presenter for WindowPresenter {
        fn present(&mut self, frame: &Frame, detections: &[Detection]) -> Result<Control> {
            if frame.is_empty() {
                return Ok(Control::Continue);
            }
            let mut output = Self::to_bgr_mat(frame)?;

            for d in detections {
                let b = d.bbox;
                imgproc::rectangle(
                    &mut output,
                    Rect::new(b.x as i32, b.y as i32, b.width as i32, b.height as i32),
                    Scalar::new(0.0, 255.0, 0.0, 0.0),
                    2,
                    LINE_8,
                    0,
                )?;
                imgproc::put_text(
                    &mut output,
                    &d.label,
                    Point::new(b.x as i32, b.y as i32 - 10),
                    FONT_HERSHEY_SIMPLEX,
                    0.9,
                    Scalar::new(36.0, 255.0, 12.0, 0.0),
                    2,
                    LINE_8,
                    false,
                )?;
                imgproc::circle(
                    &mut output,
                    Point::new(d.centroid.x as i32, d.centroid.y as i32),
                    5,
                    Scalar::new(255.0, 0.0, 0.0, 0.0),
                    -1,
                    LINE_8,
                    0,
                )?;
            }

            highgui::imshow(&self.title, &output)?;
            let key = highgui::wait_key(1)?;
            if key & 0xFF == QUIT_KEY {
                return Ok(Control::Stop);
            }
            Ok(Control::Continue)
        }
    }

    impl Drop for WindowPresenter {
        fn drop(&mut self) {
            let _ = highgui::destroy_window(&self.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromalink_cv::BBox;
    use image::RgbImage;

    #[test]
    fn test_json_lines() -> Result<()> {
        let frame = Frame::from_rgb_image(RgbImage::new(64, 48));
        let bbox = BBox::new(4, 6, 30, 20);
        let detection = Detection {
            class: "b".to_string(),
            label: "B".to_string(),
            bbox,
            centroid: bbox.center(),
            area: 600,
        };

        let mut presenter = JsonPresenter::new(Vec::new());
        assert_eq!(presenter.present(&frame, &[detection])?, Control::Continue);
        presenter.present(&frame, &[])?;

        let text = String::from_utf8(presenter.into_inner())?;
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(serde_json::from_str)
            .collect::<std::result::Result<_, _>>()?;

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["frame"], 0);
        assert_eq!(lines[0]["width"], 64);
        assert_eq!(lines[0]["detections"][0]["label"], "B");
        assert_eq!(lines[0]["detections"][0]["centroid"]["x"], 19);
        assert_eq!(lines[0]["detections"][0]["centroid"]["y"], 16);
        assert_eq!(lines[1]["frame"], 1);
        assert!(lines[1]["detections"].as_array().is_some_and(|a| a.is_empty()));
        Ok(())
    }

    #[test]
    fn test_log_presenter_never_stops() -> Result<()> {
        let frame = Frame::from_rgb_image(RgbImage::new(8, 8));
        let mut presenter = LogPresenter::default();
        assert_eq!(presenter.present(&frame, &[])?, Control::Continue);
        Ok(())
    }
}
