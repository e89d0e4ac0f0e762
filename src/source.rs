//! Frame sources

use chromalink_cv::{traits::FrameSource, AcquisitionError, Frame};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Replays still images in file-name order.
pub struct ImageDirSource {
    pending: VecDeque<PathBuf>,
}

impl ImageDirSource {
    /// `path` may be a single image or a directory of images.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AcquisitionError> {
        let path = path.as_ref();
        let io_err = |source| AcquisitionError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(path).map_err(io_err)?;
        let mut files = Vec::new();

        if metadata.is_file() {
            files.push(path.to_path_buf());
        } else {
            for entry in fs::read_dir(path).map_err(io_err)? {
                let entry_path = entry.map_err(io_err)?.path();
                if is_supported(&entry_path) {
                    files.push(entry_path);
                }
            }
            files.sort();
        }

        tracing::info!("Replaying {} frames from {:?}", files.len(), path);
        Ok(Self {
            pending: files.into(),
        })
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, AcquisitionError> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };

        let image = image::open(&path).map_err(|source| AcquisitionError::Decode {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Loaded frame {:?}", path);
        Ok(Some(Frame::from_dynamic(image)))
    }
}

fn is_supported(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(feature = "camera")]
pub use camera::CameraSource;

#[cfg(feature = "camera")]
mod camera {
    use super::*;
    use chromalink_cv::ChannelOrder;
    use opencv::{core::Mat, prelude::*, videoio};

    fn device_error(e: opencv::Error) -> AcquisitionError {
        AcquisitionError::Device(e.to_string())
    }

    /// Live capture through OpenCV; frames arrive in BGR order.
    pub struct CameraSource {
        capture: videoio::VideoCapture,
    }

    impl CameraSource {
        pub fn open(device: i32) -> Result<Self, AcquisitionError> {
            let capture =
                videoio::VideoCapture::new(device, videoio::CAP_ANY).map_err(device_error)?;
            if !capture.is_opened().map_err(device_error)? {
                return Err(AcquisitionError::Device(format!(
                    "camera {} could not be opened",
                    device
                )));
            }
            tracing::info!("Opened camera {}", device);
            Ok(Self { capture })
        }
    }

    impl FrameSource for CameraSource {
        fn next_frame(&mut self) -> Result<Option<Frame>, AcquisitionError> {
            let mut mat = Mat::default();
            let grabbed = self.capture.read(&mut mat).map_err(device_error)?;
            if !grabbed || mat.empty() {
                return Ok(None);
            }

            let mat = if mat.is_continuous() {
                mat
            } else {
                mat.try_clone().map_err(device_error)?
            };
            let data = mat.data_bytes().map_err(device_error)?.to_vec();

            let frame = Frame::new(
                mat.cols() as u32,
                mat.rows() as u32,
                mat.channels() as usize,
                ChannelOrder::Bgr,
                data,
            )?;
            Ok(Some(frame))
        }
    }

    impl Drop for CameraSource {
        fn drop(&mut self) {
            if let Err(e) = self.capture.release() {
                tracing::warn!("Failed to release camera: {}", e);
            }
        }
    }
}
