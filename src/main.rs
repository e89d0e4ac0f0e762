use anyhow::{Context, Result};
use chromalink_core::ClassRegistry;
use chromalink_cv::{
    traits::{FrameSource, Presenter},
    ColorClassifier,
};
use std::path::PathBuf;

mod acquisition;
mod config;
mod link;
mod logging;
mod present;
mod source;

use acquisition::Acquisition;
use config::{AppConfig, LinkConfig, PresenterKind, SourceConfig, SourceKind};
use link::{ActuatorLink, LogLink};

fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::resolve(config_path.as_deref())?;

    logging::setup_logging(&config.log_level)?;

    let registry = config.registry().context("Invalid color class table")?;
    warn_on_slow_pacing(&config.link, &registry);

    let classifier = ColorClassifier::new(config.classifier);
    let mut source = open_source(&config.source)?;
    let mut presenter = open_presenter(config.presenter.kind)?;
    let mut link = open_link(&config.link)?;

    let (stats, reason) = Acquisition::new(&classifier, &registry)
        .with_send_delay(config.link.send_delay())
        .with_max_frames(config.source.frame_limit())
        .run(source.as_mut(), presenter.as_mut(), link.as_mut())
        .inspect_err(|e| tracing::error!("{:#}", e))?;

    tracing::info!(
        "Stopped ({:?}) after {} frames, {} detections, {} messages sent, {} dropped",
        reason,
        stats.frames,
        stats.detections,
        stats.messages_sent,
        stats.send_failures
    );
    Ok(())
}

/// The per-message delay is paid once per detection, so a frame where every
/// class is visible stalls for `classes * send_delay`.
fn warn_on_slow_pacing(link: &LinkConfig, registry: &ClassRegistry) {
    let worst = link.send_delay() * registry.len() as u32;
    if worst.as_millis() >= 1000 {
        tracing::warn!(
            "send_delay_ms = {} can stall up to {:?} per frame with {} classes",
            link.send_delay_ms,
            worst,
            registry.len()
        );
    }
}

fn open_source(config: &SourceConfig) -> Result<Box<dyn FrameSource>> {
    match config.kind {
        SourceKind::Images => Ok(Box::new(source::ImageDirSource::open(&config.path)?)),
        #[cfg(feature = "camera")]
        SourceKind::Camera => Ok(Box::new(source::CameraSource::open(config.device)?)),
        #[cfg(not(feature = "camera"))]
        SourceKind::Camera => anyhow::bail!("camera source requires building with the `camera` feature"),
    }
}

fn open_presenter(kind: PresenterKind) -> Result<Box<dyn Presenter>> {
    match kind {
        PresenterKind::Log => Ok(Box::new(present::LogPresenter::default())),
        PresenterKind::Json => Ok(Box::new(present::JsonPresenter::new(std::io::stdout()))),
        #[cfg(feature = "camera")]
        PresenterKind::Window => Ok(Box::new(present::WindowPresenter::new("Frame")?)),
        #[cfg(not(feature = "camera"))]
        PresenterKind::Window => anyhow::bail!("window presenter requires building with the `camera` feature"),
    }
}

fn open_link(config: &LinkConfig) -> Result<Box<dyn ActuatorLink>> {
    match &config.port {
        Some(port) => Ok(Box::new(link::open_serial(port, config)?)),
        None => {
            tracing::warn!("No serial port configured, messages will only be logged");
            Ok(Box::new(LogLink))
        }
    }
}
