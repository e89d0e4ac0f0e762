//! Outer acquisition loop: pull a frame, classify, transmit, present.

use crate::link::{self, ActuatorLink};
use anyhow::Context;
use chromalink_core::ClassRegistry;
use chromalink_cv::{
    traits::{Control, FrameSource, Presenter},
    ColorClassifier, Result,
};
use std::time::Duration;

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub detections: u64,
    pub messages_sent: u64,
    pub send_failures: u64,
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    Operator,
    FrameLimit,
}

pub struct Acquisition<'a> {
    classifier: &'a ColorClassifier,
    registry: &'a ClassRegistry,
    send_delay: Duration,
    max_frames: Option<u64>,
}

impl<'a> Acquisition<'a> {
    pub fn new(classifier: &'a ColorClassifier, registry: &'a ClassRegistry) -> Self {
        Self {
            classifier,
            registry,
            send_delay: Duration::ZERO,
            max_frames: None,
        }
    }

    /// Pause after each message so the link is not flooded
    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Run until end-of-stream, an operator stop, or the frame limit.
    ///
    /// Acquisition and presenter failures end the run with an error. Link failures
    /// are logged and skipped.
    pub fn run(
        &self,
        source: &mut dyn FrameSource,
        presenter: &mut dyn Presenter,
        link: &mut dyn ActuatorLink,
    ) -> Result<(RunStats, StopReason)> {
        let mut stats = RunStats::default();

        let reason = loop {
            if self.max_frames.is_some_and(|max| stats.frames >= max) {
                break StopReason::FrameLimit;
            }

            let Some(frame) = source
                .next_frame()
                .with_context(|| format!("Frame acquisition failed after {} frames", stats.frames))?
            else {
                break StopReason::EndOfStream;
            };
            stats.frames += 1;

            let detections = self.classifier.classify(&frame, self.registry);
            stats.detections += detections.len() as u64;

            for detection in &detections {
                let message = link::encode(detection);
                tracing::info!(
                    "Sending data to actuator: {}",
                    String::from_utf8_lossy(&message).trim_end()
                );

                match link.send(&message) {
                    Ok(()) => stats.messages_sent += 1,
                    Err(e) => {
                        stats.send_failures += 1;
                        tracing::warn!("Dropped message for {}: {}", detection.label, e);
                    }
                }

                if !self.send_delay.is_zero() {
                    std::thread::sleep(self.send_delay);
                }
            }

            if presenter.present(&frame, &detections)? == Control::Stop {
                break StopReason::Operator;
            }
        };

        tracing::info!(?reason, ?stats, "Acquisition finished");
        Ok((stats, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkError;
    use chromalink_cv::{AcquisitionError, Detection, Frame};
    use image::{Rgb, RgbImage};
    use std::collections::VecDeque;

    struct VecSource(VecDeque<std::result::Result<Frame, AcquisitionError>>);

    impl FrameSource for VecSource {
        fn next_frame(&mut self) -> std::result::Result<Option<Frame>, AcquisitionError> {
            self.0.pop_front().transpose()
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<usize>,
        stop_after: Option<usize>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, _frame: &Frame, detections: &[Detection]) -> Result<Control> {
            self.seen.push(detections.len());
            if self.stop_after == Some(self.seen.len()) {
                return Ok(Control::Stop);
            }
            Ok(Control::Continue)
        }
    }

    /// Records messages, failing the ones whose index is listed.
    #[derive(Default)]
    struct FlakyLink {
        sent: Vec<String>,
        fail_on: Vec<usize>,
        attempts: usize,
    }

    impl ActuatorLink for FlakyLink {
        fn send(&mut self, message: &[u8]) -> std::result::Result<(), LinkError> {
            let attempt = self.attempts;
            self.attempts += 1;
            if self.fail_on.contains(&attempt) {
                return Err(LinkError::Write(std::io::Error::other("line busy")));
            }
            self.sent.push(String::from_utf8_lossy(message).into_owned());
            Ok(())
        }
    }

    fn scene() -> Frame {
        let mut image = RgbImage::new(100, 100);
        for y in 0..30 {
            for x in 0..30 {
                image.put_pixel(x, y, Rgb([0, 0, 255]));
                image.put_pixel(x + 50, y + 50, Rgb([255, 255, 0]));
            }
        }
        Frame::from_rgb_image(image)
    }

    fn frames(n: usize) -> VecSource {
        VecSource((0..n).map(|_| Ok(scene())).collect())
    }

    #[test]
    fn test_messages_in_registry_order() -> Result<()> {
        let classifier = ColorClassifier::default();
        let registry = ClassRegistry::builtin();
        let mut presenter = Recorder::default();
        let mut link = FlakyLink::default();

        let (stats, reason) =
            Acquisition::new(&classifier, &registry).run(&mut frames(2), &mut presenter, &mut link)?;

        assert_eq!(reason, StopReason::EndOfStream);
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.messages_sent, 4);
        assert_eq!(link.sent, ["Y,65,65\n", "B,15,15\n", "Y,65,65\n", "B,15,15\n"]);
        assert_eq!(presenter.seen, [2, 2]);
        Ok(())
    }

    #[test]
    fn test_send_failure_does_not_stop_loop() -> Result<()> {
        let classifier = ColorClassifier::default();
        let registry = ClassRegistry::builtin();
        let mut link = FlakyLink {
            fail_on: vec![0, 1],
            ..Default::default()
        };

        let (stats, _) = Acquisition::new(&classifier, &registry).run(
            &mut frames(2),
            &mut Recorder::default(),
            &mut link,
        )?;

        assert_eq!(stats.send_failures, 2);
        assert_eq!(stats.messages_sent, 2);
        assert_eq!(stats.frames, 2);
        Ok(())
    }

    #[test]
    fn test_operator_stop_and_frame_limit() -> Result<()> {
        let classifier = ColorClassifier::default();
        let registry = ClassRegistry::builtin();

        let mut presenter = Recorder {
            stop_after: Some(1),
            ..Default::default()
        };
        let (stats, reason) = Acquisition::new(&classifier, &registry).run(
            &mut frames(5),
            &mut presenter,
            &mut FlakyLink::default(),
        )?;
        assert_eq!((stats.frames, reason), (1, StopReason::Operator));

        let (stats, reason) = Acquisition::new(&classifier, &registry)
            .with_max_frames(Some(3))
            .run(&mut frames(5), &mut Recorder::default(), &mut FlakyLink::default())?;
        assert_eq!((stats.frames, reason), (3, StopReason::FrameLimit));
        Ok(())
    }

    #[test]
    fn test_acquisition_failure_propagates() {
        let classifier = ColorClassifier::default();
        let registry = ClassRegistry::builtin();
        let mut source = VecSource(VecDeque::from([
            Ok(scene()),
            Err(AcquisitionError::Device("unplugged".to_string())),
        ]));

        let err = Acquisition::new(&classifier, &registry)
            .run(&mut source, &mut Recorder::default(), &mut FlakyLink::default())
            .unwrap_err();
        assert!(err.to_string().contains("after 1 frames"));
        assert!(err.downcast_ref::<AcquisitionError>().is_some());
    }
}
