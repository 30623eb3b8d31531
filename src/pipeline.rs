use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use hoplite_capture::{Capture, CaptureStatus, SnapshotProvider};
use hoplite_vision::ScreenParser;

use crate::observer::{observe_capture, Observation};

/// Manages the capture → vision pipeline
pub struct Pipeline {
    stop: Arc<AtomicBool>,
    frame_rx: watch::Receiver<Option<Arc<Capture>>>,
    status_rx: watch::Receiver<CaptureStatus>,
    observation_rx: watch::Receiver<Option<Observation>>,
}

impl Pipeline {
    /// Start capturing from `provider` every `frame_interval_ms` and parsing
    /// each new frame. Must be called from within a tokio runtime.
    pub fn start<P>(provider: P, parser: ScreenParser, frame_interval_ms: u64) -> Self
    where
        P: SnapshotProvider + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));

        let (frame_tx, frame_rx) = watch::channel::<Option<Arc<Capture>>>(None);
        let (status_tx, status_rx) = watch::channel(CaptureStatus::default());
        let (observation_tx, observation_rx) = watch::channel::<Option<Observation>>(None);

        let frame_interval = Duration::from_millis(frame_interval_ms);

        tokio::spawn(hoplite_capture::capture_loop(
            provider,
            frame_tx,
            status_tx,
            frame_interval,
            stop.clone(),
        ));

        Self::spawn_vision(&frame_rx, observation_tx, &stop, parser);

        info!("Pipeline started, interval: {:?}", frame_interval);

        Self {
            stop,
            frame_rx,
            status_rx,
            observation_rx,
        }
    }

    /// Parse every new frame. The parser moves into the blocking task and
    /// back, so only one frame is parsed at a time and frames published in
    /// the meantime are skipped. A frame that fails to parse is skipped too.
    fn spawn_vision(
        frame_rx: &watch::Receiver<Option<Arc<Capture>>>,
        observation_tx: watch::Sender<Option<Observation>>,
        stop: &Arc<AtomicBool>,
        parser: ScreenParser,
    ) {
        let mut vision_frame_rx = frame_rx.clone();
        let stop_vision = stop.clone();
        tokio::spawn(async move {
            // Replaces the parser lost when a parsing task panics
            let pristine = parser.clone();
            let mut parser = Some(parser);

            loop {
                if stop_vision.load(Ordering::Relaxed) {
                    break;
                }

                // Fails once the capture loop is gone
                if vision_frame_rx.changed().await.is_err() {
                    break;
                }

                let frame = vision_frame_rx.borrow_and_update().clone();
                let Some(frame) = frame else {
                    continue;
                };
                let Some(mut current) = parser.take() else {
                    break;
                };

                let result = tokio::task::spawn_blocking(move || {
                    let observation = observe_capture(&mut current, &frame);
                    (current, observation)
                })
                .await;

                match result {
                    Ok((returned, Ok(observation))) => {
                        parser = Some(returned);
                        let _ = observation_tx.send(Some(observation));
                    }
                    Ok((returned, Err(e))) => {
                        parser = Some(returned);
                        warn!("Failed to parse frame: {}", e);
                    }
                    Err(e) => {
                        error!("Vision task panicked, restarting parser: {}", e);
                        parser = Some(pristine.clone());
                    }
                }
            }

            info!("Vision loop stopped");
        });
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        info!("Pipeline stop requested");
    }

    pub fn capture_status(&self) -> CaptureStatus {
        self.status_rx.borrow().clone()
    }

    /// Most recent observation, if any frame was parsed yet
    pub fn latest(&self) -> Option<Observation> {
        self.observation_rx.borrow().clone()
    }

    /// Get the latest captured frame
    pub fn latest_frame(&self) -> Option<Arc<Capture>> {
        self.frame_rx.borrow().clone()
    }

    /// Receiver notified on every new observation.
    pub fn subscribe(&self) -> watch::Receiver<Option<Observation>> {
        self.observation_rx.clone()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoplite_capture::{FileProvider, CAPTURE_HEIGHT, CAPTURE_WIDTH};
    use hoplite_state::Interface;
    use image::{Rgb, RgbImage};

    #[tokio::test]
    async fn test_pipeline_publishes_observations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        let mut img = RgbImage::new(CAPTURE_WIDTH, CAPTURE_HEIGHT);
        img.put_pixel(66, 1714, Rgb([189, 36, 49]));
        img.save(&path).unwrap();

        let pipeline = Pipeline::start(FileProvider::new(&path), ScreenParser::new(), 20);
        let mut rx = pipeline.subscribe();
        tokio::time::timeout(Duration::from_secs(10), rx.changed())
            .await
            .unwrap()
            .unwrap();

        let observation = pipeline.latest().unwrap();
        assert_eq!(observation.interface, Interface::Playing);
        assert_eq!(observation.game.unwrap().status.health, 1);
        assert!(pipeline.latest_frame().is_some());

        pipeline.stop();
    }

    fn save_atomically(img: &RgbImage, path: &std::path::Path) {
        let tmp = path.with_extension("tmp.png");
        img.save(&tmp).unwrap();
        std::fs::rename(&tmp, path).unwrap();
    }

    #[tokio::test]
    async fn test_pipeline_recovers_after_unparseable_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");

        // A bright band over the depth counter reads as too many digits
        let mut unreadable = RgbImage::new(CAPTURE_WIDTH, CAPTURE_HEIGHT);
        for x in 178..CAPTURE_WIDTH {
            for y in 70..98 {
                unreadable.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        save_atomically(&unreadable, &path);

        let pipeline = Pipeline::start(FileProvider::new(&path), ScreenParser::new(), 20);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(pipeline.latest_frame().is_some());
        assert!(pipeline.latest().is_none());

        let mut readable = RgbImage::new(CAPTURE_WIDTH, CAPTURE_HEIGHT);
        readable.put_pixel(66, 1714, Rgb([189, 36, 49]));
        save_atomically(&readable, &path);

        let mut rx = pipeline.subscribe();
        tokio::time::timeout(Duration::from_secs(10), rx.changed())
            .await
            .unwrap()
            .unwrap();
        let observation = pipeline.latest().unwrap();
        assert_eq!(observation.game.unwrap().status.health, 1);

        pipeline.stop();
    }

    #[tokio::test]
    async fn test_pipeline_skips_bad_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        RgbImage::new(640, 480).save(&path).unwrap();

        let pipeline = Pipeline::start(FileProvider::new(&path), ScreenParser::new(), 20);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(pipeline.latest().is_none());
        assert!(pipeline.latest_frame().is_none());
        assert!(pipeline.capture_status().last_error.is_some());
        pipeline.stop();
    }
}
