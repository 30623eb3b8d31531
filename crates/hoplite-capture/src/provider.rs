use anyhow::{ensure, Context, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::Capture;

/// Source of raw screenshots. Decoding and validation are left to [`Capture`].
pub trait SnapshotProvider: Send {
    /// Short description of the source, for logs and status.
    fn name(&self) -> String;

    /// Take one screenshot.
    fn snapshot(&mut self) -> Result<DynamicImage>;
}

impl<P: SnapshotProvider + ?Sized> SnapshotProvider for Box<P> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn snapshot(&mut self) -> Result<DynamicImage> {
        (**self).snapshot()
    }
}

/// Re-reads an image file on every snapshot, e.g. a file another tool keeps
/// overwriting with the device screen.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotProvider for FileProvider {
    fn name(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn snapshot(&mut self) -> Result<DynamicImage> {
        image::open(&self.path).with_context(|| format!("Failed to open {}", self.path.display()))
    }
}

/// Runs an external command that prints an encoded screenshot on stdout.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Screenshot of the connected Android device through `adb`.
    pub fn adb() -> Self {
        Self::new("adb", ["exec-out", "screencap", "-p"])
    }
}

impl SnapshotProvider for CommandProvider {
    fn name(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }

    fn snapshot(&mut self) -> Result<DynamicImage> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        ensure!(
            output.status.success(),
            "{} exited with {}: {}",
            self.program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );

        image::load_from_memory(&output.stdout)
            .with_context(|| format!("Failed to decode screenshot from {}", self.program))
    }
}

/// Captures a desktop window (an emulator) whose title contains `title`.
#[cfg(feature = "window")]
#[derive(Debug, Clone)]
pub struct WindowProvider {
    title: String,
}

#[cfg(feature = "window")]
impl WindowProvider {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into().to_lowercase(),
        }
    }

    fn find_window(&self) -> Result<xcap::Window> {
        let windows = xcap::Window::all().context("Failed to enumerate windows")?;
        for window in windows {
            let title = match window.title() {
                Ok(t) => t.to_lowercase(),
                Err(_) => continue,
            };
            if title.contains(&self.title) {
                debug!("Found game window: {}", title);
                return Ok(window);
            }
        }
        anyhow::bail!("No window titled like '{}'", self.title)
    }
}

#[cfg(feature = "window")]
impl SnapshotProvider for WindowProvider {
    fn name(&self) -> String {
        format!("window '{}'", self.title)
    }

    fn snapshot(&mut self) -> Result<DynamicImage> {
        let window = self.find_window()?;
        let img = window
            .capture_image()
            .context("Failed to capture window image")?;
        Ok(DynamicImage::ImageRgba8(img))
    }
}

/// Status of the capture loop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureStatus {
    pub is_capturing: bool,
    pub source: Option<String>,
    pub fps: f64,
    pub last_capture_time: Option<u64>,
    pub resolution: Option<(u32, u32)>,
    pub last_error: Option<String>,
}

/// The capture loop that runs as a background task.
///
/// Takes a snapshot every `capture_interval`, validates it and publishes it on
/// `frame_tx`. Rejected or failed snapshots are reported on `status_tx` only.
pub async fn capture_loop<P>(
    provider: P,
    frame_tx: watch::Sender<Option<Arc<Capture>>>,
    status_tx: watch::Sender<CaptureStatus>,
    capture_interval: Duration,
    stop: Arc<AtomicBool>,
) where
    P: SnapshotProvider + 'static,
{
    let source = provider.name();
    info!("Capture loop started on {}, interval: {:?}", source, capture_interval);

    let mut provider = Some(provider);
    let mut frame_count = 0u64;
    let mut fps_timer = Instant::now();

    loop {
        if stop.load(Ordering::Relaxed) {
            info!("Capture loop stopping (stop signal received)");
            break;
        }

        let cycle_start = Instant::now();
        let Some(mut current) = provider.take() else {
            break;
        };

        // Providers block (process spawn, file IO, window capture)
        let capture_result = tokio::task::spawn_blocking(move || {
            let result = current
                .snapshot()
                .and_then(|img| Capture::from_image(img).map_err(anyhow::Error::from));
            (current, result)
        })
        .await;

        match capture_result {
            Ok((returned, Ok(capture))) => {
                provider = Some(returned);
                frame_count += 1;
                debug!("Captured frame from {} in {:?}", source, cycle_start.elapsed());

                let elapsed = fps_timer.elapsed().as_secs_f64();
                let fps = if elapsed > 0.0 {
                    frame_count as f64 / elapsed
                } else {
                    0.0
                };

                // Reset FPS counter every 5 seconds
                if elapsed > 5.0 {
                    frame_count = 0;
                    fps_timer = Instant::now();
                }

                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis() as u64;

                let _ = status_tx.send(CaptureStatus {
                    is_capturing: true,
                    source: Some(source.clone()),
                    fps,
                    last_capture_time: Some(now),
                    resolution: Some((capture.width(), capture.height())),
                    last_error: None,
                });

                let _ = frame_tx.send(Some(Arc::new(capture)));
            }
            Ok((returned, Err(e))) => {
                provider = Some(returned);
                warn!("Capture failed: {:#}", e);
                let _ = status_tx.send(CaptureStatus {
                    is_capturing: false,
                    source: Some(source.clone()),
                    last_error: Some(format!("{:#}", e)),
                    ..CaptureStatus::default()
                });
            }
            Err(e) => {
                warn!("Capture task panicked: {}", e);
                break;
            }
        }

        let elapsed = cycle_start.elapsed();
        if elapsed < capture_interval {
            tokio::time::sleep(capture_interval - elapsed).await;
        } else {
            // Yield to prevent busy loop
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    let _ = status_tx.send(CaptureStatus::default());
    info!("Capture loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CAPTURE_HEIGHT, CAPTURE_WIDTH};
    use image::RgbImage;

    fn write_screen(dir: &std::path::Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("screen.png");
        RgbImage::from_pixel(width, height, image::Rgb([24, 28, 24]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_file_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_screen(dir.path(), CAPTURE_WIDTH, CAPTURE_HEIGHT);
        let mut provider = FileProvider::new(&path);
        let img = provider.snapshot().unwrap();
        assert_eq!((img.width(), img.height()), (CAPTURE_WIDTH, CAPTURE_HEIGHT));
        assert!(provider.name().contains("screen.png"));
    }

    #[test]
    fn test_file_provider_missing_file() {
        let mut provider = FileProvider::new("/nonexistent/screen.png");
        assert!(provider.snapshot().is_err());
    }

    #[test]
    fn test_command_provider_failure() {
        let mut provider = CommandProvider::new("hoplite-no-such-program", ["--version"]);
        assert!(provider.snapshot().is_err());
    }

    #[tokio::test]
    async fn test_capture_loop_publishes_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_screen(dir.path(), CAPTURE_WIDTH, CAPTURE_HEIGHT);

        let (frame_tx, mut frame_rx) = watch::channel::<Option<Arc<Capture>>>(None);
        let (status_tx, status_rx) = watch::channel(CaptureStatus::default());
        let stop = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(capture_loop(
            FileProvider::new(&path),
            frame_tx,
            status_tx,
            Duration::from_millis(20),
            stop.clone(),
        ));

        frame_rx.changed().await.unwrap();
        let frame = frame_rx.borrow().clone().unwrap();
        assert_eq!(frame.width(), CAPTURE_WIDTH);
        assert!(status_rx.borrow().source.is_some());

        stop.store(true, Ordering::Relaxed);
        handle.await.unwrap();
        assert!(!status_rx.borrow().is_capturing);
    }

    #[tokio::test]
    async fn test_capture_loop_reports_wrong_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_screen(dir.path(), 640, 480);

        let (frame_tx, frame_rx) = watch::channel::<Option<Arc<Capture>>>(None);
        let (status_tx, mut status_rx) = watch::channel(CaptureStatus::default());
        let stop = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(capture_loop(
            FileProvider::new(&path),
            frame_tx,
            status_tx,
            Duration::from_millis(20),
            stop.clone(),
        ));

        status_rx.changed().await.unwrap();
        let error = status_rx.borrow().last_error.clone();
        assert!(error.unwrap().contains("640x480"));
        assert!(frame_rx.borrow().is_none());

        stop.store(true, Ordering::Relaxed);
        handle.await.unwrap();
    }
}
