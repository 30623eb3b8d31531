use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use hoplite_capture::{Capture, SnapshotProvider};
use hoplite_state::{AltarState, GameState, Interface};
use hoplite_vision::{ScreenParser, VisionError};

/// Everything read from one capture. `game` is only filled on the gameplay
/// screen and `altar` only on the altar screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub interface: Interface,
    pub game: Option<GameState>,
    pub altar: Option<AltarState>,
}

/// Classify the screen, then parse it if it is one the parser understands.
pub fn observe_capture(
    parser: &mut ScreenParser,
    capture: &Capture,
) -> Result<Observation, VisionError> {
    let interface = parser.interface(capture);
    debug!("Interface: {:?}", interface);
    let mut observation = Observation {
        interface,
        ..Observation::default()
    };
    match interface {
        Interface::Playing => observation.game = Some(parser.observe_game(capture)?),
        Interface::Altar => observation.altar = Some(parser.observe_altar(capture)?),
        _ => {}
    }
    Ok(observation)
}

/// Pulls screenshots from a provider on demand and parses the last one.
pub struct Observer {
    provider: Box<dyn SnapshotProvider>,
    screenshot: Option<Capture>,
    parser: ScreenParser,
}

impl Observer {
    pub fn new(provider: impl SnapshotProvider + 'static) -> Self {
        Self::with_parser(provider, ScreenParser::new())
    }

    pub fn with_parser(provider: impl SnapshotProvider + 'static, parser: ScreenParser) -> Self {
        Self {
            provider: Box::new(provider),
            screenshot: None,
            parser,
        }
    }

    /// Take a new screenshot and tell which screen it shows.
    pub fn fetch_screenshot(&mut self) -> Result<Interface> {
        let img = self
            .provider
            .snapshot()
            .with_context(|| format!("Failed to take screenshot from {}", self.provider.name()))?;
        let capture = Capture::from_image(img)?;
        let interface = self.parser.interface(&capture);
        self.screenshot = Some(capture);
        Ok(interface)
    }

    pub fn screenshot(&self) -> Option<&Capture> {
        self.screenshot.as_ref()
    }

    fn current(&self) -> Result<&Capture> {
        self.screenshot
            .as_ref()
            .context("No screenshot taken yet")
    }

    /// Write the last screenshot as an image file.
    pub fn save_screenshot(&self, path: &Path) -> Result<()> {
        self.current()?.save(path)
    }

    /// Parse the last screenshot as the gameplay screen.
    pub fn parse_game(&self) -> Result<GameState> {
        Ok(self.parser.observe_game(self.current()?)?)
    }

    /// Parse the last screenshot as the altar screen.
    pub fn parse_altar(&mut self) -> Result<AltarState> {
        let capture = self
            .screenshot
            .as_ref()
            .context("No screenshot taken yet")?;
        Ok(self.parser.observe_altar(capture)?)
    }

    /// Take a screenshot and parse whatever it shows.
    pub fn observe(&mut self) -> Result<Observation> {
        self.fetch_screenshot()?;
        let capture = self
            .screenshot
            .as_ref()
            .context("No screenshot taken yet")?;
        Ok(observe_capture(&mut self.parser, capture)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoplite_capture::{FileProvider, CAPTURE_HEIGHT, CAPTURE_WIDTH};
    use image::{Rgb, RgbImage};

    fn write_screen(dir: &Path, pixels: &[(u32, u32, [u8; 3])]) -> std::path::PathBuf {
        let mut img = RgbImage::new(CAPTURE_WIDTH, CAPTURE_HEIGHT);
        for &(x, y, rgb) in pixels {
            img.put_pixel(x, y, Rgb(rgb));
        }
        let path = dir.join("screen.png");
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_parse_before_fetch_fails() {
        let mut observer = Observer::new(FileProvider::new("/nonexistent/screen.png"));
        assert!(observer.parse_game().is_err());
        assert!(observer.parse_altar().is_err());
        assert!(observer.fetch_screenshot().is_err());
        assert!(observer.screenshot().is_none());
    }

    #[test]
    fn test_observe_playing_screen() {
        let dir = tempfile::tempdir().unwrap();
        // Two healthy hearts and the spear
        let path = write_screen(
            dir.path(),
            &[
                (66, 1714, [189, 36, 49]),
                (146, 1714, [189, 36, 49]),
                (902, 1816, [239, 138, 49]),
            ],
        );
        let mut observer = Observer::new(FileProvider::new(&path));

        let observation = observer.observe().unwrap();
        assert_eq!(observation.interface, Interface::Playing);
        assert!(observation.altar.is_none());
        let game = observation.game.unwrap();
        assert_eq!(game.status.health, 2);
        assert!(game.status.spear);
        assert_eq!(observer.parse_game().unwrap(), game);
    }

    #[test]
    fn test_observe_death_screen() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_screen(dir.path(), &[(640, 635, [165, 0, 0])]);
        let mut observer = Observer::new(FileProvider::new(&path));

        let observation = observer.observe().unwrap();
        assert_eq!(observation.interface, Interface::Death);
        assert!(observation.game.is_none());
        assert!(observation.altar.is_none());
    }

    #[test]
    fn test_observe_altar_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut pixels = vec![(1000, 600, [90, 69, 41])];
        // One divider and a Surge entry below it
        pixels.push((40, 500, [90, 69, 41]));
        pixels.push((340, 586, [255, 255, 255]));
        let path = write_screen(dir.path(), &pixels);
        let mut observer = Observer::new(FileProvider::new(&path));

        let observation = observer.observe().unwrap();
        assert_eq!(observation.interface, Interface::Altar);
        let altar = observation.altar.unwrap();
        assert_eq!(altar.row(hoplite_state::Prayer::Surge), Some(500));
    }

    #[test]
    fn test_save_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_screen(dir.path(), &[]);
        let mut observer = Observer::new(FileProvider::new(&path));
        assert!(observer.save_screenshot(&dir.path().join("none.png")).is_err());

        observer.fetch_screenshot().unwrap();
        let saved = dir.path().join("saved.png");
        observer.save_screenshot(&saved).unwrap();
        assert!(saved.exists());
    }
}
