use anyhow::Result;
use std::path::Path;
use tracing::info;

use hoplite_capture::Capture;
use hoplite_vision::ScreenParser;

use crate::observer::{observe_capture, Observation};

/// Parse a screenshot file.
pub fn parse(image: &Path, mut parser: ScreenParser) -> Result<Observation> {
    let capture = Capture::open(image)?;
    info!("Parsing {}", image.display());
    Ok(observe_capture(&mut parser, &capture)?)
}
