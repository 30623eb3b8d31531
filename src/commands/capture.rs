use anyhow::Result;
use tracing::info;

use hoplite_capture::{CommandProvider, FileProvider, SnapshotProvider, WindowProvider};
use hoplite_vision::ScreenParser;

use super::{Source, WatchArgs};
use crate::pipeline::Pipeline;

fn provider(source: &Source) -> Result<Box<dyn SnapshotProvider>> {
    if let Some(path) = &source.file {
        return Ok(Box::new(FileProvider::new(path)));
    }
    if let Some(title) = &source.window {
        return Ok(Box::new(WindowProvider::new(title)));
    }
    if source.adb {
        return Ok(Box::new(CommandProvider::adb()));
    }
    anyhow::bail!("No screenshot source given")
}

/// Run the pipeline until Ctrl-C, printing each new observation on stdout.
pub async fn watch(args: &WatchArgs, parser: ScreenParser) -> Result<()> {
    let provider = provider(&args.source)?;
    info!("Watching {}", provider.name());

    let pipeline = Pipeline::start(provider, parser, args.interval_ms);
    let mut observations = pipeline.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            changed = observations.changed() => {
                if changed.is_err() {
                    break;
                }
                let observation = observations.borrow_and_update().clone();
                if let Some(observation) = observation {
                    println!("{}", serde_json::to_string(&observation)?);
                }
            }
        }
    }

    pipeline.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_provider_selection() {
        let source = Source {
            file: Some(PathBuf::from("screen.png")),
            window: None,
            adb: false,
        };
        assert_eq!(provider(&source).unwrap().name(), "file screen.png");

        let source = Source {
            file: None,
            window: None,
            adb: true,
        };
        assert_eq!(provider(&source).unwrap().name(), "adb exec-out screencap -p");

        let source = Source {
            file: None,
            window: None,
            adb: false,
        };
        assert!(provider(&source).is_err());
    }
}
