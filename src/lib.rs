mod commands;
mod observer;
mod pipeline;

use anyhow::Result;
use clap::Parser;

pub use observer::{observe_capture, Observation, Observer};
pub use pipeline::Pipeline;

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hoplite_observer=info,hoplite_vision=info,hoplite_capture=info".into()
            }),
        )
        .init();

    let cli = commands::Cli::parse();
    let data_dir = commands::resolve_data_dir(cli.data_dir);
    tracing::info!("Data directory: {}", data_dir.display());

    match cli.command {
        commands::Command::Parse { image, parts_dir } => {
            let parser = commands::build_parser(&data_dir, parts_dir.as_deref())?;
            let observation = commands::parse(&image, parser)?;
            println!("{}", serde_json::to_string_pretty(&observation)?);
        }
        commands::Command::Watch(args) => {
            let parser = commands::build_parser(&data_dir, args.parts_dir.as_deref())?;
            commands::watch(&args, parser).await?;
        }
    }
    Ok(())
}
