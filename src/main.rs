//! neongen - prompt-to-image CLI backed by Gemini.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod controller;
mod data_uri;
mod error;
mod logging;
mod model;
mod output;
mod params;
mod ports;

use std::path::Path;
use std::process;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::controller::{
    Dispatch, GenerationController, GenerationState, GenerationStatus, SkipReason,
};
use crate::data_uri::DataUri;
use crate::error::GenerationError;
use crate::model::{resolve_model, validate_model};
use crate::output::{resolve_output_path, save_image, target_format};
use crate::params::{validate_format, AspectRatio};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Returns whether the last attempt succeeded.
async fn run(cli: Cli) -> Result<bool, GenerationError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(GenerationError::Config)?;

    let prompt = if cli.interactive { None } else { Some(cli.resolve_prompt()?) };

    let model_name = cli.model.as_deref().unwrap_or(&config.defaults.model);
    let model = resolve_model(model_name);
    validate_model(&model).map_err(GenerationError::InvalidArgument)?;

    let aspect_ratio: AspectRatio = cli
        .aspect_ratio
        .as_deref()
        .unwrap_or(&config.defaults.aspect_ratio)
        .parse()
        .map_err(GenerationError::InvalidArgument)?;
    if let Some(ref format) = cli.format {
        validate_format(format).map_err(GenerationError::InvalidArgument)?;
    }

    tracing::debug!(%model, requested = model_name, %aspect_ratio, "resolved parameters");

    // Live, recording, or replaying
    let replay_path = std::env::var("NEONGEN_REPLAY").ok();
    let is_recording = std::env::var("NEONGEN_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::debug!(cassette = %cassette_path, "replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::debug!("recording enabled");
        let (ctx, session) = ServiceContext::recording(&config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config)?, None)
    };

    let controller = GenerationController::new(ctx.generator, model);
    let renderer = tokio::spawn(render(controller.subscribe()));

    let outcome = match prompt {
        Some(prompt) => generate_once(&controller, &cli, &prompt, aspect_ratio).await,
        None => interactive(&controller, &cli, aspect_ratio).await,
    };

    // Closing the state channel lets the renderer drain and exit.
    drop(controller);
    if let Err(e) = renderer.await {
        tracing::warn!(error = %e, "progress renderer failed");
    }

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    outcome
}

async fn generate_once(
    controller: &GenerationController,
    cli: &Cli,
    prompt: &str,
    aspect_ratio: AspectRatio,
) -> Result<bool, GenerationError> {
    match controller.generate(prompt, aspect_ratio).await {
        Dispatch::Completed(state) => match settle(&state) {
            Some(image) => deliver(cli, prompt, &image).map(|()| true),
            None => Ok(false),
        },
        Dispatch::Skipped(SkipReason::EmptyPrompt) => {
            Err(GenerationError::InvalidArgument("Prompt is empty".into()))
        }
        Dispatch::Skipped(SkipReason::InFlight) => Ok(false),
    }
}

/// One prompt per stdin line; `/ratio <w:h>` switches the aspect ratio.
async fn interactive(
    controller: &GenerationController,
    cli: &Cli,
    mut aspect_ratio: AspectRatio,
) -> Result<bool, GenerationError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_ok = true;

    while let Some(line) = lines.next_line().await? {
        if let Some(ratio) = line.trim().strip_prefix("/ratio") {
            match ratio.trim().parse() {
                Ok(r) => {
                    aspect_ratio = r;
                    eprintln!("Aspect ratio: {aspect_ratio}");
                }
                Err(e) => eprintln!("{e}"),
            }
            continue;
        }

        if let Dispatch::Completed(state) = controller.generate(&line, aspect_ratio).await {
            last_ok = match settle(&state).map(|image| deliver(cli, &line, &image)) {
                Some(Ok(())) => true,
                Some(Err(e)) => {
                    eprintln!("Error: {e}");
                    false
                }
                None => false,
            };
        }
    }

    Ok(last_ok)
}

/// Report a settled attempt, returning the image on success.
fn settle(state: &GenerationState) -> Option<DataUri> {
    if let Some(message) = state.current_error() {
        eprintln!("Error: {message}");
    }
    state.current_image().cloned()
}

/// Hand a finished image to the user: stdout as a data URI, or a file.
fn deliver(cli: &Cli, prompt: &str, image: &DataUri) -> Result<(), GenerationError> {
    if cli.data_uri {
        println!("{image}");
        return Ok(());
    }
    let format = target_format(cli.format.as_deref(), image);
    let path = resolve_output_path(cli.output.as_deref(), prompt, format);
    save_image(image, format, &path)?;
    eprintln!("Saved: {}", path.display());
    Ok(())
}

/// Show progress while attempts are in flight, until the controller goes away.
///
/// Settled states are reported by the caller, which sees every one of them;
/// the channel only guarantees the latest.
async fn render(mut states: watch::Receiver<GenerationState>) {
    while states.changed().await.is_ok() {
        if states.borrow_and_update().status() == GenerationStatus::Loading {
            eprintln!("Generating...");
        }
    }
}
