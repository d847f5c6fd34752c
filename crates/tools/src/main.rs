mod scenario;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::Generation;
use mapview::sim::SimSurfaceFactory;
use mapview::{AuthorizationStatus, MapConfig};
use style::{AugmentConfig, StyleAugmenter, StyleDocument, StyleMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay map-session scenarios against a simulated engine")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON scenario and print the resulting session state
    Run {
        /// Scenario file: a JSON array of steps
        scenario: PathBuf,

        /// Vector style endpoint (overrides MAP_VECTOR_STYLE_URL)
        #[arg(long)]
        vector_style_url: Option<String>,

        /// Style document the simulated engine serves for the vector endpoint
        #[arg(long)]
        vector_style: Option<PathBuf>,

        /// Initial style mode: raster, vector-flat or vector-3d
        #[arg(long)]
        mode: Option<String>,

        /// Location authorization status at startup
        #[arg(long, default_value = "not_determined")]
        authorization: String,
    },

    /// Run style augmentation on a style file and print the result
    Style {
        style: PathBuf,

        #[arg(long, default_value = "vector-3d")]
        mode: String,

        #[arg(long, default_value = "en")]
        language: String,

        /// Identifier of the vector tile source
        #[arg(long, default_value = style::DEFAULT_VECTOR_SOURCE_ID)]
        source_id: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    match Args::parse().command {
        Command::Run {
            scenario,
            vector_style_url,
            vector_style,
            mode,
            authorization,
        } => cmd_run(scenario, vector_style_url, vector_style, mode, authorization),
        Command::Style {
            style,
            mode,
            language,
            source_id,
        } => cmd_style(style, mode, language, source_id),
    }
}

fn cmd_run(
    scenario: PathBuf,
    vector_style_url: Option<String>,
    vector_style: Option<PathBuf>,
    mode: Option<String>,
    authorization: String,
) -> Result<(), String> {
    let mut config = MapConfig::from_env().map_err(|e| format!("config: {e}"))?;
    if let Some(url) = vector_style_url {
        config.vector_style_url = Some(url);
    }
    if let Some(raw) = mode {
        config.initial_mode = parse_mode(&raw)?;
        config.initial_viewport.pitch = config.initial_mode.required_pitch();
    }
    let status = parse_authorization(&authorization)?;

    let mut factory = SimSurfaceFactory::new();
    if let Some(path) = vector_style {
        let url = config
            .vector_style_url
            .clone()
            .ok_or("--vector-style needs a vector style endpoint")?;
        let doc = read_style(&path)?;
        factory = factory.with_style(url.trim(), doc);
    }

    let json = fs::read_to_string(&scenario).map_err(|e| format!("read {scenario:?}: {e}"))?;
    let steps = scenario::parse_steps(&json)?;
    info!(steps = steps.len(), path = ?scenario, "scenario loaded");

    let report = scenario::replay(config, factory, status, &steps);
    let out = serde_json::to_string_pretty(&report).map_err(|e| format!("json: {e}"))?;
    println!("{out}");
    Ok(())
}

fn cmd_style(style: PathBuf, mode: String, language: String, source_id: String) -> Result<(), String> {
    let mode = parse_mode(&mode)?;
    let mut doc = read_style(&style)?;

    let mut augmenter = StyleAugmenter::new(AugmentConfig {
        vector_source_id: source_id,
        language,
    });
    let report = augmenter.augment(&mut doc, mode, Generation::new(1));
    info!(?report, "augmentation finished");

    let out = doc.to_json_pretty().map_err(|e| e.to_string())?;
    println!("{out}");
    Ok(())
}

fn read_style(path: &PathBuf) -> Result<StyleDocument, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    StyleDocument::from_json(&json).map_err(|e| format!("{path:?}: {e}"))
}

fn parse_mode(raw: &str) -> Result<StyleMode, String> {
    StyleMode::parse(raw).ok_or_else(|| format!("unknown style mode: {raw}"))
}

fn parse_authorization(raw: &str) -> Result<AuthorizationStatus, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .map_err(|_| format!("unknown authorization status: {raw}"))
}
