#![deny(unsafe_code)]
//! CLI binary for the field-studio visualizations.
//!
//! Subcommands:
//! - `render <scene>`: advance a scene's clock N frames, write the frame as JSON
//! - `list`: print available scenes

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use field_studio_core::Scene;
use field_studio_scenes::SceneKind;
use std::path::PathBuf;
use std::process;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "field-studio", version, about = "Procedural field visualization CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Logging verbosity (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Advance a scene N frames and write the resulting frame as JSON.
    Render {
        /// Scene name (e.g. "topography").
        scene: String,

        /// Canvas width in canvas units.
        #[arg(short = 'W', long, default_value_t = 600)]
        width: usize,

        /// Canvas height in canvas units.
        #[arg(short = 'H', long, default_value_t = 400)]
        height: usize,

        /// Number of clock steps before the frame is taken.
        #[arg(short, long, default_value_t = 0)]
        frames: usize,

        /// Seconds per clock step.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,

        /// PRNG seed for deterministic source placement.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output file path.
        #[arg(short, long, default_value = "frame.json")]
        output: PathBuf,

        /// Scene parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available scenes.
    List,
}

fn log_level(name: &str) -> Result<Level, CliError> {
    match name.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(CliError::Input(format!("unknown log level: {other}"))),
    }
}

fn init_logging(name: &str) -> Result<(), CliError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(name)?)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| CliError::Input(e.to_string()))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let scenes = SceneKind::list_scenes();
            if cli.json {
                let info = serde_json::json!({ "scenes": scenes });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Scenes:");
                for name in scenes {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            scene,
            width,
            height,
            frames,
            dt,
            seed,
            output,
            params,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;

            let mut sc = SceneKind::from_name(&scene, width, height, seed, &params)?;

            (0..frames).for_each(|_| sc.step(dt));

            let frame = sc.frame();
            info!(scene = %scene, time = sc.clock().time(), kind = frame.kind(), items = frame.len(), "frame ready");
            field_studio_scenes::export::write_frame_json(&frame, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "scene": scene,
                    "width": width,
                    "height": height,
                    "frames": frames,
                    "time": sc.clock().time(),
                    "seed": seed,
                    "kind": frame.kind(),
                    "items": frame.len(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {scene} ({width}x{height}, {frames} frames, seed {seed}): {} {} -> {}",
                    frame.len(),
                    frame.kind(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    let result = init_logging(&cli.log_level).and_then(|()| run(cli));
    if let Err(e) = result {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_args_parse_with_defaults() {
        let cli = Cli::try_parse_from(["field-studio", "render", "topography"]).unwrap();
        match cli.command {
            Command::Render {
                scene,
                width,
                height,
                frames,
                seed,
                ..
            } => {
                assert_eq!(scene, "topography");
                assert_eq!((width, height, frames, seed), (600, 400, 0, 42));
            }
            Command::List => panic!("expected render"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["field-studio", "list", "--json", "--log-level", "debug"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn log_level_names_are_case_insensitive() {
        assert_eq!(log_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(log_level("loud").unwrap_err().exit_code(), 12);
    }

    #[test]
    fn unknown_scene_exits_with_scene_code() {
        let cli = Cli::try_parse_from(["field-studio", "render", "mandelbrot"]).unwrap();
        assert_eq!(run(cli).unwrap_err().exit_code(), 10);
    }

    #[test]
    fn bad_params_exit_with_input_code() {
        let cli = Cli::try_parse_from(["field-studio", "render", "turbulence", "--params", "{"]).unwrap();
        assert_eq!(run(cli).unwrap_err().exit_code(), 12);
    }
}
