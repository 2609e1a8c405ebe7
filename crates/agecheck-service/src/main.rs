//! `agecheck` command-line front end.

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use agecheck_models::InferenceResponse;
use agecheck_service::{run_inference, ServiceError};
use agecheck_vision::Image;
use anyhow::{bail, Context};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "\
Usage:
  agecheck estimate [REQUEST_FILE]        Estimate age for a JSON request (stdin if omitted or '-')
  agecheck encode WIDTH HEIGHT INTENSITY  Print the base64 image payload
  agecheck schema                         Print the JSON schema of a success response

Environment:
  AGE_SERVICE_CONFIG   Configuration file (default: config/age_service.json)
  AGE_SERVICE_*        Configuration overrides, nested keys separated by '__'
  LOG_FORMAT=json      Emit JSON logs on stderr
";

/// Exit code for a request rejected by validation or inference.
const EXIT_REJECTED: u8 = 2;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agecheck=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

fn run(args: &[String]) -> anyhow::Result<ExitCode> {
    match args.first().map(String::as_str) {
        Some("estimate") => estimate(args.get(1).map(String::as_str)),
        Some("encode") => encode(&args[1..]),
        Some("schema") => {
            let schema = schemars::schema_for!(InferenceResponse);
            print_json(&schema)?;
            Ok(ExitCode::SUCCESS)
        }
        Some("-h") | Some("--help") | Some("help") => {
            print!("{}", USAGE);
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            eprint!("{}", USAGE);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn estimate(source: Option<&str>) -> anyhow::Result<ExitCode> {
    let raw = match source {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read request {}", path))?
        }
    };
    let payload: serde_json::Value =
        serde_json::from_str(&raw).context("Request is not valid JSON")?;

    match run_inference(&payload, None, None, None) {
        Ok(response) => {
            print_json(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(ServiceError::Estimation(e)) => {
            info!(kind = e.kind(), "Request not estimated");
            print_json(&e.to_body())?;
            if e.is_rejection() {
                Ok(ExitCode::from(EXIT_REJECTED))
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Err(ServiceError::Config(e)) => Err(e).context("Configuration error"),
    }
}

fn encode(args: &[String]) -> anyhow::Result<ExitCode> {
    let [width, height, intensity] = args else {
        bail!("encode expects WIDTH HEIGHT INTENSITY");
    };
    let width: u64 = width.parse().context("WIDTH must be a positive integer")?;
    let height: u64 = height.parse().context("HEIGHT must be a positive integer")?;
    let intensity: f64 = intensity.parse().context("INTENSITY must be a number")?;

    let image = Image::new(width, height, intensity)?;
    println!("{}", image.encode_base64());
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write output")?;
    writeln!(stdout)?;
    Ok(())
}
