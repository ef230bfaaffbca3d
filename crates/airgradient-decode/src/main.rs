mod config;
mod telemetry;

use std::io::Read;

use airgradient_payload::{AirGradientDecoder, PayloadDecoder};
use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::config::ServiceConfig;

fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_logging(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!("Configuration: {:?}", config);

    match run(&config, std::env::args().nth(1)) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!(error = %format!("{:#}", e), "Failed to decode payload");
            std::process::exit(1);
        }
    }
}

fn run(config: &ServiceConfig, arg: Option<String>) -> Result<String> {
    let text = read_input(arg)?;
    let bytes = config
        .input_format
        .parse_bytes(&text)
        .with_context(|| format!("failed to read {} payload", config.input_format))?;

    let decoder = AirGradientDecoder::with_scaling(config.scaling());
    render(&decoder, &bytes, config.pretty)
}

/// Payload text from the first argument, or all of stdin when absent.
fn read_input(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) => Ok(text),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read payload from stdin")?;
            Ok(text)
        }
    }
}

fn render(decoder: &dyn PayloadDecoder, bytes: &[u8], pretty: bool) -> Result<String> {
    let value = decoder
        .decode(bytes)
        .context("failed to decode payload")?;

    info!(
        payload_size = bytes.len(),
        readings = value["readingCount"].as_u64().unwrap_or_default(),
        "Decoded payload"
    );

    let output = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(output)
}
