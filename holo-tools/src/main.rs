//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod config;
mod error;
mod input;

use clap::{App, Arg};
use config::{Config, LoggingFmtStyle};
use error::Error;
use holo_dissect::{BoundedReader, DecodeOutput, PduKind};
use input::{parse_hex, read_input};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;

const DFLT_SYSTEM_ID_LEN: u8 = 6;
// Largest System ID length allowed in the PDU header.
const MAX_SYSTEM_ID_LEN: u8 = 8;

fn init_tracing(config: &config::Logging) {
    // Logs go to stderr so the JSON output stays clean.
    let stderr = config.enabled.then(|| {
        let log_level_filter = LevelFilter::from_level(tracing::Level::TRACE);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(config.show_source)
            .with_line_number(config.show_source)
            .with_ansi(config.colors);
        let layer = match config.style {
            LoggingFmtStyle::Compact => layer.compact().boxed(),
            LoggingFmtStyle::Full => layer.boxed(),
            LoggingFmtStyle::Json => layer.json().boxed(),
            LoggingFmtStyle::Pretty => layer.pretty().boxed(),
        };
        layer.with_filter(log_level_filter)
    });

    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr)
        .init();
}

fn run(
    filename: &str,
    hex: bool,
    kind: PduKind,
    system_id_len: u8,
    config: &Config,
) -> Result<DecodeOutput, Error> {
    let bytes = read_input(filename)?;
    let bytes = match hex {
        true => parse_hex(&bytes)?,
        false => bytes,
    };
    info!(%filename, length = bytes.len(), %kind, "decoding PDU");

    let buf = BoundedReader::new(bytes.into());
    let output = holo_dissect::decode_pdu_with_config(
        buf,
        kind,
        system_id_len,
        &config.decode,
    );
    Ok(output)
}

fn parse_level(level: &str) -> Result<PduKind, Error> {
    level
        .parse::<u8>()
        .ok()
        .and_then(PduKind::from_level)
        .ok_or_else(|| Error::InvalidLevel(level.to_owned()))
}

fn parse_system_id_len(len: &str) -> Result<u8, Error> {
    len.parse::<u8>()
        .ok()
        .filter(|len| (1..=MAX_SYSTEM_ID_LEN).contains(len))
        .ok_or_else(|| Error::InvalidSystemIdLen(len.to_owned()))
}

// ===== main =====

fn main() {
    // Parse command-line parameters.
    let matches = App::new("IS-IS LSP dissector")
        .about("Decode an IS-IS LSP into a tree of labeled fields")
        .arg(
            Arg::with_name("level")
                .short("l")
                .long("level")
                .value_name("level")
                .help("LSP level (1 or 2)")
                .default_value("1"),
        )
        .arg(
            Arg::with_name("system-id-len")
                .long("system-id-len")
                .value_name("length")
                .help("System ID length in bytes")
                .default_value("6"),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("file")
                .help("Specify an alternative configuration file."),
        )
        .arg(
            Arg::with_name("hex")
                .long("hex")
                .help("Input file holds hex text instead of raw bytes"),
        )
        .arg(
            Arg::with_name("FILENAME")
                .help("PDU file path ('-' for stdin)")
                .required(true)
                .index(1),
        )
        .get_matches();

    let result = (|| {
        let config = Config::load(matches.value_of("config"))?;
        init_tracing(&config.logging);

        let kind = parse_level(matches.value_of("level").unwrap_or("1"))?;
        let system_id_len = match matches.value_of("system-id-len") {
            Some(len) => parse_system_id_len(len)?,
            None => DFLT_SYSTEM_ID_LEN,
        };
        let filename = matches.value_of("FILENAME").unwrap_or("-");
        let hex = matches.is_present("hex");
        let output = run(filename, hex, kind, system_id_len, &config)?;

        let json =
            serde_json::to_string_pretty(&output).map_err(Error::Output)?;
        println!("{}", json);
        Ok::<_, Error>(output.has_errors())
    })();

    match result {
        Ok(false) => (),
        Ok(true) => std::process::exit(2),
        Err(error) => {
            error!(%error, "failed to decode PDU");
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }
}

// ===== unit tests =====
