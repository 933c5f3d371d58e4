//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use holo_dissect::DecodeConfig;
use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub decode: DecodeConfig,
    pub logging: Logging,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub enabled: bool,
    pub style: LoggingFmtStyle,
    pub colors: bool,
    pub show_source: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFmtStyle {
    Compact,
    Full,
    Json,
    Pretty,
}

// ===== impl Config =====

impl Config {
    const DFLT_FILEPATH: &'static str = "/etc/holo-dissect.toml";

    // A missing default configuration file isn't an error.
    pub(crate) fn load(config_file: Option<&str>) -> Result<Config, Error> {
        let explicit = config_file.is_some();
        let config_file = config_file.unwrap_or(Config::DFLT_FILEPATH);

        match std::fs::read_to_string(config_file) {
            Ok(config_str) => Config::parse(&config_str),
            Err(error) if explicit => {
                Err(Error::ConfigRead(config_file.to_owned(), error))
            }
            Err(_) => Ok(Config::default()),
        }
    }

    pub(crate) fn parse(config_str: &str) -> Result<Config, Error> {
        toml::from_str(config_str).map_err(Error::ConfigParse)
    }
}

// ===== impl Logging =====

impl Default for Logging {
    fn default() -> Logging {
        Logging {
            enabled: false,
            style: LoggingFmtStyle::Compact,
            colors: false,
            show_source: false,
        }
    }
}

// ===== unit tests =====
