//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

// Dissector tool errors.
#[derive(Debug)]
pub enum Error {
    ConfigRead(String, std::io::Error),
    ConfigParse(toml::de::Error),
    InputRead(String, std::io::Error),
    InvalidHex(hex::FromHexError),
    InvalidLevel(String),
    InvalidSystemIdLen(String),
    Output(serde_json::Error),
}

// ===== impl Error =====

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ConfigRead(path, ..) => {
                write!(f, "failed to read configuration file {}", path)
            }
            Error::ConfigParse(..) => {
                write!(f, "failed to parse configuration file")
            }
            Error::InputRead(path, ..) => {
                write!(f, "failed to read input file {}", path)
            }
            Error::InvalidHex(..) => {
                write!(f, "invalid hex input")
            }
            Error::InvalidLevel(level) => {
                write!(f, "invalid level {} (should be 1 or 2)", level)
            }
            Error::InvalidSystemIdLen(len) => {
                write!(f, "invalid System ID length {}", len)
            }
            Error::Output(..) => {
                write!(f, "failed to serialize the decoded PDU")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigRead(_, error) | Error::InputRead(_, error) => {
                Some(error)
            }
            Error::ConfigParse(error) => Some(error),
            Error::InvalidHex(error) => Some(error),
            Error::Output(error) => Some(error),
            _ => None,
        }
    }
}
