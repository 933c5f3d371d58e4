//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::io::Read;

use crate::error::Error;

// ===== global functions =====

pub(crate) fn read_input(filename: &str) -> Result<Vec<u8>, Error> {
    match filename {
        "-" => {
            let mut bytes = vec![];
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|error| Error::InputRead("-".to_owned(), error))?;
            Ok(bytes)
        }
        _ => std::fs::read(filename)
            .map_err(|error| Error::InputRead(filename.to_owned(), error)),
    }
}

// Parses hex text, ignoring whitespace, an optional "0x" prefix on each
// byte group and separators such as ':', ',' and '-'.
pub(crate) fn parse_hex(text: &[u8]) -> Result<Vec<u8>, Error> {
    let text = String::from_utf8_lossy(text);
    let digits = text
        .split(|c: char| {
            c.is_ascii_whitespace() || c == ':' || c == ',' || c == '-'
        })
        .map(|group| {
            group
                .strip_prefix("0x")
                .or_else(|| group.strip_prefix("0X"))
                .unwrap_or(group)
        })
        .collect::<String>();
    hex::decode(digits).map_err(Error::InvalidHex)
}

// ===== unit tests =====
