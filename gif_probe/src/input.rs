//! Input source selection.

use std::fs::File;
use std::io::{self, BufReader, Read};

use anyhow::Context;

/// Open `input` for reading; `-` selects stdin.
pub fn open(input: &str) -> anyhow::Result<Box<dyn Read>> {
    if input == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file = File::open(input).with_context(|| format!("failed to open {input}"))?;
    Ok(Box::new(BufReader::new(file)))
}
