pub mod analyze;
pub mod generate;
pub mod simulate;
pub mod theory;

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use entropyhunter_core::HunterConfig;
use log::{debug, warn};
use serde::Serialize;

/// Load `--config`, or the defaults when no path is given.
pub fn load_config(path: Option<&str>) -> Result<HunterConfig> {
    match path {
        Some(p) => {
            let cfg = HunterConfig::load(p).with_context(|| format!("loading config {p}"))?;
            debug!("loaded config from {p}: {cfg:?}");
            Ok(cfg)
        }
        None => Ok(HunterConfig::default()),
    }
}

/// Split file contents into tokens: one per line, line endings stripped,
/// whitespace-only lines dropped.
pub fn parse_tokens(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a token file. Invalid UTF-8 is replaced rather than rejected.
pub fn read_tokens(path: &str) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading tokens from {path}"))?;
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            warn!("{path} is not valid UTF-8; invalid sequences replaced");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    let tokens = parse_tokens(&text);
    debug!("read {} tokens from {path}", tokens.len());
    Ok(tokens)
}

/// Write one item per line.
pub fn write_lines<'a>(path: &str, lines: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut out = BufWriter::new(file);
    for line in lines {
        writeln!(out, "{line}").with_context(|| format!("writing {path}"))?;
    }
    out.flush().with_context(|| format!("writing {path}"))?;
    Ok(())
}

/// Pretty-print `value` as JSON into `path`.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing report")?;
    std::fs::write(path, json).with_context(|| format!("writing {path}"))?;
    Ok(())
}

/// Printable form of a symbol; the padding sentinel is shown escaped.
pub fn display_symbol(sym: char) -> String {
    if sym == entropyhunter_core::PAD_SYMBOL {
        "\\u0000".to_string()
    } else {
        sym.to_string()
    }
}
