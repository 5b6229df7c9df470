//! Scenario files: fourteen lines, one value each, in `SimConfig` field
//! order. Letters, `=` and `_` are stripped from every line before parsing,
//! so `attacker_currency = 100000` and `100000` read the same.

use super::config::SimConfig;
use crate::error::ConfigError;
use std::path::Path;
use std::str::FromStr;

const FIELDS: [&str; 14] = [
    "attacker_currency",
    "defender_currency",
    "energy",
    "defender_servers",
    "server_yield",
    "good_traffic_fraction",
    "bots_count",
    "bot_bandwidth",
    "firewall_type",
    "server_cost",
    "energy_cost",
    "bot_cost",
    "firewall_cost",
    "server_energy_cost",
];

pub fn load_scenario(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = parse_scenario(&text)?;
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        config.name = stem.to_string();
    }
    Ok(config)
}

/// Parses scenario text on top of `SimConfig::default()`; the extra fields
/// (seed, strategies, tier tables) keep their defaults.
pub fn parse_scenario(text: &str) -> Result<SimConfig, ConfigError> {
    let lines: Vec<&str> = text.lines().collect();
    let reader = LineReader { lines: &lines };

    Ok(SimConfig {
        attacker_currency: reader.field(0, "an integer")?,
        defender_currency: reader.field(1, "an integer")?,
        energy: reader.field(2, "an integer")?,
        defender_servers: reader.field(3, "a non-negative integer")?,
        server_yield: reader.field(4, "an integer")?,
        good_traffic_fraction: reader.field(5, "a number")?,
        bots_count: reader.field(6, "a non-negative integer")?,
        bot_bandwidth: reader.field(7, "a number")?,
        firewall_type: reader.field(8, "a number")?,
        server_cost: reader.field(9, "a number")?,
        energy_cost: reader.field(10, "a number")?,
        bot_cost: reader.field(11, "a number")?,
        firewall_cost: reader.field(12, "a number")?,
        server_energy_cost: reader.field(13, "a number")?,
        ..SimConfig::default()
    })
}

struct LineReader<'a> {
    lines: &'a [&'a str],
}

impl LineReader<'_> {
    fn field<T: FromStr>(&self, index: usize, expected: &'static str) -> Result<T, ConfigError> {
        let field = FIELDS[index];
        let line = index + 1;
        let raw = self
            .lines
            .get(index)
            .ok_or(ConfigError::MissingField { line, field })?;

        let cleaned = strip_labels(raw);
        if cleaned.is_empty() {
            return Err(ConfigError::MissingField { line, field });
        }

        cleaned.parse().map_err(|_| ConfigError::InvalidNumber {
            line,
            field,
            expected,
            value: raw.trim().to_string(),
        })
    }
}

fn strip_labels(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_ascii_alphabetic() && *c != '=' && *c != '_')
        .collect::<String>()
        .trim()
        .to_string()
}
