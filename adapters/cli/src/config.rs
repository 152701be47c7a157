//! Loading of the trooper configuration file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use bampf_core::TrooperConfig;

/// Reads and validates the configuration, falling back to the defaults when
/// no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<TrooperConfig> {
    let Some(path) = path else {
        return Ok(TrooperConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read trooper config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid trooper config at {}", path.display()))
}

fn parse(contents: &str) -> Result<TrooperConfig> {
    let config: TrooperConfig =
        toml::from_str(contents).context("failed to parse trooper config toml contents")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_matches_the_defaults() {
        let config = parse(include_str!("../trooper.toml")).expect("bundled config parses");

        assert_eq!(config, TrooperConfig::default());
    }

    #[test]
    fn missing_sections_keep_their_defaults() {
        let config = parse("[energy]\ncloak_drain = 8\n").expect("partial config parses");

        assert_eq!(config.energy.cloak_drain, 8);
        assert_eq!(config.energy.cloak_max, 1000);
        assert_eq!(config.cells, TrooperConfig::default().cells);
    }

    #[test]
    fn invalid_values_are_reported() {
        let error = parse("[energy]\ncloak_start = 5000\n").expect_err("cloak start is too large");

        assert_eq!(error.to_string(), "cloak_start 5000 exceeds cloak_max 1000");
    }

    #[test]
    fn malformed_toml_is_reported() {
        let error = parse("[cells]\ngain = [1, 2]\n").expect_err("gain table needs five entries");

        assert!(error
            .to_string()
            .contains("failed to parse trooper config toml contents"));
    }

    #[test]
    fn absent_path_uses_the_defaults() {
        assert_eq!(load(None).expect("defaults"), TrooperConfig::default());
    }
}
