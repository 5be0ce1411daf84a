use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// How real numbers are rendered when a value is converted to a string.
///
/// `width` is the minimum field width (zero padded), `trailing` the number of
/// fractional digits produced before trimming, and `force` the number of
/// fractional digits that are kept even when they are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub width: u16,
    pub trailing: u16,
    pub force: u16,
}

impl NumberFormat {
    pub const fn new(width: u16, trailing: u16, force: u16) -> Self {
        Self { width, trailing, force }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(0, 6, 0)
    }
}

/// Runtime options consulted by the conversion engine and the invocation layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub number_format: NumberFormat,
    /// Treat a leading `0` as an octal prefix when parsing numbers.
    pub convert_octals: bool,
    /// Offer failed invocations to the attached debugger hook.
    pub interactive: bool,
    pub max_reentrancy_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            number_format: NumberFormat::default(),
            convert_octals: false,
            interactive: false,
            max_reentrancy_depth: 256,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).context("invalid runtime configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        Self::from_toml_str(&src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = RuntimeConfig::from_toml_str(
            r#"
            convert_octals = true

            [number_format]
            trailing = 2
            "#,
        )
        .unwrap();
        assert!(cfg.convert_octals);
        assert_eq!(cfg.number_format, NumberFormat::new(0, 2, 0));
        assert_eq!(cfg.max_reentrancy_depth, 256);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strand.toml");
        std::fs::write(&path, "interactive = true\n").unwrap();
        let cfg = RuntimeConfig::load(&path).unwrap();
        assert!(cfg.interactive);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(RuntimeConfig::from_toml_str("convert_octals = 3").is_err());
    }
}
