use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

const DEFAULT_CONFIG: &str = include_str!("../../sage-layout.default.toml");

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap_or_default().join(".sage-layout.toml") }

/// Which packer arranges the selection.
#[derive(
    Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PackStrategy {
    /// Growing binary tree, largest window first
    #[default]
    BinaryTree,
    /// Shelf packing into a near-square strip, tallest window first
    Potpack,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Default tracing filter when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub layout: LayoutSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    #[serde(default)]
    pub strategy: PackStrategy,
    /// Space kept between arranged windows, in board units. Half of it is
    /// added on every side of each window before packing.
    #[serde(default = "default_padding")]
    pub padding: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            layout: LayoutSettings::default(),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            strategy: PackStrategy::default(),
            padding: default_padding(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.log_filter.trim().is_empty() {
            issues.push("log_filter must not be empty".to_string());
        }

        issues.extend(self.layout.validate());

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.log_filter.trim().is_empty() {
            self.log_filter = default_log_filter();
            fixes += 1;
        }

        fixes += self.layout.auto_fix_values();

        fixes
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.padding.is_finite() || self.padding < 0.0 {
            issues.push(format!(
                "layout.padding must be a non-negative number, got {}",
                self.padding
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !self.padding.is_finite() || self.padding < 0.0 {
            self.padding = default_padding();
            fixes += 1;
        }

        fixes
    }
}

fn default_padding() -> f64 { 30.0 }

fn default_log_filter() -> String { "warn".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self::parse(DEFAULT_CONFIG).unwrap_or_else(|err| {
            warn!("built-in config did not parse: {err}");
            Config { settings: Settings::default() }
        })
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    /// Reads `path` when it exists, otherwise falls back to the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if path.exists() { Self::read(path) } else { Ok(Self::default()) }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Writes the built-in defaults to `path` without reading the file that
    /// may already be there, so a broken file can be replaced.
    pub fn init(path: &Path, force: bool) -> anyhow::Result<()> {
        if path.exists() && !force {
            bail!("{} already exists, use --force to overwrite", path.display());
        }
        Config::default().save(path)
    }

    /// Issues with the file at `path`. A file that does not load is reported
    /// as a single issue instead of an error.
    pub fn check(path: &Path) -> Vec<String> {
        match Self::load(path) {
            Ok(config) => config.validate(),
            Err(err) => vec![format!("{err:#}")],
        }
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }

    fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str(buf)?) }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config { settings: Settings::default() });
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.settings.layout.padding, 30.0);
        assert_eq!(config.settings.layout.strategy, PackStrategy::BinaryTree);

        let config = Config::parse(
            r#"
            [settings.layout]
            strategy = "potpack"
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.layout.strategy, PackStrategy::Potpack);
        assert_eq!(config.settings.layout.padding, 30.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[settings.layout]\ngap = 3.0\n").is_err());
        assert!(Config::parse("[settings.layout]\nstrategy = \"spiral\"\n").is_err());
    }

    #[test]
    fn strategy_names_match_between_toml_and_cli() {
        assert_eq!(PackStrategy::from_str("binary_tree").unwrap(), PackStrategy::BinaryTree);
        assert_eq!(PackStrategy::from_str("potpack").unwrap(), PackStrategy::Potpack);
        assert_eq!(PackStrategy::Potpack.to_string(), "potpack");
        assert!(PackStrategy::from_str("maxrects").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());

        config.settings.layout.padding = -4.0;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("layout.padding must be a non-negative number"));

        let fixes = config.auto_fix_values();
        assert_eq!(fixes, 1);
        assert_eq!(config.settings.layout.padding, 30.0);

        config.settings.layout.padding = f64::NAN;
        config.settings.log_filter = "  ".to_string();
        assert_eq!(config.validate().len(), 2);
        assert_eq!(config.auto_fix_values(), 2);
        assert_eq!(config.settings.log_filter, "warn");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn save_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sage-layout.toml");
        let mut config = Config::default();
        config.settings.layout.strategy = PackStrategy::Potpack;
        config.settings.layout.padding = 12.5;
        config.save(&path).unwrap();

        assert_eq!(Config::read(&path).unwrap(), config);
        assert_eq!(Config::load(&dir.path().join("absent.toml")).unwrap(), Config::default());
    }

    #[test]
    fn broken_file_is_reported_and_can_be_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sage-layout.toml");
        std::fs::write(&path, "bogus = 1\n").unwrap();

        assert!(Config::load(&path).is_err());
        let issues = Config::check(&path);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("bogus"), "{issues:?}");

        assert!(Config::init(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "bogus = 1\n");

        Config::init(&path, true).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        assert!(Config::check(&path).is_empty());
    }

    #[test]
    fn check_reports_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sage-layout.toml");
        std::fs::write(&path, "[settings.layout]\npadding = -2.0\n").unwrap();
        let issues = Config::check(&path);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("layout.padding"));
        assert!(Config::check(&dir.path().join("absent.toml")).is_empty());
    }
}
