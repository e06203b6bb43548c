use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout_engine::Orientation;

pub fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("panedock")
}
pub fn data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("panedock")
}
pub fn config_file() -> PathBuf { config_dir().join("config.toml") }
pub fn layout_file() -> PathBuf { data_dir().join("layout.json") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Axis of the container created when a pane is dropped onto the center
    /// of another pane.
    #[serde(default = "default_center_split")]
    pub center_split: CenterSplit,
    /// Advisory minimum share, in percent, stamped on newly created panes.
    #[serde(default = "default_new_pane_min_size")]
    pub new_pane_min_size: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            center_split: default_center_split(),
            new_pane_min_size: default_new_pane_min_size(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum CenterSplit {
    /// Split across the axis of the container the target sits in. A root
    /// target splits horizontally.
    #[default]
    Perpendicular,
    Horizontal,
    Vertical,
}

impl CenterSplit {
    /// Picks the axis for a center drop onto a node whose enclosing container
    /// splits along `enclosing`.
    pub fn resolve(self, enclosing: Option<Orientation>) -> Orientation {
        match self {
            CenterSplit::Perpendicular => enclosing
                .map(Orientation::perpendicular)
                .unwrap_or(Orientation::Horizontal),
            CenterSplit::Horizontal => Orientation::Horizontal,
            CenterSplit::Vertical => Orientation::Vertical,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct StorageSettings {
    /// Layout document to load and save. Defaults to `layout.json` in the
    /// user data directory.
    #[serde(default)]
    pub layout_file: Option<PathBuf>,
}

impl StorageSettings {
    pub fn layout_path(&self) -> PathBuf { self.layout_file.clone().unwrap_or_else(layout_file) }
}

fn default_center_split() -> CenterSplit { CenterSplit::Perpendicular }

fn default_new_pane_min_size() -> f64 { 20.0 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str::<Config>(buf)?) }

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

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.layout.validate() }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(0.0..=100.0).contains(&self.new_pane_min_size) {
            issues.push(format!(
                "new_pane_min_size must be in [0, 100], got {}",
                self.new_pane_min_size
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_default_matches_code_defaults() {
        let bundled = Config::parse(include_str!("../../panedock.default.toml")).unwrap();
        assert_eq!(Config::default(), bundled);
        assert!(bundled.validate().is_empty());
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Config::default(), Config::parse("").unwrap());
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::parse(
            r#"
            [layout]
            center_split = "vertical"
            new_pane_min_size = 10.0

            [storage]
            layout_file = "/tmp/dock.ron"
            "#,
        )
        .unwrap();
        assert_eq!(CenterSplit::Vertical, config.layout.center_split);
        assert_eq!(10.0, config.layout.new_pane_min_size);
        assert_eq!(PathBuf::from("/tmp/dock.ron"), config.storage.layout_path());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[layout]\nsplit = \"vertical\"").is_err());
        assert!(Config::parse("[layout]\nnew_pane_default_size = 40.0").is_err());
        assert!(Config::parse("[layout]\ncenter_split = \"diagonal\"").is_err());
    }

    #[test]
    fn validate_reports_bad_sizes() {
        let mut config = Config::default();
        config.layout.new_pane_min_size = 120.0;
        assert_eq!(1, config.validate().len());
        config.layout.new_pane_min_size = -1.0;
        assert_eq!(1, config.validate().len());
        config.layout.new_pane_min_size = 0.0;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn center_split_resolution() {
        use Orientation::*;
        assert_eq!(Vertical, CenterSplit::Perpendicular.resolve(Some(Horizontal)));
        assert_eq!(Horizontal, CenterSplit::Perpendicular.resolve(Some(Vertical)));
        assert_eq!(Horizontal, CenterSplit::Perpendicular.resolve(None));
        assert_eq!(Vertical, CenterSplit::Vertical.resolve(None));
        assert_eq!(Horizontal, CenterSplit::Horizontal.resolve(Some(Horizontal)));
    }

    #[test]
    fn save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/config.toml");
        let mut config = Config::default();
        config.layout.center_split = CenterSplit::Horizontal;
        config.save(&path).unwrap();
        assert_eq!(config, Config::read(&path).unwrap());
    }
}
