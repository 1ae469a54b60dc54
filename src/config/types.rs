use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Platform layout limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Maximum number of component rows per message (default: 5).
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Slots available in one row; a button takes 1, a select 5 (default: 5).
    #[serde(default = "default_max_row_width")]
    pub max_row_width: usize,
}

/// View tracker behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Prefix for generated custom ids. A random one is chosen per tracker
    /// when unset.
    #[serde(default)]
    pub id_namespace: Option<String>,
    /// Defer an event that is still unanswered after its callback ran
    /// (default: true).
    #[serde(default = "default_acknowledge_after_callback")]
    pub acknowledge_after_callback: bool,
}

fn default_max_rows() -> usize {
    5
}

fn default_max_row_width() -> usize {
    5
}

fn default_acknowledge_after_callback() -> bool {
    true
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            max_row_width: default_max_row_width(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            id_namespace: None,
            acknowledge_after_callback: default_acknowledge_after_callback(),
        }
    }
}
