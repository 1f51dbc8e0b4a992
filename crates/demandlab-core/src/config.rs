use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tunables for elasticity analysis and slider construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// City every selection is scoped to.
    pub city: String,
    /// Number of evenly spaced points in a prediction curve.
    pub curve_points: usize,
    /// Multiplier applied to the observed minimum price.
    pub lower_padding: f64,
    /// Multiplier applied to the observed maximum price.
    pub upper_padding: f64,
    /// Tick marks per slider, endpoints included.
    pub tick_count: usize,
    /// Range served when a selection cannot be resolved.
    pub fallback_range: (f64, f64),
    /// Half-width of the cross-price "no meaningful effect" band.
    pub independence_band: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            city: String::from("Athens"),
            curve_points: 100,
            lower_padding: 0.8,
            upper_padding: 1.2,
            tick_count: 5,
            fallback_range: (0.5, 5.0),
            independence_band: 0.1,
        }
    }
}

impl AnalysisConfig {
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }
}

/// Resolve the panel file: `DEMANDLAB_PANEL`, then `$DEMANDLAB_HOME/panel.json`,
/// then `$HOME/.demandlab/panel.json`.
pub fn resolve_panel_path() -> PathBuf {
    if let Some(path) = non_empty_var("DEMANDLAB_PANEL") {
        return path;
    }

    resolve_demandlab_home().join("panel.json")
}

pub fn resolve_demandlab_home() -> PathBuf {
    if let Some(path) = non_empty_var("DEMANDLAB_HOME") {
        return path;
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".demandlab");
    }

    PathBuf::from(".demandlab")
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tool_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.city, "Athens");
        assert_eq!(config.curve_points, 100);
        assert_eq!(config.tick_count, 5);
        assert_eq!(config.fallback_range, (0.5, 5.0));
    }

    #[test]
    fn overrides_city() {
        let config = AnalysisConfig::default().with_city("Thessaloniki");
        assert_eq!(config.city, "Thessaloniki");
    }
}
