//! Squad manager configuration loaded from TOML.
//!
//! All distances are in cells. Missing keys take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, Result};
use crate::types::WDist;

/// Tuning of a bot's squad manager. Immutable once squads are running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadManagerConfig {
    /// Radius in which protection squads acquire targets.
    pub protection_scan_radius: i32,
    /// Radius around the base from which units join a protection squad.
    pub protect_unit_scan_radius: i32,
    /// Radius in which threats are considered when fleeing from all of them.
    pub danger_scan_radius: i32,
    /// Distance of the near rally point from the squad centre.
    pub near_rally_distance: i32,
    /// Spacing between members when dispersing.
    pub disperse_spacing: i32,
}

impl Default for SquadManagerConfig {
    fn default() -> Self {
        Self {
            protection_scan_radius: DEFAULT_PROTECTION_SCAN_RADIUS,
            protect_unit_scan_radius: DEFAULT_PROTECT_UNIT_SCAN_RADIUS,
            danger_scan_radius: DEFAULT_DANGER_SCAN_RADIUS,
            near_rally_distance: DEFAULT_NEAR_RALLY_DISTANCE,
            disperse_spacing: DEFAULT_DISPERSE_SPACING,
        }
    }
}

impl SquadManagerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SquadManagerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Every radius and distance must be positive and at most `MAX_CONFIG_CELLS`.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("protection_scan_radius", self.protection_scan_radius),
            ("protect_unit_scan_radius", self.protect_unit_scan_radius),
            ("danger_scan_radius", self.danger_scan_radius),
            ("near_rally_distance", self.near_rally_distance),
            ("disperse_spacing", self.disperse_spacing),
        ];
        for (key, value) in fields {
            if value <= 0 {
                return Err(ConfigError::Invalid { key, value });
            }
            if value > MAX_CONFIG_CELLS {
                return Err(ConfigError::TooLarge {
                    key,
                    value,
                    max: MAX_CONFIG_CELLS,
                });
            }
        }
        Ok(())
    }

    pub fn protection_scan_distance(&self) -> WDist {
        WDist::from_cells(self.protection_scan_radius)
    }

    pub fn protect_unit_scan_distance(&self) -> WDist {
        WDist::from_cells(self.protect_unit_scan_radius)
    }

    pub fn danger_scan_distance(&self) -> WDist {
        WDist::from_cells(self.danger_scan_radius)
    }
}
