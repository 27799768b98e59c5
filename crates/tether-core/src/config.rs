//! Object configuration - bending defaults and history sizing
//!
//! Configuration is plain serde data so it can live in a RON file next to
//! the rest of a game's tuning.
//!
//! # Example
//!
//! ```
//! use tether_core::ObjectConfig;
//!
//! let config = ObjectConfig::from_ron("(bending: (amount: 0.6, increments: 6))").unwrap();
//! assert_eq!(config.bending.increments, 6);
//! assert!(!config.bending.keep_velocities);
//! assert_eq!(config.history_capacity, tether_core::DEFAULT_HISTORY_CAPACITY);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of snapshots kept per object unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Defaults used when a reconciliation does not specify its own bending
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendingConfig {
    /// Fraction of the predicted/authoritative gap restored by the plan
    ///
    /// - `0.0`: snap to the authoritative state and stay there
    /// - `1.0`: bend all the way back to the predicted pose
    pub amount: f32,
    /// Number of ticks the plan is spread over (must be > 0)
    pub increments: u32,
    /// Keep the live velocities when snapping to the authoritative state
    pub keep_velocities: bool,
}

impl BendingConfig {
    /// Check the values before they reach the bending engine
    pub fn validate(&self) -> Result<()> {
        if self.increments == 0 {
            return Err(Error::InvalidValue {
                field: "bending.increments",
                reason: "must be greater than 0".to_string(),
            });
        }
        if !self.amount.is_finite() {
            return Err(Error::InvalidValue {
                field: "bending.amount",
                reason: format!("must be finite, got {}", self.amount),
            });
        }
        Ok(())
    }
}

impl Default for BendingConfig {
    fn default() -> Self {
        Self {
            amount: 1.0,
            increments: 10,
            keep_velocities: false,
        }
    }
}

/// Configuration for a networked physical object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    pub bending: BendingConfig,
    /// Snapshots retained for history queries
    pub history_capacity: usize,
}

impl ObjectConfig {
    /// Parse and validate a configuration from RON text
    ///
    /// Missing fields take their default values.
    pub fn from_ron(text: &str) -> Result<Self> {
        let config: ObjectConfig =
            ron::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON text
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.bending.validate()?;
        if self.history_capacity == 0 {
            return Err(Error::InvalidValue {
                field: "history_capacity",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            bending: BendingConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
