//! Tunable constants consumed by the trooper and the gameplay systems.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Level;

/// Number of playable levels covered by the per-level tables.
pub const LEVEL_COUNT: usize = 5;

/// Complete trooper configuration, usually loaded from a TOML file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrooperConfig {
    /// Energy meter limits and rates.
    pub energy: EnergyConfig,
    /// Per-level cell gain and loss tables.
    pub cells: CellTables,
}

impl TrooperConfig {
    /// Checks that the configuration can drive a trooper.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.energy.validate()?;
        self.cells.validate()
    }
}

/// Limits and per-tick rates of the cloak and teleport meters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Teleport energy required to teleport.
    pub teleport_max: u32,
    /// Upper bound for stored cloak energy.
    pub cloak_max: u32,
    /// Teleport energy regained every tick.
    pub teleport_recharge: u32,
    /// Cloak energy spent every tick while cloaked.
    pub cloak_drain: u32,
    /// Cloak energy granted for each collected core.
    pub cloak_bonus: u32,
    /// Cloak energy available when entering a level.
    pub cloak_start: u32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            teleport_max: 1000,
            cloak_max: 1000,
            teleport_recharge: 1,
            cloak_drain: 4,
            cloak_bonus: 100,
            cloak_start: 1000,
        }
    }
}

impl EnergyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("teleport_max", self.teleport_max),
            ("cloak_max", self.cloak_max),
            ("teleport_recharge", self.teleport_recharge),
            ("cloak_drain", self.cloak_drain),
        ];
        for (field, value) in required {
            if value == 0 {
                return Err(ConfigError::ZeroEnergy { field });
            }
        }
        if self.cloak_start > self.cloak_max {
            return Err(ConfigError::CloakStartAboveMax {
                start: self.cloak_start,
                max: self.cloak_max,
            });
        }
        Ok(())
    }
}

/// Cells gained per collected core and lost per sentinel collision, by level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellTables {
    /// Cells attached for each collected core.
    pub gain: [u32; LEVEL_COUNT],
    /// Cells detached for each sentinel collision.
    pub loss: [u32; LEVEL_COUNT],
}

impl Default for CellTables {
    fn default() -> Self {
        Self {
            gain: [1, 2, 4, 8, 8],
            loss: [1, 12, 24, 48, 64],
        }
    }
}

impl CellTables {
    /// Cells attached for each core collected on the provided level.
    ///
    /// Levels past the end of the table reuse the last entry.
    #[must_use]
    pub fn gain(&self, level: Level) -> u32 {
        lookup(&self.gain, level)
    }

    /// Cells detached for each sentinel collision on the provided level.
    #[must_use]
    pub fn loss(&self, level: Level) -> u32 {
        lookup(&self.loss, level)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.gain.iter().position(|gain| *gain == 0) {
            Some(index) => Err(ConfigError::ZeroGain { level: index + 1 }),
            None => Ok(()),
        }
    }
}

/// Entry `i` belongs to trooper level `i + 1`; the preview shares the first.
fn lookup(table: &[u32; LEVEL_COUNT], level: Level) -> u32 {
    let index = usize::try_from(level.get().saturating_sub(1)).unwrap_or(usize::MAX);
    table[index.min(LEVEL_COUNT - 1)]
}

/// Errors reported when validating a [`TrooperConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A meter limit or rate was zero.
    #[error("energy setting `{field}` must be positive")]
    ZeroEnergy {
        /// Name of the offending setting.
        field: &'static str,
    },
    /// The starting cloak energy exceeded the cloak limit.
    #[error("cloak_start {start} exceeds cloak_max {max}")]
    CloakStartAboveMax {
        /// Configured starting cloak energy.
        start: u32,
        /// Configured cloak limit.
        max: u32,
    },
    /// A level would never gain cells from collected cores.
    #[error("cell gain for level {level} must be positive")]
    ZeroGain {
        /// Level whose gain is zero.
        level: usize,
    },
}
