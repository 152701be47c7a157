#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gameplay rules that turn maze encounters into trooper commands.

use bampf_core::{CellTables, Command, HealthMonitor, HealthReading, Level};
use tracing::debug;

/// Something the trooper ran into during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encounter {
    /// The trooper reached a free core.
    CorePickup,
    /// A sentinel entered the trooper's grid cell.
    SentinelCollision,
}

/// Trooper state the rules depend on, sampled once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrooperStatus {
    /// Level the trooper was built for.
    pub level: Level,
    /// Health at the start of the frame.
    pub health: HealthReading,
    /// Whether cloaking is switched on.
    pub cloaked: bool,
}

/// Pure system translating encounters into commands.
#[derive(Clone, Debug, Default)]
pub struct Progression {
    tables: CellTables,
}

impl Progression {
    /// Creates the system with the provided per-level tables.
    #[must_use]
    pub fn new(tables: CellTables) -> Self {
        Self { tables }
    }

    /// Emits the commands for this frame's encounters.
    ///
    /// A cloaked trooper neither collects cores nor collides with sentinels.
    /// Cores are left on the floor while the trooper is at full health.
    pub fn handle(&self, encounters: &[Encounter], status: TrooperStatus, out: &mut Vec<Command>) {
        if status.cloaked {
            if !encounters.is_empty() {
                debug!(count = encounters.len(), "encounters ignored while cloaked");
            }
            return;
        }

        let gain = self.tables.gain(status.level);
        let loss = self.tables.loss(status.level);
        let mut health = status.health.health;
        for encounter in encounters {
            match encounter {
                Encounter::CorePickup => {
                    if health >= status.health.max {
                        continue;
                    }
                    out.extend(std::iter::repeat(Command::Attach).take(gain as usize));
                    out.push(Command::AddCloakEnergy);
                    health = health.saturating_add(gain).min(status.health.max);
                }
                Encounter::SentinelCollision => {
                    out.push(Command::DetachCores { loss });
                    health = health.saturating_sub(loss);
                }
            }
        }
    }
}

/// Result of a level as seen from the trooper's health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Full health and visible: the trooper may ascend.
    Worthy,
    /// Every cell was lost.
    Fallen,
    /// Still collecting.
    InProgress,
}

/// Health monitor that decides whether the level is complete.
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelCompletion {
    latest: Option<HealthReading>,
}

impl LevelCompletion {
    /// Outcome for the latest reading. A cloaked trooper cannot ascend.
    #[must_use]
    pub fn outcome(&self, cloaked: bool) -> Outcome {
        match self.latest {
            Some(reading) if reading.is_depleted() => Outcome::Fallen,
            Some(reading) if reading.is_full() && !cloaked => Outcome::Worthy,
            _ => Outcome::InProgress,
        }
    }
}

impl HealthMonitor for LevelCompletion {
    fn health_updated(&mut self, reading: HealthReading) {
        self.latest = Some(reading);
    }
}
