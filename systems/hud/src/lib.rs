#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Heads-up display observers that mirror the trooper's health and energy.
//!
//! The observers only ever see readings. Adapters register them with the
//! trooper, usually wrapped in `Rc<RefCell<_>>` so the drawing code can read
//! the latest state back each frame.

use std::fmt;

use bampf_core::{EnergyMonitor, EnergyReading, HealthMonitor, HealthReading};

/// Tint applied to a HUD bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarTint {
    /// Regular display.
    Normal,
    /// Health below the level entry count.
    Warning,
    /// Teleport meter full and ready to use.
    Ready,
}

/// Collected and required cores shown next to the health bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoreCount {
    /// Cores the trooper currently carries.
    pub collected: u32,
    /// Cores carried at full health.
    pub total: u32,
}

impl fmt::Display for CoreCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collected, self.total)
    }
}

/// Experience bar: core counter, health bar, and the two energy meters.
#[derive(Clone, Debug)]
pub struct XpBar {
    gain: u32,
    health: HealthReading,
    energy: EnergyReading,
}

impl XpBar {
    /// Creates a bar for a level granting `gain` cells per collected core.
    #[must_use]
    pub fn new(gain: u32, health: HealthReading, energy: EnergyReading) -> Self {
        Self {
            gain: gain.max(1),
            health,
            energy,
        }
    }

    /// Core counter text source.
    #[must_use]
    pub fn cores(&self) -> CoreCount {
        let total = self.health.max / self.gain;
        let needed = self.health.missing() / self.gain;
        CoreCount {
            collected: total.saturating_sub(needed),
            total,
        }
    }

    /// Filled portion of the health bar in `0.0..=1.0`.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        fraction(self.health.health, self.health.max)
    }

    /// Tint of the health bar.
    #[must_use]
    pub fn health_tint(&self) -> BarTint {
        if self.health.health < self.health.mid {
            BarTint::Warning
        } else {
            BarTint::Normal
        }
    }

    /// Filled portion of the teleport meter.
    #[must_use]
    pub fn teleport_fraction(&self) -> f32 {
        fraction(self.energy.teleport, self.energy.teleport_max)
    }

    /// Tint of the teleport meter.
    #[must_use]
    pub fn teleport_tint(&self) -> BarTint {
        if self.energy.teleport_ready() {
            BarTint::Ready
        } else {
            BarTint::Normal
        }
    }

    /// Filled portion of the cloak meter.
    #[must_use]
    pub fn cloak_fraction(&self) -> f32 {
        fraction(self.energy.cloak, self.energy.cloak_max)
    }
}

impl HealthMonitor for XpBar {
    fn health_updated(&mut self, reading: HealthReading) {
        self.health = reading;
    }
}

impl EnergyMonitor for XpBar {
    fn energy_updated(&mut self, reading: EnergyReading) {
        self.energy = reading;
    }
}

/// Colour of the maze-center marker on the minimap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarkerColor {
    /// The trooper is at full health and may ascend.
    Green,
    /// The trooper still has cores to collect.
    #[default]
    Blue,
}

/// Minimap marker that turns green once the trooper is at full health.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimapMarker {
    color: MarkerColor,
}

impl MinimapMarker {
    /// Current marker colour.
    #[must_use]
    pub fn color(&self) -> MarkerColor {
        self.color
    }
}

impl HealthMonitor for MinimapMarker {
    fn health_updated(&mut self, reading: HealthReading) {
        self.color = if reading.is_full() {
            MarkerColor::Green
        } else {
            MarkerColor::Blue
        };
    }
}

fn fraction(value: u32, max: u32) -> f32 {
    if max == 0 {
        return 0.0;
    }
    (value as f32 / max as f32).clamp(0.0, 1.0)
}
