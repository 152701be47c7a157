//! Cloak and teleport meters.

use bampf_core::{EnergyConfig, EnergyMonitor, EnergyReading};
use tracing::debug;

use crate::registry::Registry;

/// The two energy meters of a trooper.
///
/// Teleport energy recharges every tick and is spent all at once. Cloak
/// energy drains every tick while cloaked and is refilled by collected cores.
#[derive(Debug)]
pub struct Energy {
    config: EnergyConfig,
    teleport: u32,
    cloak: u32,
    cloaked: bool,
    monitors: Registry<dyn EnergyMonitor>,
}

impl Energy {
    /// Creates meters filled as at level entry.
    #[must_use]
    pub fn new(config: EnergyConfig) -> Self {
        Self {
            config,
            teleport: config.teleport_max,
            cloak: config.cloak_start.min(config.cloak_max),
            cloaked: false,
            monitors: Registry::default(),
        }
    }

    /// Current meter values and limits.
    #[must_use]
    pub fn reading(&self) -> EnergyReading {
        EnergyReading {
            teleport: self.teleport,
            teleport_max: self.config.teleport_max,
            cloak: self.cloak,
            cloak_max: self.config.cloak_max,
        }
    }

    /// Reports whether cloaking is switched on.
    #[must_use]
    pub fn is_cloaked(&self) -> bool {
        self.cloaked
    }

    /// Advances both meters by one tick. Returns `true` when the cloak ran
    /// dry and was switched off.
    pub fn update(&mut self) -> bool {
        let before = self.reading();
        self.teleport = self
            .teleport
            .saturating_add(self.config.teleport_recharge)
            .min(self.config.teleport_max);

        let mut exhausted = false;
        if self.cloaked {
            self.cloak = self.cloak.saturating_sub(self.config.cloak_drain);
            if self.cloak == 0 {
                self.cloaked = false;
                exhausted = true;
                debug!("cloak exhausted");
            }
        }
        self.notify_if_changed(before);
        exhausted
    }

    /// Switches cloaking on or off. Cloaking only turns on while cloak energy
    /// remains. Returns `true` when the cloak state changed.
    pub fn cloak(&mut self, enable: bool) -> bool {
        let cloaked = enable && self.cloak > 0;
        if enable && !cloaked {
            debug!("cloak refused without energy");
        }
        let changed = cloaked != self.cloaked;
        self.cloaked = cloaked;
        changed
    }

    /// Spends the whole teleport meter. Only succeeds when the meter is full.
    pub fn teleport(&mut self) -> bool {
        if self.teleport < self.config.teleport_max {
            return false;
        }
        let before = self.reading();
        self.teleport = 0;
        self.notify_if_changed(before);
        true
    }

    /// Grants the cloak bonus for a collected core, capped at the maximum.
    pub fn add_cloak_energy(&mut self) {
        let before = self.reading();
        self.cloak = self
            .cloak
            .saturating_add(self.config.cloak_bonus)
            .min(self.config.cloak_max);
        self.notify_if_changed(before);
    }

    /// Refills both meters for a new level and drops the cloak.
    pub fn reset(&mut self) {
        let before = self.reading();
        self.teleport = self.config.teleport_max;
        self.cloak = self.config.cloak_start.min(self.config.cloak_max);
        self.cloaked = false;
        self.notify_if_changed(before);
    }

    /// Registers an energy monitor, replacing any previous one under `id`.
    pub fn monitor_energy(&mut self, id: impl Into<String>, monitor: impl EnergyMonitor + 'static) {
        let _ = self.monitors.register(id, Box::new(monitor));
    }

    /// Drops the energy monitor registered under `id`.
    pub fn ignore_energy(&mut self, id: &str) -> bool {
        self.monitors.unregister(id)
    }

    fn notify_if_changed(&mut self, before: EnergyReading) {
        let reading = self.reading();
        if reading != before {
            self.monitors.for_each(|monitor| monitor.energy_updated(reading));
        }
    }
}
