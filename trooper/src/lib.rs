#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative trooper state for Bampf.
//!
//! A trooper is a [`ProgressVolume`] that renders its health as a block of
//! cells, paired with the [`Energy`] meters that drive cloaking and
//! teleporting. Drivers mutate it through [`apply`] and read it back through
//! [`query`].

mod cell_box;
mod cube;
mod energy;
mod ordering;
mod panel;
mod registry;
mod shapes;
mod volume;

use bampf_core::{Command, EnergyConfig, EnergyReading, Event, Level};

pub use energy::Energy;
pub use volume::ProgressVolume;

/// Health volume and energy meters of one player avatar.
#[derive(Debug)]
pub struct Trooper {
    volume: ProgressVolume,
    energy: Energy,
}

impl Trooper {
    /// Creates a trooper for the level with meters filled as at level entry.
    #[must_use]
    pub fn new(level: Level, energy: EnergyConfig) -> Self {
        Self {
            volume: ProgressVolume::new(level),
            energy: Energy::new(energy),
        }
    }

    /// Mutable access to the volume, used to register health monitors.
    pub fn volume_mut(&mut self) -> &mut ProgressVolume {
        &mut self.volume
    }

    /// Mutable access to the meters, used to register energy monitors.
    pub fn energy_mut(&mut self) -> &mut Energy {
        &mut self.energy
    }
}

/// Applies the provided command to the trooper, mutating state
/// deterministically and broadcasting the resulting events.
///
/// Piece events are emitted before the reading that caused them.
pub fn apply(trooper: &mut Trooper, command: Command, out_events: &mut Vec<Event>) {
    // Pieces spawned when the trooper was built.
    trooper.volume.drain_piece_events(out_events);

    match command {
        Command::Attach => {
            let changed = trooper.volume.attach();
            push_health(trooper, changed, out_events);
        }
        Command::Detach => {
            let changed = trooper.volume.detach();
            push_health(trooper, changed, out_events);
        }
        Command::DetachCores { loss } => {
            let changed = trooper.volume.detach_cores(loss) > 0;
            push_health(trooper, changed, out_events);
        }
        Command::Reset => {
            trooper.volume.reset();
            push_health(trooper, true, out_events);
        }
        Command::Cloak { enable } => {
            if trooper.energy.cloak(enable) {
                out_events.push(Event::CloakChanged {
                    cloaked: trooper.energy.is_cloaked(),
                });
            }
        }
        Command::Teleport => {
            if trooper.energy.teleport() {
                out_events.push(Event::EnergyChanged {
                    reading: trooper.energy.reading(),
                });
                out_events.push(Event::Teleported);
            }
        }
        Command::AddCloakEnergy => {
            let before = trooper.energy.reading();
            trooper.energy.add_cloak_energy();
            push_energy(trooper, before, out_events);
        }
        Command::ResetEnergy => {
            let before = trooper.energy.reading();
            let was_cloaked = trooper.energy.is_cloaked();
            trooper.energy.reset();
            push_energy(trooper, before, out_events);
            if was_cloaked {
                out_events.push(Event::CloakChanged { cloaked: false });
            }
        }
        Command::Tick => {
            let before = trooper.energy.reading();
            let exhausted = trooper.energy.update();
            push_energy(trooper, before, out_events);
            if exhausted {
                out_events.push(Event::CloakChanged { cloaked: false });
            }
        }
    }
}

fn push_health(trooper: &mut Trooper, changed: bool, out_events: &mut Vec<Event>) {
    trooper.volume.drain_piece_events(out_events);
    if changed {
        out_events.push(Event::HealthChanged {
            reading: trooper.volume.health(),
        });
    }
}

fn push_energy(trooper: &Trooper, before: EnergyReading, out_events: &mut Vec<Event>) {
    let reading = trooper.energy.reading();
    if reading != before {
        out_events.push(Event::EnergyChanged { reading });
    }
}

/// Query functions that provide read-only access to the trooper state.
pub mod query {
    use bampf_core::{EnergyReading, HealthReading, Level, Piece};

    use super::Trooper;

    /// Level the trooper was built for.
    #[must_use]
    pub fn level(trooper: &Trooper) -> Level {
        trooper.volume.level()
    }

    /// Current health reading.
    #[must_use]
    pub fn health(trooper: &Trooper) -> HealthReading {
        trooper.volume.health()
    }

    /// Current energy reading.
    #[must_use]
    pub fn energy(trooper: &Trooper) -> EnergyReading {
        trooper.energy.reading()
    }

    /// Reports whether cloaking is switched on.
    #[must_use]
    pub fn is_cloaked(trooper: &Trooper) -> bool {
        trooper.energy.is_cloaked()
    }

    /// Reports whether the trooper may leave the level: full health and
    /// visible to the sentinels.
    #[must_use]
    pub fn is_worthy(trooper: &Trooper) -> bool {
        trooper.volume.is_full() && !trooper.energy.is_cloaked()
    }

    /// Pieces currently making up the trooper's visual.
    #[must_use]
    pub fn pieces(trooper: &Trooper) -> Vec<Piece> {
        trooper.volume.pieces()
    }

    /// Number of live pieces owned by the trooper.
    #[must_use]
    pub fn piece_count(trooper: &Trooper) -> usize {
        trooper.volume.piece_count()
    }

    /// Cell count of every box in attach order.
    #[must_use]
    pub fn box_counts(trooper: &Trooper) -> Vec<u32> {
        trooper.volume.box_counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bampf_core::PieceKind;

    fn trooper() -> Trooper {
        Trooper::new(Level::new(1), EnergyConfig::default())
    }

    #[test]
    fn first_command_hands_out_the_initial_pieces() {
        let mut trooper = trooper();
        let mut events = Vec::new();

        apply(&mut trooper, Command::Tick, &mut events);

        let spawned = events
            .iter()
            .filter(|event| matches!(event, Event::PieceSpawned { .. }))
            .count();
        assert_eq!(spawned, 9);
        assert_eq!(spawned, query::piece_count(&trooper));
    }

    #[test]
    fn attach_reports_pieces_before_health() {
        let mut trooper = trooper();
        let mut events = Vec::new();
        apply(&mut trooper, Command::Reset, &mut events);
        events.clear();

        apply(&mut trooper, Command::Attach, &mut events);

        assert!(matches!(
            events.first(),
            Some(Event::PieceSpawned { piece, .. }) if piece.kind == PieceKind::Cell
        ));
        assert!(matches!(
            events.last(),
            Some(Event::HealthChanged { reading }) if reading.health == 9
        ));
    }

    #[test]
    fn refused_detach_is_silent() {
        let mut trooper = trooper();
        let mut events = Vec::new();
        apply(&mut trooper, Command::DetachCores { loss: 100 }, &mut events);
        events.clear();

        apply(&mut trooper, Command::Detach, &mut events);
        apply(&mut trooper, Command::DetachCores { loss: 3 }, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::health(&trooper).health, 0);
        assert_eq!(query::piece_count(&trooper), 1);
    }

    #[test]
    fn teleport_spends_the_meter_once() {
        let mut trooper = trooper();
        let mut events = Vec::new();
        apply(&mut trooper, Command::Tick, &mut events);
        events.clear();

        apply(&mut trooper, Command::Teleport, &mut events);
        apply(&mut trooper, Command::Teleport, &mut events);

        assert_eq!(events.len(), 2);
        assert_eq!(events[1], Event::Teleported);
        assert_eq!(query::energy(&trooper).teleport, 0);
    }

    #[test]
    fn exhausted_cloak_is_announced_on_tick() {
        let mut trooper = Trooper::new(
            Level::new(1),
            EnergyConfig {
                cloak_start: 4,
                ..EnergyConfig::default()
            },
        );
        let mut events = Vec::new();

        apply(&mut trooper, Command::Cloak { enable: true }, &mut events);
        assert!(query::is_cloaked(&trooper));
        apply(&mut trooper, Command::Tick, &mut events);

        assert_eq!(events.last(), Some(&Event::CloakChanged { cloaked: false }));
        assert!(!query::is_cloaked(&trooper));
    }

    #[test]
    fn worthiness_needs_full_health_and_no_cloak() {
        let mut trooper = trooper();
        let mut events = Vec::new();
        for _ in 0..64 {
            apply(&mut trooper, Command::Attach, &mut events);
        }
        assert!(query::is_worthy(&trooper));

        apply(&mut trooper, Command::Cloak { enable: true }, &mut events);
        assert!(!query::is_worthy(&trooper));

        apply(&mut trooper, Command::ResetEnergy, &mut events);
        assert!(query::is_worthy(&trooper));
        assert_eq!(query::level(&trooper), Level::new(1));
        assert_eq!(query::pieces(&trooper).len(), 1);
        assert_eq!(query::box_counts(&trooper).iter().sum::<u32>(), 64);
    }
}
