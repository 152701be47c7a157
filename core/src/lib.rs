#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bampf trooper engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative trooper state, and pure systems. Drivers submit [`Command`]
//! values describing desired mutations, the trooper executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! adapters to mirror. Observers that need a live view of the trooper implement
//! [`HealthMonitor`] or [`EnergyMonitor`] and register under a string key.

mod config;

use std::{cell::RefCell, rc::Rc};

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use config::{CellTables, ConfigError, EnergyConfig, TrooperConfig, LEVEL_COUNT};

/// Number of cells the start-screen preview trooper is seeded with.
const PREVIEW_ENTRY_CELLS: u32 = 1;
/// Number of cells held by the single cube of the start-screen preview trooper.
const PREVIEW_CAPACITY: u32 = 8;

/// Game level that fixes the geometry and capacity of a trooper.
///
/// Level 0 is the start-screen preview made from a single cube. Every later
/// level wraps the previous level's volume in one more shell of cubes.
///
/// Levels stop at [`Level::MAX`], the last level the cell tables describe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Level(u32);

impl Level {
    /// The start-screen preview level.
    pub const PREVIEW: Self = Self(0);

    /// The deepest level.
    pub const MAX: Self = Self(LEVEL_COUNT as u32);

    /// Creates a new level from its ordinal, clamped to [`Level::MAX`].
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Creates a new level, or `None` when the ordinal lies past [`Level::MAX`].
    #[must_use]
    pub const fn try_new(value: u32) -> Option<Self> {
        if value > Self::MAX.0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Retrieves the level ordinal.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the level is the single-cube preview.
    #[must_use]
    pub const fn is_preview(&self) -> bool {
        self.0 == 0
    }

    /// Number of cells a trooper holds when it enters the level.
    ///
    /// This is `8·L³ - 8·(L-1)³`, the cells between the previous level's
    /// solid cube and this level's.
    /// The preview does not follow the formula: it starts with one cell.
    #[must_use]
    pub const fn entry_cells(&self) -> u32 {
        if self.is_preview() {
            return PREVIEW_ENTRY_CELLS;
        }
        solid_cells(self.0) - solid_cells(self.0 - 1)
    }

    /// Maximum number of cells a trooper can hold on the level.
    ///
    /// This is `8·(L+1)³ - 8·(L-1)³`, except for the preview, whose single
    /// cube holds eight.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        if self.is_preview() {
            return PREVIEW_CAPACITY;
        }
        solid_cells(self.0 + 1) - solid_cells(self.0 - 1)
    }

    /// Edge length of one cube in a trooper of unit size.
    #[must_use]
    pub fn cube_size(&self) -> f32 {
        1.0 / (self.0 + 1) as f32
    }

    /// Lattice positions along each axis, corners included.
    #[must_use]
    pub const fn lattice_span(&self) -> u32 {
        self.0 + 1
    }
}

impl From<u32> for Level {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Level> for u32 {
    fn from(level: Level) -> Self {
        level.0
    }
}

const fn solid_cells(level: u32) -> u32 {
    let side = 2 * level;
    side * side * side
}

/// Snapshot of the trooper's cell count reported to health observers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthReading {
    /// Cells currently attached.
    pub health: u32,
    /// Cells held when entering the level.
    pub mid: u32,
    /// Cells held at full health.
    pub max: u32,
}

impl HealthReading {
    /// Creates a new reading from its components.
    #[must_use]
    pub const fn new(health: u32, mid: u32, max: u32) -> Self {
        Self { health, mid, max }
    }

    /// Reports whether the trooper is at full health.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.health == self.max
    }

    /// Reports whether every cell has been lost.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.health == 0
    }

    /// Cells that still have to be collected to reach full health.
    #[must_use]
    pub const fn missing(&self) -> u32 {
        self.max.saturating_sub(self.health)
    }
}

/// Snapshot of the trooper's energy meters reported to energy observers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyReading {
    /// Teleport energy currently stored.
    pub teleport: u32,
    /// Teleport energy required to teleport.
    pub teleport_max: u32,
    /// Cloak energy currently stored.
    pub cloak: u32,
    /// Upper bound for stored cloak energy.
    pub cloak_max: u32,
}

impl EnergyReading {
    /// Reports whether a teleport would currently succeed.
    #[must_use]
    pub const fn teleport_ready(&self) -> bool {
        self.teleport >= self.teleport_max
    }
}

/// Opaque handle of a visual piece owned by a trooper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(u32);

impl PieceId {
    /// Creates a new piece identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Role a visual piece plays inside the trooper volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// One individually rendered cell of a partially filled cube.
    Cell,
    /// A full cube collapsed into one piece.
    Cube,
    /// A full panel collapsed into one slab covering its face.
    Slab,
    /// The interior block standing in for the previous level's volume.
    Center,
    /// The whole volume collapsed into one piece at full health.
    Neo,
}

/// Renderer-facing description of a visual node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Role of the piece.
    pub kind: PieceKind,
    /// Location of the piece relative to the trooper origin.
    pub center: Vec3,
    /// Half extents of the piece along each axis.
    pub scale: Vec3,
}

impl Piece {
    /// Creates a new piece descriptor.
    #[must_use]
    pub const fn new(kind: PieceKind, center: Vec3, scale: Vec3) -> Self {
        Self {
            kind,
            center,
            scale,
        }
    }
}

/// Commands that express all permissible trooper mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Attaches a single cell.
    Attach,
    /// Detaches a single cell.
    Detach,
    /// Detaches up to `loss` cells, reporting only the final result.
    DetachCores {
        /// Number of cells to remove.
        loss: u32,
    },
    /// Rebuilds the volume at the level's entry cell count.
    Reset,
    /// Requests that cloaking be switched on or off.
    Cloak {
        /// Desired cloak state.
        enable: bool,
    },
    /// Spends all teleport energy when the meter is full.
    Teleport,
    /// Grants the cloak energy bonus awarded for a core pickup.
    AddCloakEnergy,
    /// Refills both meters at level entry.
    ResetEnergy,
    /// Advances the energy meters by one simulation tick.
    Tick,
}

/// Events broadcast by the trooper after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Reports the cell count after it changed.
    HealthChanged {
        /// Reading captured after the mutation.
        reading: HealthReading,
    },
    /// Reports the energy meters after they changed.
    EnergyChanged {
        /// Reading captured after the mutation.
        reading: EnergyReading,
    },
    /// Announces that cloaking switched on or off.
    CloakChanged {
        /// Cloak state after the change.
        cloaked: bool,
    },
    /// Confirms that a teleport consumed the teleport meter.
    Teleported,
    /// Announces that a visual piece was created.
    PieceSpawned {
        /// Handle assigned to the new piece.
        piece_id: PieceId,
        /// Geometry of the new piece.
        piece: Piece,
    },
    /// Announces that a visual piece was destroyed.
    PieceDespawned {
        /// Handle of the destroyed piece.
        piece_id: PieceId,
    },
}

/// Observer notified whenever the trooper's cell count changes.
pub trait HealthMonitor {
    /// Receives the reading captured after the change.
    fn health_updated(&mut self, reading: HealthReading);
}

/// Observer notified whenever the trooper's energy meters change.
pub trait EnergyMonitor {
    /// Receives the reading captured after the change.
    fn energy_updated(&mut self, reading: EnergyReading);
}

impl<T: HealthMonitor + ?Sized> HealthMonitor for Rc<RefCell<T>> {
    fn health_updated(&mut self, reading: HealthReading) {
        self.borrow_mut().health_updated(reading);
    }
}

impl<T: EnergyMonitor + ?Sized> EnergyMonitor for Rc<RefCell<T>> {
    fn energy_updated(&mut self, reading: EnergyReading) {
        self.borrow_mut().energy_updated(reading);
    }
}
