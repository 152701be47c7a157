#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bampf adapters.
//!
//! The trooper announces every visual piece it creates or destroys. A
//! [`Scene`] mirrors those announcements into drawable descriptions that a
//! [`RenderingBackend`] presents.

use std::{collections::BTreeMap, error::Error, fmt};

use anyhow::Result as AnyResult;
use bampf_core::{Event, Piece, PieceId, PieceKind};
use glam::Vec3;
use tracing::warn;

/// Distance at which pieces start fading out.
const FADE_DISTANCE: f32 = 1000.0;

/// Translucent material a piece is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    /// Individual cells and merged cubes.
    Green,
    /// Panel slabs and the merged volume.
    Blue,
    /// The center block.
    Red,
}

impl Material {
    /// Material used for the provided piece kind.
    #[must_use]
    pub const fn for_kind(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Cell | PieceKind::Cube => Self::Green,
            PieceKind::Slab | PieceKind::Neo => Self::Blue,
            PieceKind::Center => Self::Red,
        }
    }
}

/// Shader inputs shared by every trooper piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniforms {
    /// Distance at which the piece starts fading out.
    pub fade_distance: f32,
    /// Opacity multiplier.
    pub alpha: f32,
    /// Rotation speed in radians per second.
    pub spin: f32,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            fade_distance: FADE_DISTANCE,
            alpha: 1.0,
            spin: 0.0,
        }
    }
}

/// Drawable description of one trooper piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePiece {
    /// Geometry reported by the trooper.
    pub piece: Piece,
    /// Material derived from the piece kind.
    pub material: Material,
    /// Shader inputs.
    pub uniforms: Uniforms,
}

impl ScenePiece {
    /// Wraps a trooper piece with its material and default uniforms.
    #[must_use]
    pub fn new(piece: Piece) -> Self {
        Self {
            piece,
            material: Material::for_kind(piece.kind),
            uniforms: Uniforms::default(),
        }
    }

    /// Lower and upper corners of the piece's bounding box.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (
            self.piece.center - self.piece.scale,
            self.piece.center + self.piece.scale,
        )
    }
}

/// Mirror of the pieces a trooper currently shows.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pieces: BTreeMap<PieceId, ScenePiece>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies piece spawn and despawn events in order. Other events are
    /// ignored. Stops at the first event that contradicts the mirror.
    pub fn apply(&mut self, events: &[Event]) -> Result<(), RenderingError> {
        for event in events {
            match *event {
                Event::PieceSpawned { piece_id, piece } => {
                    if self.pieces.contains_key(&piece_id) {
                        warn!(piece = piece_id.get(), "piece spawned twice");
                        return Err(RenderingError::DuplicatePiece { piece_id });
                    }
                    let _ = self.pieces.insert(piece_id, ScenePiece::new(piece));
                }
                Event::PieceDespawned { piece_id } => {
                    if self.pieces.remove(&piece_id).is_none() {
                        warn!(piece = piece_id.get(), "despawned an unknown piece");
                        return Err(RenderingError::UnknownPiece { piece_id });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Number of pieces in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Reports whether the scene holds no pieces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Retrieves a piece by handle.
    #[must_use]
    pub fn get(&self, piece_id: PieceId) -> Option<&ScenePiece> {
        self.pieces.get(&piece_id)
    }

    /// Iterates pieces in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &ScenePiece)> {
        self.pieces.iter().map(|(piece_id, piece)| (*piece_id, piece))
    }

    /// Number of pieces drawn with each material, as green, blue, red.
    #[must_use]
    pub fn material_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for piece in self.pieces.values() {
            let slot = match piece.material {
                Material::Green => 0,
                Material::Blue => 1,
                Material::Red => 2,
            };
            counts[slot] += 1;
        }
        counts
    }

    /// Bounding box enclosing every piece, if any.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.pieces
            .values()
            .map(ScenePiece::bounds)
            .reduce(|(low, high), (piece_low, piece_high)| {
                (low.min(piece_low), high.max(piece_high))
            })
    }
}

/// Rendering backend capable of presenting a scene.
pub trait RenderingBackend {
    /// Presents the scene once. `label` names the step that produced it.
    fn present(&mut self, label: &str, scene: &Scene) -> AnyResult<()>;
}

/// Errors raised when a piece event contradicts the mirrored scene.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A spawn reused a handle that is still live.
    DuplicatePiece {
        /// Handle reported by the spawn.
        piece_id: PieceId,
    },
    /// A despawn referenced a handle the scene never saw.
    UnknownPiece {
        /// Handle reported by the despawn.
        piece_id: PieceId,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePiece { piece_id } => {
                write!(f, "piece {} is already in the scene", piece_id.get())
            }
            Self::UnknownPiece { piece_id } => {
                write!(f, "piece {} is not in the scene", piece_id.get())
            }
        }
    }
}

impl Error for RenderingError {}
