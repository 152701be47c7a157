//! Eight-cell cubes, the building block of every trooper.

use bampf_core::{Piece, PieceId, PieceKind};
use glam::Vec3;

use crate::{
    ordering::{sorted_slots, Metric},
    shapes::Shapes,
};

/// Cells held by a full cube.
pub(crate) const CUBE_CELLS: u32 = 8;

/// Cell half extent relative to the cube size. 0.25 would close the gaps.
const CELL_SCALE: f32 = 0.20;
/// Fraction of the cube size left as a gap around a merged cube.
const MERGED_GAP: f32 = 0.15;

/// A cube of up to eight cells.
///
/// Between 1 and 7 cells every cell is its own piece, placed in slot order. A
/// full cube is rendered as one merged piece. A hidden cube keeps counting but
/// owns no pieces; its owner is rendering something coarser in its place.
#[derive(Debug)]
pub(crate) struct Cube {
    center: Vec3,
    size: f32,
    slots: [Vec3; 8],
    count: u32,
    shown: bool,
    visuals: Vec<PieceId>,
}

impl Cube {
    pub(crate) fn new(center: Vec3, size: f32, metric: Metric) -> Self {
        Self {
            center,
            size,
            slots: sorted_slots(center, size, metric),
            count: 0,
            shown: true,
            visuals: Vec::with_capacity(CUBE_CELLS as usize),
        }
    }

    pub(crate) fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count == CUBE_CELLS
    }

    /// Adds the next cell in slot order, merging when the cube fills up.
    pub(crate) fn attach(&mut self, shapes: &mut Shapes) -> bool {
        if self.is_full() {
            return false;
        }
        self.count += 1;
        if !self.shown {
            return true;
        }
        if self.is_full() {
            self.merge(shapes);
        } else {
            let piece = self.cell_piece(self.slots[self.count as usize - 1]);
            self.visuals.push(shapes.spawn(piece));
        }
        true
    }

    /// Removes the most recently attached cell. A full cube first expands
    /// back into individual cells.
    pub(crate) fn detach(&mut self, shapes: &mut Shapes) -> bool {
        if self.count == 0 {
            return false;
        }
        let was_full = self.is_full();
        self.count -= 1;
        if !self.shown {
            return true;
        }
        if was_full {
            self.rebuild(shapes);
        } else {
            let last = self
                .visuals
                .pop()
                .expect("partially filled cube renders one piece per cell");
            shapes.despawn(last);
        }
        true
    }

    /// Clears the cube and replays attaches until it holds `count` cells.
    pub(crate) fn reset(&mut self, count: u32, shapes: &mut Shapes) {
        self.trash(shapes);
        self.shown = true;
        self.count = 0;
        for _ in 0..count.min(CUBE_CELLS) {
            let _ = self.attach(shapes);
        }
    }

    pub(crate) fn hide(&mut self, shapes: &mut Shapes) {
        self.trash(shapes);
        self.shown = false;
    }

    pub(crate) fn show(&mut self, shapes: &mut Shapes) {
        self.shown = true;
        self.rebuild(shapes);
    }

    pub(crate) fn collect_pieces(&self, shapes: &Shapes, out: &mut Vec<Piece>) {
        out.extend(
            self.visuals
                .iter()
                .filter_map(|piece_id| shapes.get(*piece_id)),
        );
    }

    fn merge(&mut self, shapes: &mut Shapes) {
        self.trash(shapes);
        let scale = (self.size - self.size * MERGED_GAP) * 0.5;
        let piece = Piece::new(PieceKind::Cube, self.center, Vec3::splat(scale));
        self.visuals.push(shapes.spawn(piece));
    }

    fn rebuild(&mut self, shapes: &mut Shapes) {
        self.trash(shapes);
        if self.is_full() {
            self.merge(shapes);
            return;
        }
        for index in 0..self.count as usize {
            let piece = self.cell_piece(self.slots[index]);
            self.visuals.push(shapes.spawn(piece));
        }
    }

    fn trash(&mut self, shapes: &mut Shapes) {
        for piece_id in self.visuals.drain(..) {
            shapes.despawn(piece_id);
        }
    }

    fn cell_piece(&self, slot: Vec3) -> Piece {
        Piece::new(PieceKind::Cell, slot, Vec3::splat(self.size * CELL_SCALE))
    }
}
