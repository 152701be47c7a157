//! Closed set of containers the volume hands cells to.

use bampf_core::Piece;

use crate::{cube::Cube, cube::CUBE_CELLS, panel::Panel, shapes::Shapes};

/// A container that holds a bounded number of cells.
#[derive(Debug)]
pub(crate) enum CellBox {
    Cube(Cube),
    Panel(Panel),
}

impl CellBox {
    pub(crate) fn count(&self) -> u32 {
        match self {
            Self::Cube(cube) => cube.count(),
            Self::Panel(panel) => panel.count(),
        }
    }

    pub(crate) fn max(&self) -> u32 {
        match self {
            Self::Cube(_) => CUBE_CELLS,
            Self::Panel(panel) => panel.max(),
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count() == self.max()
    }

    pub(crate) fn attach(&mut self, shapes: &mut Shapes) -> bool {
        match self {
            Self::Cube(cube) => cube.attach(shapes),
            Self::Panel(panel) => panel.attach(shapes),
        }
    }

    pub(crate) fn detach(&mut self, shapes: &mut Shapes) -> bool {
        match self {
            Self::Cube(cube) => cube.detach(shapes),
            Self::Panel(panel) => panel.detach(shapes),
        }
    }

    pub(crate) fn reset(&mut self, count: u32, shapes: &mut Shapes) {
        match self {
            Self::Cube(cube) => cube.reset(count, shapes),
            Self::Panel(panel) => panel.reset(count, shapes),
        }
    }

    pub(crate) fn hide(&mut self, shapes: &mut Shapes) {
        match self {
            Self::Cube(cube) => cube.hide(shapes),
            Self::Panel(panel) => panel.hide(shapes),
        }
    }

    pub(crate) fn show(&mut self, shapes: &mut Shapes) {
        match self {
            Self::Cube(cube) => cube.show(shapes),
            Self::Panel(panel) => panel.show(shapes),
        }
    }

    pub(crate) fn collect_pieces(&self, shapes: &Shapes, out: &mut Vec<Piece>) {
        match self {
            Self::Cube(cube) => cube.collect_pieces(shapes, out),
            Self::Panel(panel) => panel.collect_pieces(shapes, out),
        }
    }
}
