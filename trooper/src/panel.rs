//! Panels group the cubes that lie inside one face of the trooper.

use bampf_core::{Level, Piece, PieceId, PieceKind};
use glam::Vec3;

use crate::{
    cube::{Cube, CUBE_CELLS},
    ordering::{Axis, Metric},
    shapes::Shapes,
};
use tracing::trace;

/// One of the six faces of the trooper volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Face {
    pub(crate) axis: Axis,
    pub(crate) positive: bool,
}

impl Face {
    /// Faces in panel construction order.
    pub(crate) const ALL: [Self; 6] = [
        Self::new(Axis::X, true),
        Self::new(Axis::X, false),
        Self::new(Axis::Y, true),
        Self::new(Axis::Y, false),
        Self::new(Axis::Z, true),
        Self::new(Axis::Z, false),
    ];

    const fn new(axis: Axis, positive: bool) -> Self {
        Self { axis, positive }
    }

    pub(crate) fn normal(self) -> Vec3 {
        if self.positive {
            self.axis.unit()
        } else {
            -self.axis.unit()
        }
    }
}

/// The cubes inside one face, rendered as a single slab once all are full.
///
/// Cells are spread evenly: attach feeds the first of the least filled cubes
/// and detach drains the last of the most filled ones, so a detach always
/// undoes the latest attach and the face grows as one even sheet.
#[derive(Debug)]
pub(crate) struct Panel {
    face: Face,
    center: Vec3,
    span: u32,
    cube_size: f32,
    count: u32,
    max: u32,
    shown: bool,
    cubes: Vec<Cube>,
    slab: Option<PieceId>,
}

impl Panel {
    pub(crate) fn new(face: Face, level: Level) -> Self {
        let cube_size = level.cube_size();
        let span = level.get().saturating_sub(1);
        let offset = level.get() as f32 * cube_size * 0.5;
        Self {
            face,
            center: face.normal() * offset,
            span,
            cube_size,
            count: 0,
            max: span * span * CUBE_CELLS,
            shown: true,
            cubes: Vec::with_capacity((span * span) as usize),
            slab: None,
        }
    }

    /// Adds a cube lying inside the face. Only used while building the volume.
    pub(crate) fn add_cube(&mut self, center: Vec3) {
        let cube = Cube::new(center, self.cube_size, Metric::Planar(self.face.axis));
        self.cubes.push(cube);
    }

    pub(crate) fn face(&self) -> Face {
        self.face
    }

    pub(crate) fn cube_count(&self) -> u32 {
        self.cubes.len() as u32
    }

    pub(crate) fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn max(&self) -> u32 {
        self.max
    }

    pub(crate) fn is_full(&self) -> bool {
        self.max > 0 && self.count == self.max
    }

    pub(crate) fn attach(&mut self, shapes: &mut Shapes) -> bool {
        if self.count >= self.max {
            return false;
        }
        let index = self
            .lightest_cube()
            .expect("a panel below capacity holds a cube below capacity");
        self.count += 1;
        let merging = self.shown && self.is_full();
        if merging {
            for cube in &mut self.cubes {
                cube.hide(shapes);
            }
        }
        let attached = self.cubes[index].attach(shapes);
        debug_assert!(attached, "lightest cube accepts a cell");
        if merging {
            self.slab = Some(shapes.spawn(self.slab_piece()));
            trace!("panel {:?} merged into a slab", self.face);
        }
        true
    }

    pub(crate) fn detach(&mut self, shapes: &mut Shapes) -> bool {
        if self.count == 0 {
            return false;
        }
        let index = self
            .heaviest_cube()
            .expect("a non-empty panel holds a non-empty cube");
        let demerging = self.shown && self.is_full();
        self.count -= 1;
        if demerging {
            if let Some(slab) = self.slab.take() {
                shapes.despawn(slab);
            }
            for cube in &mut self.cubes {
                cube.show(shapes);
            }
            trace!("panel {:?} split back into cubes", self.face);
        }
        let detached = self.cubes[index].detach(shapes);
        debug_assert!(detached, "heaviest cube gives up a cell");
        true
    }

    /// Clears the panel and replays attaches until it holds `count` cells.
    pub(crate) fn reset(&mut self, count: u32, shapes: &mut Shapes) {
        if let Some(slab) = self.slab.take() {
            shapes.despawn(slab);
        }
        for cube in &mut self.cubes {
            cube.reset(0, shapes);
        }
        self.shown = true;
        self.count = 0;
        for _ in 0..count.min(self.max) {
            let _ = self.attach(shapes);
        }
    }

    pub(crate) fn hide(&mut self, shapes: &mut Shapes) {
        if let Some(slab) = self.slab.take() {
            shapes.despawn(slab);
        }
        for cube in &mut self.cubes {
            cube.hide(shapes);
        }
        self.shown = false;
    }

    pub(crate) fn show(&mut self, shapes: &mut Shapes) {
        self.hide(shapes);
        self.shown = true;
        if self.is_full() {
            self.slab = Some(shapes.spawn(self.slab_piece()));
            return;
        }
        for cube in &mut self.cubes {
            cube.show(shapes);
        }
    }

    pub(crate) fn collect_pieces(&self, shapes: &Shapes, out: &mut Vec<Piece>) {
        out.extend(self.slab.and_then(|slab| shapes.get(slab)));
        for cube in &self.cubes {
            cube.collect_pieces(shapes, out);
        }
    }

    fn lightest_cube(&self) -> Option<usize> {
        self.cubes
            .iter()
            .enumerate()
            .filter(|(_, cube)| !cube.is_full())
            .min_by_key(|(_, cube)| cube.count())
            .map(|(index, _)| index)
    }

    fn heaviest_cube(&self) -> Option<usize> {
        self.cubes
            .iter()
            .enumerate()
            .filter(|(_, cube)| cube.count() > 0)
            .max_by_key(|(_, cube)| cube.count())
            .map(|(index, _)| index)
    }

    fn slab_piece(&self) -> Piece {
        let depth = self.cube_size * 0.5;
        let breadth = self.span as f32 * depth;
        let mut scale = Vec3::splat(breadth);
        match self.face.axis {
            Axis::X => scale.x = depth,
            Axis::Y => scale.y = depth,
            Axis::Z => scale.z = depth,
        }
        Piece::new(PieceKind::Slab, self.center, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Level 3 face with its 2x2 cubes, each seeded like a fresh trooper.
    fn seeded_panel(shapes: &mut Shapes) -> Panel {
        let level = Level::new(3);
        let mut panel = Panel::new(Face::ALL[0], level);
        let size = level.cube_size();
        let x = 3.0 * size * 0.5;
        for (y, z) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
            panel.add_cube(Vec3::new(x, y * size * 0.5, z * size * 0.5));
        }
        panel.reset(4 * panel.cube_count(), shapes);
        panel
    }

    fn cube_counts(panel: &Panel) -> Vec<u32> {
        panel.cubes.iter().map(Cube::count).collect()
    }

    #[test]
    fn capacity_follows_level() {
        assert_eq!(Panel::new(Face::ALL[3], Level::new(1)).max(), 0);
        assert_eq!(Panel::new(Face::ALL[3], Level::new(2)).max(), 8);
        assert_eq!(Panel::new(Face::ALL[3], Level::new(4)).max(), 72);
    }

    #[test]
    fn panel_center_sits_on_its_face() {
        let panel = Panel::new(Face::ALL[5], Level::new(2));
        assert_eq!(panel.face(), Face::ALL[5]);
        assert_eq!(panel.center, Vec3::new(0.0, 0.0, -1.0 / 3.0));
    }

    #[test]
    fn attach_spreads_cells_evenly() {
        let mut shapes = Shapes::default();
        let mut panel = seeded_panel(&mut shapes);
        assert_eq!(cube_counts(&panel), vec![4, 4, 4, 4]);

        for _ in 0..6 {
            assert!(panel.attach(&mut shapes));
        }

        assert_eq!(cube_counts(&panel), vec![6, 6, 5, 5]);
        assert_eq!(panel.count(), 22);
    }

    #[test]
    fn detach_undoes_the_latest_attach() {
        let mut shapes = Shapes::default();
        let mut panel = seeded_panel(&mut shapes);
        let mut history = vec![cube_counts(&panel)];

        for _ in 0..7 {
            assert!(panel.attach(&mut shapes));
            history.push(cube_counts(&panel));
        }
        let _ = history.pop();
        while let Some(expected) = history.pop() {
            assert!(panel.detach(&mut shapes));
            assert_eq!(cube_counts(&panel), expected);
        }
    }

    #[test]
    fn full_panel_collapses_into_a_slab() {
        let mut shapes = Shapes::default();
        let mut panel = seeded_panel(&mut shapes);

        while panel.attach(&mut shapes) {}

        let mut rendered = Vec::new();
        panel.collect_pieces(&shapes, &mut rendered);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].kind, PieceKind::Slab);
        assert_eq!(rendered[0].scale.x, panel.cube_size * 0.5);
        assert_eq!(rendered[0].scale.y, panel.cube_size);
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn detaching_a_full_panel_restores_its_cubes() {
        let mut shapes = Shapes::default();
        let mut panel = seeded_panel(&mut shapes);
        panel.reset(panel.max() - 1, &mut shapes);
        let before = cube_counts(&panel);
        assert!(panel.attach(&mut shapes));

        assert!(panel.detach(&mut shapes));

        assert_eq!(cube_counts(&panel), before);
        let mut rendered = Vec::new();
        panel.collect_pieces(&shapes, &mut rendered);
        let merged = rendered
            .iter()
            .filter(|piece| piece.kind == PieceKind::Cube)
            .count();
        let cells = rendered
            .iter()
            .filter(|piece| piece.kind == PieceKind::Cell)
            .count();
        assert_eq!((merged, cells), (3, 7));
    }

    #[test]
    fn empty_level_one_panel_refuses_cells() {
        let mut shapes = Shapes::default();
        let mut panel = Panel::new(Face::ALL[0], Level::new(1));

        assert!(!panel.attach(&mut shapes));
        assert!(!panel.detach(&mut shapes));
        assert!(!panel.is_full());
    }
}
