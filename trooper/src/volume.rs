//! The progress volume: a quantity rendered as a growing block of cells.

use bampf_core::{Event, HealthMonitor, HealthReading, Level, Piece, PieceId, PieceKind};
use glam::Vec3;
use tracing::{debug, trace};

use crate::{
    cell_box::CellBox,
    cube::Cube,
    ordering::{Axis, Metric},
    panel::{Face, Panel},
    registry::Registry,
    shapes::Shapes,
};

/// Cells a corner cube holds after a reset.
const CORNER_SEED: u32 = 1;
/// Cells an edge cube holds after a reset.
const EDGE_SEED: u32 = 2;
/// Cells each cube inside a panel holds after a reset.
const FACE_SEED: u32 = 4;

/// Center half extent relative to the interior it stands in for.
const CENTER_SCALE: f32 = 0.45;
/// Half extent of the merged volume.
const NEO_SCALE: f32 = 0.5;

/// Merged state of a full volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Neo {
    piece_id: PieceId,
    /// Box that received the attach which completed the volume.
    completed_by: usize,
}

/// Health of one trooper, shown as a cube of cells wrapped around the
/// previous level's volume.
///
/// Cells live in a fixed list of boxes: the six face panels first, then the
/// corner and edge cubes in lattice order. `attach` feeds the first box with
/// room left and `detach` drains the first box that still holds cells, so
/// the same sequence of calls always yields the same arrangement. A full
/// volume is rendered as one piece.
#[derive(Debug)]
pub struct ProgressVolume {
    level: Level,
    boxes: Vec<CellBox>,
    seeds: Vec<u32>,
    center: Option<PieceId>,
    neo: Option<Neo>,
    shapes: Shapes,
    monitors: Registry<dyn HealthMonitor>,
}

impl ProgressVolume {
    /// Builds the volume for the level, seeded with the level's entry cells.
    #[must_use]
    pub fn new(level: Level) -> Self {
        let (boxes, seeds) = if level.is_preview() {
            preview_boxes()
        } else {
            lattice_boxes(level)
        };
        let mut volume = Self {
            level,
            boxes,
            seeds,
            center: None,
            neo: None,
            shapes: Shapes::default(),
            monitors: Registry::default(),
        };
        volume.rebuild();
        volume
    }

    /// Level the volume was built for.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Current cell count together with the level's entry and full counts.
    #[must_use]
    pub fn health(&self) -> HealthReading {
        let health = self.boxes.iter().map(CellBox::count).sum();
        HealthReading::new(health, self.level.entry_cells(), self.level.capacity())
    }

    /// Reports whether every box is full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.neo.is_some()
    }

    /// Adds one cell. Returns `false` when the volume is already full.
    pub fn attach(&mut self) -> bool {
        let attached = self.attach_cell();
        if attached {
            self.notify();
        }
        attached
    }

    /// Removes one cell. Returns `false` when the volume is already empty.
    pub fn detach(&mut self) -> bool {
        let detached = self.detach_cell();
        if detached {
            self.notify();
        }
        detached
    }

    /// Removes up to `loss` cells and notifies monitors once. Returns the
    /// number of cells actually removed.
    pub fn detach_cores(&mut self, loss: u32) -> u32 {
        let mut removed = 0;
        while removed < loss && self.detach_cell() {
            removed += 1;
        }
        if removed > 0 {
            debug!(loss, removed, "detached cores");
            self.notify();
        }
        removed
    }

    /// Discards every piece and reseeds each box with its entry count.
    pub fn reset(&mut self) {
        self.rebuild();
        debug!(level = self.level.get(), health = self.health().health, "volume reset");
        self.notify();
    }

    /// Registers a health monitor, replacing any previous one under `id`.
    pub fn monitor_health(&mut self, id: impl Into<String>, monitor: impl HealthMonitor + 'static) {
        let _ = self.monitors.register(id, Box::new(monitor));
    }

    /// Drops the health monitor registered under `id`.
    pub fn ignore_health(&mut self, id: &str) -> bool {
        self.monitors.unregister(id)
    }

    /// Pieces currently making up the visual, outermost first.
    #[must_use]
    pub fn pieces(&self) -> Vec<Piece> {
        let mut out = Vec::new();
        out.extend(self.neo.and_then(|neo| self.shapes.get(neo.piece_id)));
        out.extend(self.center.and_then(|center| self.shapes.get(center)));
        for cell_box in &self.boxes {
            cell_box.collect_pieces(&self.shapes, &mut out);
        }
        out
    }

    /// Number of live pieces owned by the volume.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.shapes.len()
    }

    /// Cell count of every box in attach order.
    #[must_use]
    pub fn box_counts(&self) -> Vec<u32> {
        self.boxes.iter().map(CellBox::count).collect()
    }

    /// Moves the piece spawn and despawn events recorded since the last call.
    pub fn drain_piece_events(&mut self, out: &mut Vec<Event>) {
        self.shapes.drain_journal(out);
    }

    fn attach_cell(&mut self) -> bool {
        if self.neo.is_some() {
            return false;
        }
        let Some(index) = self
            .boxes
            .iter()
            .position(|cell_box| !cell_box.is_full())
        else {
            return false;
        };
        let reading = self.health();
        let completing = reading.health + 1 == reading.max;
        if completing {
            for cell_box in &mut self.boxes {
                cell_box.hide(&mut self.shapes);
            }
            if let Some(center) = self.center.take() {
                self.shapes.despawn(center);
            }
        }
        let attached = self.boxes[index].attach(&mut self.shapes);
        debug_assert!(attached, "first box with room accepts a cell");
        trace!(index, health = reading.health + 1, "attached cell");
        if completing {
            let piece = Piece::new(PieceKind::Neo, Vec3::ZERO, Vec3::splat(NEO_SCALE));
            self.neo = Some(Neo {
                piece_id: self.shapes.spawn(piece),
                completed_by: index,
            });
            debug!(level = self.level.get(), "volume merged");
        }
        true
    }

    fn detach_cell(&mut self) -> bool {
        if let Some(neo) = self.neo.take() {
            self.shapes.despawn(neo.piece_id);
            for cell_box in &mut self.boxes {
                cell_box.show(&mut self.shapes);
            }
            self.spawn_center();
            let target = &mut self.boxes[neo.completed_by];
            assert!(target.is_full(), "merged volume holds only full boxes");
            let detached = target.detach(&mut self.shapes);
            debug_assert!(detached, "full box gives up a cell");
            debug!(level = self.level.get(), index = neo.completed_by, "volume split");
            return true;
        }
        let Some(index) = self
            .boxes
            .iter()
            .position(|cell_box| cell_box.count() > 0)
        else {
            return false;
        };
        let detached = self.boxes[index].detach(&mut self.shapes);
        debug_assert!(detached, "non-empty box gives up a cell");
        trace!(index, "detached cell");
        true
    }

    fn rebuild(&mut self) {
        if let Some(neo) = self.neo.take() {
            self.shapes.despawn(neo.piece_id);
        }
        if let Some(center) = self.center.take() {
            self.shapes.despawn(center);
        }
        for (cell_box, seed) in self.boxes.iter_mut().zip(&self.seeds) {
            cell_box.reset(*seed, &mut self.shapes);
        }
        self.spawn_center();
    }

    fn spawn_center(&mut self) {
        if self.level.is_preview() {
            return;
        }
        let inner = (self.level.get() - 1) as f32 * self.level.cube_size();
        let piece = Piece::new(PieceKind::Center, Vec3::ZERO, Vec3::splat(inner * CENTER_SCALE));
        self.center = Some(self.shapes.spawn(piece));
    }

    fn notify(&mut self) {
        let reading = self.health();
        self.monitors.for_each(|monitor| monitor.health_updated(reading));
    }
}

/// The start-screen trooper: one cube at the origin.
fn preview_boxes() -> (Vec<CellBox>, Vec<u32>) {
    let level = Level::PREVIEW;
    let cube = Cube::new(Vec3::ZERO, level.cube_size(), Metric::Radial);
    (vec![CellBox::Cube(cube)], vec![level.entry_cells()])
}

/// Panels followed by the corner and edge cubes of a lattice with
/// `level + 1` cubes along each axis. Interior cubes are covered by the center.
fn lattice_boxes(level: Level) -> (Vec<CellBox>, Vec<u32>) {
    let last = level.get();
    let size = level.cube_size();
    let position = |index: u32| (2.0 * index as f32 - last as f32) * size * 0.5;

    let mut panels: Vec<Panel> = Face::ALL
        .iter()
        .map(|face| Panel::new(*face, level))
        .collect();
    let mut cubes = Vec::new();
    let mut seeds = Vec::new();

    for x in 0..level.lattice_span() {
        for y in 0..level.lattice_span() {
            for z in 0..level.lattice_span() {
                let center = Vec3::new(position(x), position(y), position(z));
                let on_shell: Vec<Face> = Axis::ALL
                    .iter()
                    .zip([x, y, z])
                    .filter(|(_, index)| *index == 0 || *index == last)
                    .map(|(axis, index)| Face {
                        axis: *axis,
                        positive: index == last,
                    })
                    .collect();
                match on_shell.as_slice() {
                    [] => {}
                    [face] => {
                        let panel = panels
                            .iter_mut()
                            .find(|panel| panel.face() == *face)
                            .expect("every face has a panel");
                        panel.add_cube(center);
                    }
                    faces => {
                        cubes.push(CellBox::Cube(Cube::new(center, size, Metric::Radial)));
                        seeds.push(if faces.len() == 3 { CORNER_SEED } else { EDGE_SEED });
                    }
                }
            }
        }
    }

    let panel_seeds = panels.iter().map(|panel| panel.cube_count() * FACE_SEED);
    let seeds = panel_seeds.chain(seeds).collect();
    let boxes = panels
        .into_iter()
        .map(CellBox::Panel)
        .chain(cubes)
        .collect();
    (boxes, seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(volume: &ProgressVolume) -> Vec<PieceKind> {
        volume.pieces().iter().map(|piece| piece.kind).collect()
    }

    #[test]
    fn lattice_holds_panels_then_shell_cubes() {
        let volume = ProgressVolume::new(Level::new(2));

        assert_eq!(volume.boxes.len(), 6 + 8 + 12);
        assert_eq!(&volume.seeds[..7], &[4, 4, 4, 4, 4, 4, 1]);
        assert_eq!(volume.seeds.iter().sum::<u32>(), 56);
        let capacity: u32 = volume.boxes.iter().map(CellBox::max).sum();
        assert_eq!(capacity, 208);
    }

    #[test]
    fn level_one_has_empty_panels_and_eight_corners() {
        let volume = ProgressVolume::new(Level::new(1));

        assert_eq!(volume.box_counts(), [0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1]);
        assert_eq!(volume.health(), HealthReading::new(8, 8, 64));
    }

    #[test]
    fn corner_cubes_sit_at_the_lattice_extremes() {
        let volume = ProgressVolume::new(Level::new(1));

        let cells: Vec<Vec3> = volume
            .pieces()
            .iter()
            .filter(|piece| piece.kind == PieceKind::Cell)
            .map(|piece| piece.center)
            .collect();
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], Vec3::splat(-0.125));
        assert_eq!(cells[7], Vec3::splat(0.125));
    }

    #[test]
    fn preview_is_a_single_seeded_cube() {
        let mut volume = ProgressVolume::new(Level::PREVIEW);

        assert_eq!(volume.health(), HealthReading::new(1, 1, 8));
        assert_eq!(kinds(&volume), vec![PieceKind::Cell]);

        while volume.attach() {}
        assert_eq!(kinds(&volume), vec![PieceKind::Neo]);
        assert!(volume.detach());
        assert_eq!(kinds(&volume), vec![PieceKind::Cell; 7]);
    }

    #[test]
    fn center_tracks_the_inner_volume() {
        let volume = ProgressVolume::new(Level::new(3));
        let center = volume.pieces()[0];

        assert_eq!(center.kind, PieceKind::Center);
        assert_eq!(center.scale, Vec3::splat(2.0 * 0.25 * CENTER_SCALE));
    }

    #[test]
    fn merge_hides_boxes_without_rendering_them_first() {
        let mut volume = ProgressVolume::new(Level::new(1));
        while volume.health().missing() > 1 {
            assert!(volume.attach());
        }
        let mut events = Vec::new();
        volume.drain_piece_events(&mut events);
        events.clear();

        assert!(volume.attach());
        volume.drain_piece_events(&mut events);

        let spawned: Vec<PieceKind> = events
            .iter()
            .filter_map(|event| match event {
                Event::PieceSpawned { piece, .. } => Some(piece.kind),
                _ => None,
            })
            .collect();
        assert_eq!(spawned, vec![PieceKind::Neo]);
        assert_eq!(volume.piece_count(), 1);
    }

    #[test]
    fn reset_restores_the_entry_state_from_full() {
        let mut volume = ProgressVolume::new(Level::new(2));
        let fresh = volume.pieces();
        while volume.attach() {}
        assert!(volume.is_full());

        volume.reset();

        assert!(!volume.is_full());
        assert_eq!(volume.pieces(), fresh);
        assert_eq!(volume.piece_count(), fresh.len());
    }
}
