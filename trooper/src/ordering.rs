//! Slot ordering that fixes the attach and detach sequence of every cube.
//!
//! A cube splits its bounding box into eight octants. The octant centers are
//! sorted once when the cube is built and never again, so the n-th attached
//! cell always lands in the same slot no matter how often the cube filled up
//! and drained before.

use glam::Vec3;

/// Cartesian axis of the trooper volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub(crate) const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    pub(crate) fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// Distance measure used to sort the octants of a cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Metric {
    /// Squared distance to the volume origin. Used by corner and edge cubes so
    /// cells nearest the middle of the volume attach first and detach last.
    Radial,
    /// Squared length of the projection onto a panel's face normal. Panels sit
    /// far from the origin, where raw distance would favour the octants that
    /// happen to face the origin diagonally instead of the inner layer.
    Planar(Axis),
}

impl Metric {
    pub(crate) fn distance(self, position: Vec3) -> f32 {
        match self {
            Self::Radial => position.length_squared(),
            Self::Planar(axis) => {
                let normal = axis.unit();
                (normal * position.dot(normal)).length_squared()
            }
        }
    }
}

/// Centers of the eight octants of a cube, in x-major generation order.
pub(crate) fn octant_centers(center: Vec3, size: f32) -> [Vec3; 8] {
    let quarter = size * 0.25;
    let mut centers = [Vec3::ZERO; 8];
    for (index, slot) in centers.iter_mut().enumerate() {
        let offset = |bit: usize| if index & bit == 0 { -quarter } else { quarter };
        *slot = center + Vec3::new(offset(4), offset(2), offset(1));
    }
    centers
}

/// Octant centers sorted ascending by the metric.
///
/// The sort is stable, so octants at equal distance keep generation order and
/// the result is identical for every cube built with the same inputs.
pub(crate) fn sorted_slots(center: Vec3, size: f32, metric: Metric) -> [Vec3; 8] {
    let mut slots = octant_centers(center, size);
    slots.sort_by(|left, right| metric.distance(*left).total_cmp(&metric.distance(*right)));
    slots
}
