//! Arena of the visual pieces owned by one trooper volume.

use std::collections::BTreeMap;

use bampf_core::{Event, Piece, PieceId};

/// Live pieces plus a journal of spawn/despawn events not yet handed out.
#[derive(Debug, Default)]
pub(crate) struct Shapes {
    next_id: u32,
    live: BTreeMap<PieceId, Piece>,
    journal: Vec<Event>,
}

impl Shapes {
    pub(crate) fn spawn(&mut self, piece: Piece) -> PieceId {
        let piece_id = PieceId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let previous = self.live.insert(piece_id, piece);
        assert!(previous.is_none(), "piece {piece_id:?} spawned twice");
        self.journal.push(Event::PieceSpawned { piece_id, piece });
        piece_id
    }

    pub(crate) fn despawn(&mut self, piece_id: PieceId) {
        let removed = self.live.remove(&piece_id);
        assert!(removed.is_some(), "piece {piece_id:?} despawned while not live");
        self.journal.push(Event::PieceDespawned { piece_id });
    }

    pub(crate) fn get(&self, piece_id: PieceId) -> Option<Piece> {
        self.live.get(&piece_id).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn drain_journal(&mut self, out: &mut Vec<Event>) {
        out.append(&mut self.journal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bampf_core::PieceKind;
    use glam::Vec3;

    fn cell() -> Piece {
        Piece::new(PieceKind::Cell, Vec3::ZERO, Vec3::splat(0.1))
    }

    #[test]
    fn spawn_and_despawn_are_journaled_in_order() {
        let mut shapes = Shapes::default();
        let first = shapes.spawn(cell());
        let second = shapes.spawn(cell());
        shapes.despawn(first);

        let mut events = Vec::new();
        shapes.drain_journal(&mut events);

        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes.get(second), Some(cell()));
        assert_eq!(shapes.get(first), None);
        assert_eq!(
            events,
            vec![
                Event::PieceSpawned {
                    piece_id: first,
                    piece: cell(),
                },
                Event::PieceSpawned {
                    piece_id: second,
                    piece: cell(),
                },
                Event::PieceDespawned { piece_id: first },
            ]
        );

        events.clear();
        shapes.drain_journal(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    #[should_panic(expected = "despawned while not live")]
    fn despawning_twice_is_a_defect() {
        let mut shapes = Shapes::default();
        let piece_id = shapes.spawn(cell());
        shapes.despawn(piece_id);
        shapes.despawn(piece_id);
    }
}
