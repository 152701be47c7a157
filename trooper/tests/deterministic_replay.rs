use std::collections::BTreeMap;

use bampf_core::{Command, EnergyConfig, Event, Level, Piece, PieceId};
use bampf_trooper::{self as trooper, query, Trooper};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const STEPS: usize = 4_000;

#[test]
fn random_command_streams_respect_the_bounds() {
    for (level, seed) in [(0, 7), (1, 11), (2, 13), (3, 17), (4, 19)] {
        let capacity = Level::new(level).capacity() as usize;
        let mut script = random_script(seed, STEPS);
        script.extend(std::iter::repeat(Command::Attach).take(capacity + 1));
        script.extend(random_script(seed + 1, STEPS));
        script.extend(std::iter::repeat(Command::Detach).take(capacity + 1));
        let outcome = replay(Level::new(level), &script);

        assert!(outcome.max_health <= Level::new(level).capacity());
        assert!(outcome.saw_full);
        assert!(outcome.saw_empty);
    }
}

#[test]
fn replays_are_deterministic() {
    let script = random_script(0x5eed, STEPS);

    let first = replay(Level::new(2), &script);
    let second = replay(Level::new(2), &script);

    assert_eq!(first.events, second.events, "event streams diverged");
}

#[test]
fn piece_events_mirror_the_live_pieces() {
    let script = random_script(23, STEPS);
    let mut trooper = Trooper::new(Level::new(2), EnergyConfig::default());
    let mut scene: BTreeMap<PieceId, Piece> = BTreeMap::new();

    for command in script {
        let mut events = Vec::new();
        trooper::apply(&mut trooper, command, &mut events);
        for event in events {
            match event {
                Event::PieceSpawned { piece_id, piece } => {
                    assert!(scene.insert(piece_id, piece).is_none());
                }
                Event::PieceDespawned { piece_id } => {
                    assert!(scene.remove(&piece_id).is_some());
                }
                _ => {}
            }
        }

        let mut mirrored: Vec<Piece> = scene.values().copied().collect();
        let mut live = query::pieces(&trooper);
        sort_pieces(&mut mirrored);
        sort_pieces(&mut live);
        assert_eq!(mirrored, live);
    }
}

struct Outcome {
    events: Vec<Event>,
    max_health: u32,
    saw_full: bool,
    saw_empty: bool,
}

fn replay(level: Level, script: &[Command]) -> Outcome {
    let mut trooper = Trooper::new(level, EnergyConfig::default());
    let mut outcome = Outcome {
        events: Vec::new(),
        max_health: 0,
        saw_full: false,
        saw_empty: false,
    };

    for command in script {
        trooper::apply(&mut trooper, *command, &mut outcome.events);

        let health = query::health(&trooper);
        assert!(health.health <= health.max);
        assert_eq!(query::box_counts(&trooper).iter().sum::<u32>(), health.health);
        assert_eq!(query::pieces(&trooper).len(), query::piece_count(&trooper));
        if health.is_full() {
            assert_eq!(query::piece_count(&trooper), 1);
        }

        let energy = query::energy(&trooper);
        assert!(energy.teleport <= energy.teleport_max);
        assert!(energy.cloak <= energy.cloak_max);

        outcome.max_health = outcome.max_health.max(health.health);
        outcome.saw_full |= health.is_full();
        outcome.saw_empty |= health.is_depleted();
    }

    outcome
}

/// Long runs of attaches and detaches so every level reaches both bounds.
fn random_script(seed: u64, steps: usize) -> Vec<Command> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut script = Vec::with_capacity(steps);
    while script.len() < steps {
        let run = rng.gen_range(1..400);
        let command = match rng.gen_range(0..10) {
            0..=3 => Command::Attach,
            4..=6 => Command::Detach,
            7 => Command::DetachCores {
                loss: rng.gen_range(1..100),
            },
            8 => Command::Tick,
            _ => match rng.gen_range(0..5) {
                0 => Command::Reset,
                1 => Command::Cloak {
                    enable: rng.gen_bool(0.5),
                },
                2 => Command::Teleport,
                3 => Command::AddCloakEnergy,
                _ => Command::ResetEnergy,
            },
        };
        let repeat = match command {
            Command::Attach | Command::Detach | Command::Tick => run,
            _ => 1,
        };
        script.extend(std::iter::repeat(command).take(repeat));
    }
    script.truncate(steps);
    script
}

fn sort_pieces(pieces: &mut [Piece]) {
    pieces.sort_by(|left, right| {
        left.kind
            .cmp(&right.kind)
            .then(left.center.x.total_cmp(&right.center.x))
            .then(left.center.y.total_cmp(&right.center.y))
            .then(left.center.z.total_cmp(&right.center.z))
    });
}
