//! Seeded random runs that check the trooper invariants after every step.

use anyhow::{ensure, Result};
use bampf_trooper::query;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::{script::Step, session::Session};

/// Counters gathered over a soak run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SoakReport {
    pub(crate) steps: usize,
    pub(crate) merges: usize,
    pub(crate) lowest: u32,
    pub(crate) highest: u32,
}

/// Runs `steps` random steps drawn from a generator seeded with `seed`.
pub(crate) fn run(session: &mut Session, steps: usize, seed: u64) -> Result<SoakReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let start = query::health(session.trooper()).health;
    let mut report = SoakReport {
        lowest: start,
        highest: start,
        ..SoakReport::default()
    };
    let mut was_full = false;

    for index in 0..steps {
        let step = random_step(&mut rng);
        session.run(step)?;
        check(session, index, step)?;

        let health = query::health(session.trooper());
        if health.is_full() && !was_full {
            report.merges += 1;
        }
        was_full = health.is_full();
        report.lowest = report.lowest.min(health.health);
        report.highest = report.highest.max(health.health);
        report.steps += 1;
    }

    info!(
        steps = report.steps,
        merges = report.merges,
        lowest = report.lowest,
        highest = report.highest,
        seed,
        "soak finished"
    );
    Ok(report)
}

fn random_step(rng: &mut ChaCha8Rng) -> Step {
    match rng.gen_range(0..20) {
        0..=6 => Step::Attach(rng.gen_range(1..64)),
        7..=11 => Step::Detach(rng.gen_range(1..64)),
        12 => Step::DetachCores(rng.gen_range(1..128)),
        13 => Step::Pickup(rng.gen_range(1..8)),
        14 => Step::Collide(1),
        15 => Step::Tick(rng.gen_range(1..500)),
        16 => Step::Cloak,
        17 => Step::Decloak,
        18 => Step::Teleport,
        _ => {
            if rng.gen_bool(0.5) {
                Step::Reset
            } else {
                Step::Recharge
            }
        }
    }
}

fn check(session: &Session, index: usize, step: Step) -> Result<()> {
    let trooper = session.trooper();
    let health = query::health(trooper);
    let energy = query::energy(trooper);
    let counted: u32 = query::box_counts(trooper).iter().sum();

    ensure!(
        health.health <= health.max,
        "step {index} ({step:?}): health {} exceeds {}",
        health.health,
        health.max
    );
    ensure!(
        counted == health.health,
        "step {index} ({step:?}): boxes hold {counted} cells but health is {}",
        health.health
    );
    ensure!(
        session.scene().len() == query::piece_count(trooper),
        "step {index} ({step:?}): scene mirrors {} pieces but the trooper owns {}",
        session.scene().len(),
        query::piece_count(trooper)
    );
    ensure!(
        !health.is_full() || query::piece_count(trooper) == 1,
        "step {index} ({step:?}): full trooper is drawn with {} pieces",
        query::piece_count(trooper)
    );
    ensure!(
        energy.teleport <= energy.teleport_max && energy.cloak <= energy.cloak_max,
        "step {index} ({step:?}): energy {energy:?} exceeds its limits"
    );
    Ok(())
}
