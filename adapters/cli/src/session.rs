//! A trooper wired to its observers, its scene mirror, and the gameplay rules.

use std::{cell::RefCell, io::Write, rc::Rc};

use anyhow::{Context, Result};
use bampf_core::{Command, Event, Level, TrooperConfig};
use bampf_rendering::{RenderingBackend, Scene};
use bampf_system_hud::{MinimapMarker, XpBar};
use bampf_system_progression::{Encounter, LevelCompletion, Outcome, Progression, TrooperStatus};
use bampf_trooper::{self as trooper, query, Trooper};
use tracing::debug;

use crate::script::Step;

const OBSERVER_KEY_XP: &str = "xpbar";
const OBSERVER_KEY_MINIMAP: &str = "minimap";
const OBSERVER_KEY_COMPLETION: &str = "completion";

/// Trooper plus everything that watches it.
pub(crate) struct Session {
    trooper: Trooper,
    scene: Scene,
    progression: Progression,
    xp: Rc<RefCell<XpBar>>,
    marker: Rc<RefCell<MinimapMarker>>,
    completion: Rc<RefCell<LevelCompletion>>,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(level: Level, config: &TrooperConfig) -> Result<Self> {
        let mut trooper = Trooper::new(level, config.energy);
        let xp = Rc::new(RefCell::new(XpBar::new(
            config.cells.gain(level),
            query::health(&trooper),
            query::energy(&trooper),
        )));
        let marker = Rc::new(RefCell::new(MinimapMarker::default()));
        let completion = Rc::new(RefCell::new(LevelCompletion::default()));

        let volume = trooper.volume_mut();
        volume.monitor_health(OBSERVER_KEY_XP, Rc::clone(&xp));
        volume.monitor_health(OBSERVER_KEY_MINIMAP, Rc::clone(&marker));
        volume.monitor_health(OBSERVER_KEY_COMPLETION, Rc::clone(&completion));
        trooper
            .energy_mut()
            .monitor_energy(OBSERVER_KEY_XP, Rc::clone(&xp));

        let mut session = Self {
            trooper,
            scene: Scene::new(),
            progression: Progression::new(config.cells),
            xp,
            marker,
            completion,
            events: Vec::new(),
        };
        session.apply(Command::Reset)?;
        Ok(session)
    }

    pub(crate) fn trooper(&self) -> &Trooper {
        &self.trooper
    }

    pub(crate) fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Runs one scripted step to completion.
    pub(crate) fn run(&mut self, step: Step) -> Result<()> {
        debug!(?step, "running step");
        match step {
            Step::Reset => self.apply(Command::Reset),
            Step::Attach(count) => self.repeat(count, Command::Attach),
            Step::Detach(count) => self.repeat(count, Command::Detach),
            Step::DetachCores(loss) => self.apply(Command::DetachCores { loss }),
            Step::Tick(count) => self.repeat(count, Command::Tick),
            Step::Cloak => self.apply(Command::Cloak { enable: true }),
            Step::Decloak => self.apply(Command::Cloak { enable: false }),
            Step::Teleport => self.apply(Command::Teleport),
            Step::Recharge => self.apply(Command::ResetEnergy),
            Step::Pickup(count) => self.encounter(count, Encounter::CorePickup),
            Step::Collide(count) => self.encounter(count, Encounter::SentinelCollision),
        }
    }

    /// Single line describing the trooper and its observers.
    pub(crate) fn status_line(&self) -> String {
        let health = query::health(&self.trooper);
        let energy = query::energy(&self.trooper);
        let cloaked = query::is_cloaked(&self.trooper);
        let xp = self.xp.borrow();
        format!(
            "health {}/{} (entry {}) cores {} {:?} | teleport {}/{} {:?} | cloak {}/{}{} | minimap {:?} | {:?}",
            health.health,
            health.max,
            health.mid,
            xp.cores(),
            xp.health_tint(),
            energy.teleport,
            energy.teleport_max,
            xp.teleport_tint(),
            energy.cloak,
            energy.cloak_max,
            if cloaked { " cloaked" } else { "" },
            self.marker.borrow().color(),
            self.outcome(),
        )
    }

    pub(crate) fn outcome(&self) -> Outcome {
        self.completion
            .borrow()
            .outcome(query::is_cloaked(&self.trooper))
    }

    fn repeat(&mut self, count: u32, command: Command) -> Result<()> {
        for _ in 0..count {
            self.apply(command)?;
        }
        Ok(())
    }

    fn encounter(&mut self, count: u32, encounter: Encounter) -> Result<()> {
        let mut commands = Vec::new();
        for _ in 0..count {
            let status = TrooperStatus {
                level: query::level(&self.trooper),
                health: query::health(&self.trooper),
                cloaked: query::is_cloaked(&self.trooper),
            };
            commands.clear();
            self.progression
                .handle(std::slice::from_ref(&encounter), status, &mut commands);
            for command in &commands {
                self.apply(*command)?;
            }
        }
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        self.events.clear();
        trooper::apply(&mut self.trooper, command, &mut self.events);
        self.scene
            .apply(&self.events)
            .with_context(|| format!("scene rejected the events of {command:?}"))
    }
}

/// Backend that writes a one-line summary of the scene per step.
pub(crate) struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, label: &str, scene: &Scene) -> Result<()> {
        let [green, blue, red] = scene.material_counts();
        let extent = match scene.bounds() {
            Some((low, high)) => format!("{:.3}", (high - low).max_element()),
            None => "-".to_owned(),
        };
        writeln!(
            self.out,
            "{label:<18} pieces {:>4} (green {green}, blue {blue}, red {red}) extent {extent}",
            scene.len()
        )
        .context("failed to write scene summary")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bampf_system_hud::MarkerColor;

    fn session(level: u32) -> Session {
        Session::new(Level::new(level), &TrooperConfig::default()).expect("session starts")
    }

    #[test]
    fn pickups_fill_the_trooper() {
        let mut session = session(1);

        session.run(Step::Pickup(60)).expect("pickups apply");

        assert!(query::is_worthy(session.trooper()));
        assert_eq!(session.outcome(), Outcome::Worthy);
        assert_eq!(session.marker.borrow().color(), MarkerColor::Green);
        assert_eq!(session.scene().len(), 1);
    }

    #[test]
    fn collisions_use_the_level_loss() {
        let mut session = session(2);

        session.run(Step::Collide(2)).expect("collisions apply");

        assert_eq!(query::health(session.trooper()).health, 56 - 24);
        assert_eq!(session.scene().len(), query::piece_count(session.trooper()));
    }

    #[test]
    fn status_line_reports_the_readings() {
        let mut session = session(1);
        session.run(Step::Cloak).expect("cloak applies");

        let line = session.status_line();

        assert!(line.starts_with("health 8/64 (entry 8) cores 8/64 Normal"));
        assert!(line.contains("cloak 1000/1000 cloaked"));
        assert!(line.ends_with("InProgress"));
    }

    #[test]
    fn text_backend_summarises_the_scene() {
        let session = session(1);
        let mut backend = TextBackend::new(Vec::new());

        backend
            .present("reset", session.scene())
            .expect("writing to memory succeeds");

        let text = String::from_utf8(backend.out).expect("summary is utf-8");
        assert!(text.starts_with("reset"));
        assert!(text.contains("pieces    9 (green 8, blue 0, red 1)"));
    }
}
