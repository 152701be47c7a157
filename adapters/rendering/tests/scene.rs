use bampf_core::{Command, EnergyConfig, Level};
use bampf_rendering::{Material, Scene};
use bampf_trooper::{self as trooper, query, Trooper};
use glam::Vec3;

fn step(trooper: &mut Trooper, scene: &mut Scene, command: Command) {
    let mut events = Vec::new();
    trooper::apply(trooper, command, &mut events);
    scene.apply(&events).expect("trooper events stay consistent");
}

#[test]
fn scene_mirrors_a_trooper_through_merge_and_split() {
    let mut trooper = Trooper::new(Level::new(2), EnergyConfig::default());
    let mut scene = Scene::new();

    step(&mut trooper, &mut scene, Command::Reset);
    assert_eq!(scene.len(), query::piece_count(&trooper));
    assert_eq!(scene.material_counts()[2], 1);

    while !query::health(&trooper).is_full() {
        step(&mut trooper, &mut scene, Command::Attach);
        assert_eq!(scene.len(), query::piece_count(&trooper));
    }
    assert_eq!(scene.material_counts(), [0, 1, 0]);
    let (_, neo) = scene.iter().next().expect("merged volume is drawn");
    assert_eq!(neo.material, Material::Blue);

    step(&mut trooper, &mut scene, Command::DetachCores { loss: 24 });
    assert_eq!(scene.len(), query::piece_count(&trooper));
    assert_eq!(scene.material_counts()[2], 1);

    let (low, high) = scene.bounds().expect("scene holds pieces");
    // The volume spans one unit around the origin.
    assert!(low.cmpge(Vec3::splat(-0.501)).all());
    assert!(high.cmple(Vec3::splat(0.501)).all());
}
