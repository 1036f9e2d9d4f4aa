use std::time::Duration;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use orbit_logic::OrbitLogicPlugin;
use orbit_models::messages::OrbitFinished;
use orbit_models::orbit::{
    compose_orientation, euler_degrees, OrbitAxis, OrbitController, OrbitInput, OrbitSettings,
    OrbitState, OrbitTarget, OrbitTerminated,
};

#[derive(Resource, Default)]
struct FinishedLog(Vec<Entity>);

fn collect_finished(mut finished: MessageReader<OrbitFinished>, mut log: ResMut<FinishedLog>) {
    log.0.extend(finished.read().map(|message| message.controller));
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, OrbitLogicPlugin));
    app.init_resource::<FinishedLog>();
    app.add_systems(Last, collect_finished);
    app
}

fn unclamped() -> OrbitSettings {
    OrbitSettings { clamp_yaw: false, clamp_pitch: false, ..default() }
}

fn spawn_target(app: &mut App, rotation: Quat) -> Entity {
    app.world_mut().spawn(Transform::from_rotation(rotation)).id()
}

fn spawn_controller(app: &mut App, target: Entity, settings: OrbitSettings, input: OrbitInput) -> Entity {
    app.world_mut()
        .spawn((OrbitController::targeting(target, settings), input))
        .id()
}

fn rotation_of(app: &App, entity: Entity) -> Quat {
    app.world().get::<Transform>(entity).unwrap().rotation
}

fn state_of(app: &App, entity: Entity) -> OrbitState {
    *app.world().get::<OrbitState>(entity).unwrap()
}

#[test]
fn activation_caches_the_target() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let controller = spawn_controller(&mut app, target, unclamped(), OrbitInput::bound(0.0, 0.0));

    app.update();

    assert_eq!(app.world().get::<OrbitTarget>(controller), Some(&OrbitTarget(target)));
    assert!(app.world().get::<OrbitTerminated>(controller).is_none());
    assert!(app.world().resource::<FinishedLog>().0.is_empty());
}

#[test]
fn owner_default_drives_its_own_transform() {
    let mut app = test_app();
    let controller = app
        .world_mut()
        .spawn((
            Transform::default(),
            OrbitController::new(unclamped()),
            OrbitInput::bound(0.0, -2.0),
        ))
        .id();

    app.update();

    assert_eq!(state_of(&app, controller).yaw, 10.0);
    assert_eq!(rotation_of(&app, controller), compose_orientation(0.0, 10.0, 0.0));
}

#[test]
fn one_frame_accumulates_and_applies() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let controller = spawn_controller(&mut app, target, unclamped(), OrbitInput::bound(1.0, -2.0));

    app.update();

    assert_eq!(state_of(&app, controller), OrbitState { yaw: 10.0, pitch: 5.0 });
    assert_eq!(rotation_of(&app, target), compose_orientation(5.0, 10.0, 0.0));
}

#[test]
fn accumulators_persist_across_frames() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let controller = spawn_controller(&mut app, target, unclamped(), OrbitInput::bound(0.0, -1.0));

    for _ in 0..4 {
        app.update();
    }

    assert_eq!(state_of(&app, controller).yaw, 20.0);
    assert_eq!(rotation_of(&app, target), compose_orientation(0.0, 20.0, 0.0));
}

#[test]
fn yaw_offset_is_added_when_composing() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let settings = OrbitSettings { yaw_offset: 45.0, ..unclamped() };
    spawn_controller(&mut app, target, settings, OrbitInput::bound(0.0, -1.0));

    app.update();

    assert_eq!(rotation_of(&app, target), compose_orientation(0.0, 5.0, 45.0));
}

#[test]
fn clamped_yaw_wraps_then_clamps() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let controller = spawn_controller(
        &mut app,
        target,
        OrbitSettings::default(),
        OrbitInput::bound(0.0, -100.0),
    );

    app.update();

    // 500 wraps to 140 and is clamped to the default yaw_max.
    assert_eq!(state_of(&app, controller).yaw, 80.0);
}

#[test]
fn unbound_x_keeps_transform_pitch() {
    let mut app = test_app();
    let target = spawn_target(&mut app, compose_orientation(20.0, 0.0, 0.0));
    let input = OrbitInput { x: OrbitAxis::Unbound, y: OrbitAxis::Bound(-2.0) };
    let controller = spawn_controller(&mut app, target, unclamped(), input);

    app.update();

    assert_eq!(state_of(&app, controller), OrbitState { yaw: 10.0, pitch: 0.0 });
    let (pitch, yaw) = euler_degrees(rotation_of(&app, target));
    assert!((pitch - 20.0).abs() < 1e-3, "pitch was {pitch}");
    assert!((yaw - 10.0).abs() < 1e-3, "yaw was {yaw}");
}

#[test]
fn unbound_y_keeps_transform_yaw() {
    let mut app = test_app();
    let target = spawn_target(&mut app, compose_orientation(0.0, 30.0, 0.0));
    let input = OrbitInput { x: OrbitAxis::Bound(2.0), y: OrbitAxis::Unbound };
    let controller = spawn_controller(&mut app, target, unclamped(), input);

    app.update();

    assert_eq!(state_of(&app, controller), OrbitState { yaw: 0.0, pitch: 10.0 });
    let (pitch, yaw) = euler_degrees(rotation_of(&app, target));
    assert!((pitch - 10.0).abs() < 1e-3, "pitch was {pitch}");
    assert!((yaw - 30.0).abs() < 1e-3, "yaw was {yaw}");
}

#[test]
fn only_x_bound_moves_pitch_over_frames() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let input = OrbitInput { x: OrbitAxis::Bound(2.0), y: OrbitAxis::Unbound };
    spawn_controller(&mut app, target, unclamped(), input);

    for _ in 0..3 {
        app.update();
    }

    let (pitch, yaw) = euler_degrees(rotation_of(&app, target));
    assert!((pitch - 30.0).abs() < 1e-3, "pitch was {pitch}");
    assert!(yaw.abs() < 1e-3, "yaw was {yaw}");
}

#[test]
fn pitch_clamp_holds_across_frames() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let settings = OrbitSettings { clamp_pitch: true, ..unclamped() };
    let controller = spawn_controller(&mut app, target, settings, OrbitInput::bound(3.0, 0.0));

    for _ in 0..5 {
        app.update();
        let pitch = state_of(&app, controller).pitch;
        assert!((-40.0..=40.0).contains(&pitch), "pitch was {pitch}");
    }
    assert_eq!(state_of(&app, controller).pitch, 40.0);

    app.world_mut().get_mut::<OrbitInput>(controller).unwrap().x = OrbitAxis::Bound(-6.0);
    for _ in 0..5 {
        app.update();
        let pitch = state_of(&app, controller).pitch;
        assert!((-40.0..=40.0).contains(&pitch), "pitch was {pitch}");
    }
    assert_eq!(state_of(&app, controller).pitch, -40.0);
}

#[test]
fn parented_target_gets_world_rotation() {
    let mut app = test_app();
    let parent_rotation = compose_orientation(30.0, 0.0, 0.0);
    let parent = spawn_target(&mut app, parent_rotation);
    let target = app
        .world_mut()
        .spawn((Transform::default(), ChildOf(parent)))
        .id();
    // Let the parent's GlobalTransform settle before the controller shows up.
    app.update();

    let input = OrbitInput { x: OrbitAxis::Unbound, y: OrbitAxis::Bound(-2.0) };
    spawn_controller(&mut app, target, unclamped(), input);
    app.update();

    let expected = compose_orientation(30.0, 10.0, 0.0);
    let world = app.world().get::<GlobalTransform>(target).unwrap().rotation();
    assert!(world.angle_between(expected) < 1e-3, "world rotation was {world:?}");

    let local = rotation_of(&app, target);
    assert!(local.angle_between(parent_rotation.inverse() * expected) < 1e-3);
}

#[test]
fn smoothing_follows_frame_time() {
    let mut app = test_app();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let settings = OrbitSettings { smoothing: true, smoothing_factor: 5.0, ..unclamped() };
    let controller = spawn_controller(&mut app, target, settings, OrbitInput::bound(0.0, -8.0));

    app.update();
    let first = rotation_of(&app, target);
    app.world_mut().get_mut::<OrbitInput>(controller).unwrap().y = OrbitAxis::Bound(0.0);
    app.update();

    // 100 ms * 5 moves half of the remaining way towards yaw 40.
    let goal = compose_orientation(0.0, 40.0, 0.0);
    let second = rotation_of(&app, target);
    assert!(second.angle_between(first.slerp(goal, 0.5)) < 1e-3);
    assert!(second.angle_between(goal) > 1e-2);
}

#[test]
fn unresolved_owner_finishes_immediately() {
    let mut app = test_app();
    let missing = app.world_mut().spawn_empty().id();
    app.world_mut().despawn(missing);
    let controller = spawn_controller(&mut app, missing, unclamped(), OrbitInput::bound(3.0, 3.0));

    app.update();
    app.update();

    assert!(app.world().get::<OrbitTerminated>(controller).is_some());
    assert!(app.world().get::<OrbitTarget>(controller).is_none());
    assert_eq!(state_of(&app, controller), OrbitState::default());
    assert_eq!(app.world().resource::<FinishedLog>().0, vec![controller]);
}

#[test]
fn owner_without_transform_finishes() {
    let mut app = test_app();
    let controller = app
        .world_mut()
        .spawn((OrbitController::new(unclamped()), OrbitInput::bound(1.0, 1.0)))
        .id();

    app.update();

    assert!(app.world().get::<OrbitTerminated>(controller).is_some());
    assert_eq!(state_of(&app, controller), OrbitState::default());
}

#[test]
fn despawned_target_terminates_controller() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let controller = spawn_controller(&mut app, target, unclamped(), OrbitInput::bound(0.0, -1.0));
    app.update();

    app.world_mut().despawn(target);
    app.update();
    app.update();

    assert!(app.world().get::<OrbitTerminated>(controller).is_some());
    assert_eq!(state_of(&app, controller).yaw, 10.0);
    assert_eq!(app.world().resource::<FinishedLog>().0, vec![controller]);
}

#[test]
fn removing_the_controller_stops_updates() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let controller = spawn_controller(&mut app, target, unclamped(), OrbitInput::bound(0.0, -1.0));
    app.update();
    let before = rotation_of(&app, target);

    app.world_mut().entity_mut(controller).remove::<OrbitController>();
    app.update();

    assert_eq!(rotation_of(&app, target), before);
    assert_eq!(state_of(&app, controller).yaw, 5.0);
}

#[test]
fn reactivation_resets_accumulators() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    let controller = spawn_controller(&mut app, target, unclamped(), OrbitInput::bound(0.0, -1.0));
    app.update();
    app.update();
    assert_eq!(state_of(&app, controller).yaw, 10.0);

    app.world_mut().entity_mut(controller).remove::<OrbitController>();
    app.update();
    app.world_mut()
        .entity_mut(controller)
        .insert(OrbitController::targeting(target, unclamped()));
    app.update();

    assert_eq!(state_of(&app, controller).yaw, 5.0);
}

#[test]
fn last_controller_on_a_shared_target_wins() {
    let mut app = test_app();
    let target = spawn_target(&mut app, Quat::IDENTITY);
    spawn_controller(&mut app, target, unclamped(), OrbitInput::bound(0.0, -1.0));
    spawn_controller(&mut app, target, unclamped(), OrbitInput::bound(0.0, -2.0));

    app.update();

    let rotation = rotation_of(&app, target);
    assert!(
        rotation == compose_orientation(0.0, 5.0, 0.0)
            || rotation == compose_orientation(0.0, 10.0, 0.0)
    );
}
