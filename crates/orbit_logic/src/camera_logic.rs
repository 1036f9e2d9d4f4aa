use bevy::camera::visibility::RenderLayers;
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::pbr::MeshMaterial3d;
use orbit_models::config::GlobalConfig;
use orbit_models::debug::{AxisFreeze, WorldInspectorState};
use orbit_models::messages::OrbitFinished;
use orbit_models::orbit::{OrbitAxis, OrbitController, OrbitInput, OrbitTarget};
use crate::OrbitSystems;

/// Host side of the demo: spawns a small scene and feeds the mouse into the orbit input slots.
pub struct CameraLogicComponent;

impl Plugin for CameraLogicComponent {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<AxisFreeze>()
            .init_resource::<WorldInspectorState>();

        app.add_systems(Startup, setup_orbit_scene);
        app.add_systems(Update,
                        (
                            handle_orbit_keys,
                            feed_mouse_input
                        )
                            .chain()
                            .before(OrbitSystems::Input));
        app.add_systems(Last, report_finished_controllers);
    }
}

/// Spawns a light, a cube to look at and a pivot with a camera child. The orbit controller
/// lives on its own entity and drives the pivot, so the camera circles the cube.
pub fn setup_orbit_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GlobalConfig>,
) {
    commands.spawn((
        PointLight {
            intensity: 1500.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    commands.spawn((
        Name::new("Focus Cube"),
        Mesh3d(meshes.add(Mesh::from(Cuboid::new(1.0, 1.0, 1.0)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.3, 0.6, 0.9),
            ..default()
        })),
        Transform::from_xyz(0.0, 0.5, 0.0),
        RenderLayers::from_layers(&[0]),
    ));

    let pivot = commands
        .spawn((
            Name::new("Orbit Pivot"),
            Transform::from_xyz(0.0, 0.5, 0.0),
            Visibility::default(),
        ))
        .with_children(|pivot| {
            pivot.spawn((
                Camera3d::default(),
                Transform::from_xyz(0.0, 0.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
                Camera {
                    order: 0,
                    ..default()
                },
                RenderLayers::from_layers(&[0]),
            ));
        })
        .id();

    commands.spawn((
        Name::new("Orbit Controller"),
        OrbitController::targeting(pivot, config.orbit_config.clone()),
        OrbitInput::bound(0.0, 0.0),
    ));
}

/// Toggles the inspector, the axis freezes and smoothing from the configured keys.
///
/// # Parameters
/// * `keys` - Keyboard state.
/// * `config` - Source of the key bindings.
/// * `freeze` - Which channels the mouse feed leaves unbound.
/// * `inspector` - Visibility of the world inspector.
/// * `controllers` - Every controller, smoothing is flipped on all of them.
pub fn handle_orbit_keys(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<GlobalConfig>,
    mut freeze: ResMut<AxisFreeze>,
    mut inspector: ResMut<WorldInspectorState>,
    mut controllers: Query<&mut OrbitController>,
) {
    let input = &config.input_config;

    if keys.just_pressed(input.get_inspector_key()) {
        inspector.0 = !inspector.0;
    }

    if keys.just_pressed(input.get_freeze_x_key()) {
        freeze.x = !freeze.x;
        info!("Orbit input X {}", if freeze.x { "unbound" } else { "bound" });
    }

    if keys.just_pressed(input.get_freeze_y_key()) {
        freeze.y = !freeze.y;
        info!("Orbit input Y {}", if freeze.y { "unbound" } else { "bound" });
    }

    if keys.just_pressed(input.get_toggle_smoothing_key()) {
        for mut controller in controllers.iter_mut() {
            controller.settings.smoothing = !controller.settings.smoothing;
            info!("Orbit smoothing {}", controller.settings.smoothing);
        }
    }
}

/// Sums this frame's mouse motion and writes it into the input slots of every active
/// controller. Motion only counts while the left button is held.
///
/// Vertical motion feeds channel X (pitch), horizontal motion feeds channel Y (yaw).
pub fn feed_mouse_input(
    mut motion_events: MessageReader<MouseMotion>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    freeze: Res<AxisFreeze>,
    config: Res<GlobalConfig>,
    mut inputs: Query<&mut OrbitInput, With<OrbitTarget>>,
) {
    let mut motion_delta = Vec2::ZERO;
    for event in motion_events.read() {
        motion_delta += event.delta;
    }

    if !mouse_buttons.pressed(MouseButton::Left) {
        motion_delta = Vec2::ZERO;
    }
    let delta = motion_delta * config.input_config.mouse_scale;

    for mut input in inputs.iter_mut() {
        input.x = if freeze.x { OrbitAxis::Unbound } else { OrbitAxis::Bound(delta.y) };
        input.y = if freeze.y { OrbitAxis::Unbound } else { OrbitAxis::Bound(delta.x) };
    }
}

fn report_finished_controllers(mut finished: MessageReader<OrbitFinished>) {
    for message in finished.read() {
        info!("Orbit controller {:?} finished: {}", message.controller, message.reason);
    }
}
