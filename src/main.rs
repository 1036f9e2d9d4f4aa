use std::fs::{create_dir_all, File};
use std::path::PathBuf;
use std::sync::Mutex;
use bevy::log::{BoxedLayer, LogPlugin};
use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, WindowMode, WindowResolution};
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use chrono::Local;
use orbit_logic::camera_logic::CameraLogicComponent;
use orbit_logic::OrbitLogicPlugin;
use orbit_models::config::GlobalConfig;
use orbit_models::debug::WorldInspectorState;
use tracing_subscriber::Layer;

/// Environment variable for the folder the log files are written to.
const LOG_DIR_ENV: &str = "ORBIT_LOG_DIR";

fn main() {
    // A missing .env file is fine, everything has a default.
    let _ = dotenvy::dotenv();

    let config_dir = GlobalConfig::config_dir();
    let global_config = GlobalConfig::from_dir(&config_dir);
    if let Err(err) = global_config.write_missing(&config_dir) {
        eprintln!("Could not write default config to '{}': {err}", config_dir.display());
    }

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(window_plugin(&global_config))
                .set(LogPlugin {
                    custom_layer: file_log_layer,
                    ..default()
                }),
        )
        .insert_resource(global_config)
        .add_plugins(ManagerPlugin)
        .run();
}

/// Collects every plugin of the application.
struct ManagerPlugin;

impl Plugin for ManagerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((OrbitLogicPlugin, CameraLogicComponent));
        app.add_plugins(EguiPlugin::default());
        app.add_plugins(WorldInspectorPlugin::new().run_if(inspector_visible));
    }
}

fn inspector_visible(state: Res<WorldInspectorState>) -> bool {
    state.0
}

/// Builds the primary window from the graphics config.
fn window_plugin(config: &GlobalConfig) -> WindowPlugin {
    let graphics = &config.graphics_config;

    WindowPlugin {
        primary_window: Some(Window {
            title: String::from("Camera Orbit"),
            resolution: WindowResolution::new(
                graphics.get_window_width(),
                graphics.get_window_height(),
            ),
            mode: if graphics.fullscreen {
                WindowMode::BorderlessFullscreen(MonitorSelection::Primary)
            } else {
                WindowMode::Windowed
            },
            present_mode: if graphics.vsync {
                PresentMode::AutoVsync
            } else {
                PresentMode::AutoNoVsync
            },
            ..default()
        }),
        ..default()
    }
}

/// Writes every log line additionally into `logs/camera-orbit_<timestamp>.log`.
/// Returns `None` (console only) when the file cannot be created.
fn file_log_layer(_app: &mut App) -> Option<BoxedLayer> {
    let dir = std::env::var(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("logs"));
    create_dir_all(&dir).ok()?;

    let file_name = format!("camera-orbit_{}.log", Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let file = File::create(dir.join(file_name)).ok()?;

    Some(
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .boxed(),
    )
}
