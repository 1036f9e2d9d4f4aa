pub mod camera_logic;
mod controller_logic;

use bevy::prelude::*;
use orbit_models::OrbitCorePlugin;
use crate::controller_logic::ControllerLogicComponent;

pub use crate::controller_logic::{resolve_target, OrbitSystems};

/// Drives every `OrbitController` in the world: activation in `PreUpdate`, input in `Update`
/// and apply in `PostUpdate`. Works headless, nothing here needs a window or renderer.
pub struct OrbitLogicPlugin;

impl Plugin for OrbitLogicPlugin {

    fn build(&self, app: &mut App) {
        app.add_plugins((OrbitCorePlugin, ControllerLogicComponent));
    }
}
