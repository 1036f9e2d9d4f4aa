pub mod config;
pub mod debug;
pub mod error;
pub mod key_utils;
pub mod messages;
pub mod orbit;

use bevy::prelude::*;
use crate::orbit::{OrbitController, OrbitInput, OrbitState, OrbitTarget, OrbitTerminated};

/// Registers all orbit types for reflection so they show up in the world inspector.
/// This Plugin is registered at `ManagerPlugin` which is a part of the main.rs file.
pub struct OrbitCorePlugin;

impl Plugin for OrbitCorePlugin {

    fn build(&self, app: &mut App) {
        app.register_type::<OrbitController>()
            .register_type::<OrbitInput>()
            .register_type::<OrbitState>()
            .register_type::<OrbitTarget>()
            .register_type::<OrbitTerminated>();
    }

}
