use bevy::prelude::*;
use crate::error::TargetUnresolved;

/// Written once when a controller finishes because its target could not be resolved,
/// either on activation or because the cached target disappeared.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbitFinished {
    pub controller: Entity,
    pub reason: TargetUnresolved,
}
