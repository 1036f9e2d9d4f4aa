use bevy::prelude::*;

/// Represents the state of the World Inspector UI.
///
/// This resource holds a single boolean value indicating whether the World Inspector UI
/// is currently visible or hidden. It is toggled by the inspector key of the input config
/// and starts hidden.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldInspectorState(pub bool);

/// Which input channels the demo host leaves unbound.
///
/// A frozen channel is written as `OrbitAxis::Unbound`, so the paired orientation axis keeps
/// whatever the transform already has.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisFreeze {
    pub x: bool,
    pub y: bool,
}
