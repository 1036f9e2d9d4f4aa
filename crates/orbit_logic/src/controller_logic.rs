use bevy::prelude::*;
use bevy::transform::TransformSystems;
use orbit_models::error::TargetUnresolved;
use orbit_models::messages::OrbitFinished;
use orbit_models::orbit::{
    OrbitController, OrbitInput, OrbitOwner, OrbitState, OrbitTarget, OrbitTerminated,
};

/// Ordered stages of a controller inside one frame.
///
/// `Activate` runs in `PreUpdate`, `Input` in `Update` and `Apply` in `PostUpdate` ahead of
/// transform propagation. Hosts that feed [`OrbitInput`] should run `.before(OrbitSystems::Input)`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrbitSystems {
    Activate,
    Input,
    Apply,
}

pub struct ControllerLogicComponent;

impl Plugin for ControllerLogicComponent {
    fn build(&self, app: &mut App) {
        app.add_message::<OrbitFinished>();

        app.add_systems(PreUpdate, activate_orbit_controllers.in_set(OrbitSystems::Activate));
        app.add_systems(Update, accumulate_orbit_input.in_set(OrbitSystems::Input));
        app.add_systems(
            PostUpdate,
            apply_orbit
                .in_set(OrbitSystems::Apply)
                .before(TransformSystems::Propagate),
        );
    }
}

/// Resolves the entity an [`OrbitController`] should rotate.
///
/// The owner resolves when the referenced entity exists and carries a `Transform`.
///
/// # Parameters
/// * `controller` - Entity holding the controller, used for [`OrbitOwner::Owner`].
/// * `owner` - The configured owner reference.
/// * `transforms` - Every entity that can be rotated.
pub fn resolve_target(
    controller: Entity,
    owner: OrbitOwner,
    transforms: &Query<(), With<Transform>>,
) -> Result<Entity, TargetUnresolved> {
    let target = match owner {
        OrbitOwner::Owner => controller,
        OrbitOwner::Specified(target) => target,
    };

    if transforms.contains(target) {
        Ok(target)
    } else {
        Err(TargetUnresolved { controller })
    }
}

/// Activates every freshly added (or re-added) controller: resets its accumulators and
/// caches the resolved target. Controllers without a target finish right away.
fn activate_orbit_controllers(
    mut commands: Commands,
    mut controllers: Query<(Entity, &OrbitController, &mut OrbitState), Added<OrbitController>>,
    transforms: Query<(), With<Transform>>,
    mut finished: MessageWriter<OrbitFinished>,
) {
    for (entity, controller, mut state) in controllers.iter_mut() {
        *state = OrbitState::default();

        match resolve_target(entity, controller.owner, &transforms) {
            Ok(target) => {
                info!("Orbit controller {entity:?} activated, driving {target:?}");
                commands
                    .entity(entity)
                    .insert(OrbitTarget(target))
                    .remove::<OrbitTerminated>();
            }
            Err(reason) => terminate(&mut commands, &mut finished, reason),
        }
    }
}

/// Input stage: folds the current input slots into the accumulated angles.
fn accumulate_orbit_input(
    mut controllers: Query<
        (&OrbitController, &OrbitInput, &mut OrbitState),
        (With<OrbitTarget>, Without<OrbitTerminated>),
    >,
) {
    for (controller, input, mut state) in controllers.iter_mut() {
        state.accumulate(&controller.settings, input);
    }
}

/// Apply stage: writes the composed (and optionally smoothed) rotation to each target.
///
/// The rotation is handled in world space. For a child entity the world rotation is its local
/// rotation under the parent's `GlobalTransform`, and the result is written back as local.
/// Runs after every input stage of the frame, so it always sees the final accumulators.
/// When several controllers drive the same target the last one wins.
fn apply_orbit(
    time: Res<Time>,
    mut commands: Commands,
    controllers: Query<
        (Entity, &OrbitController, &OrbitInput, &OrbitState, &OrbitTarget),
        Without<OrbitTerminated>,
    >,
    mut transforms: Query<(&mut Transform, Option<&ChildOf>)>,
    parents: Query<&GlobalTransform>,
    mut finished: MessageWriter<OrbitFinished>,
) {
    let delta_secs = time.delta_secs();

    for (entity, controller, input, state, target) in controllers.iter() {
        let Ok((mut transform, child_of)) = transforms.get_mut(target.0) else {
            // The target outlived its contract, nothing left to drive.
            terminate(&mut commands, &mut finished, TargetUnresolved { controller: entity });
            continue;
        };

        let parent_rotation = child_of
            .and_then(|child_of| parents.get(child_of.parent()).ok())
            .map_or(Quat::IDENTITY, |parent| parent.rotation());

        let world = parent_rotation * transform.rotation;
        let world = state.orientation(&controller.settings, input, world, delta_secs);
        transform.rotation = parent_rotation.inverse() * world;
    }
}

fn terminate(
    commands: &mut Commands,
    finished: &mut MessageWriter<OrbitFinished>,
    reason: TargetUnresolved,
) {
    warn!("{reason}, finishing");
    commands
        .entity(reason.controller)
        .remove::<OrbitTarget>()
        .insert(OrbitTerminated);
    finished.write(OrbitFinished { controller: reason.controller, reason });
}
