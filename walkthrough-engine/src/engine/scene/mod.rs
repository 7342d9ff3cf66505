//! The two render contexts and everything placed in them.
//!
//! Every top-level entity of a scene carries its scene marker, so tearing a
//! scene down is one despawn over the marker.

/// Exhibit room description and its validated layout.
pub mod catalogue;

/// Timed visual effects: floating objects and click/emphasis pulses.
pub mod effects;

/// Exhibit room construction and certificate screen.
pub mod exhibit;

/// Street and living room with the avatar.
pub mod primary;

use bevy::prelude::*;

use catalogue::ExhibitCatalogue;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PrimaryScene;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ExhibitScene;

/// Catalogue handle, loaded with the primary scene so the hand-off never waits.
#[derive(Resource, Default)]
pub struct CatalogueLoader {
    pub handle: Handle<ExhibitCatalogue>,
}

pub fn despawn_scene<M: Component>(commands: &mut Commands, roots: &Query<Entity, With<M>>) {
    for entity in roots {
        commands.entity(entity).despawn();
    }
}
