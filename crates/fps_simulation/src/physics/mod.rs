//! Physics слой симуляции
//!
//! - capsule: CharacterCapsule volume + kinematic motor (своя интеграция)
//! - ground: ray casts вниз по Ground коллайдерам (форма из Rapier)
//! - contacts: CollisionEntered / TriggerEntered + bridge из Rapier events
//!
//! Physics solver (Rapier pipeline) остаётся на стороне host'а. Здесь только то, что
//! gameplay читает синхронно внутри тика.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

pub mod capsule;
pub mod contacts;
pub mod ground;

pub use capsule::{CharacterCapsule, CharacterMotion};
pub use contacts::{forward_rapier_contacts, CollisionEntered, TriggerEntered};
pub use ground::GroundProbe;

use crate::SimulationSet;

/// Contacts Plugin
///
/// Регистрирует contact events и bridge из Rapier.
/// `add_event::<CollisionEvent>` идемпотентен, так что RapierPhysicsPlugin
/// на стороне host'а может быть добавлен до или после.
pub struct ContactsPlugin;

impl Plugin for ContactsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>()
            .add_event::<CollisionEntered>()
            .add_event::<TriggerEntered>()
            .register_type::<CharacterCapsule>()
            .register_type::<CharacterMotion>();

        app.add_systems(
            FixedUpdate,
            forward_rapier_contacts.in_set(SimulationSet::Contacts),
        );
    }
}
