//! SphereProjectile: короткоживущий снаряд, бьёт Health первой цели и исчезает

use bevy::prelude::*;

pub mod components;
pub mod systems;

#[cfg(test)]
mod systems_tests;

pub use components::{ProjectileTemplate, SphereProjectile, SPENT_GRACE_DELAY};
pub use systems::spawn_projectile;

use crate::components::SoundRequested;
use crate::SimulationSet;

/// Projectile Plugin
///
/// Порядок выполнения (SimulationSet::Projectiles, после Player, поэтому снаряд,
/// выпущенный в этом тике, активируется в этом же тике):
/// 1. activate_projectiles: spawned_at + Lifetime таймер
/// 2. reschedule_projectile_lifetimes: set_life_time после активации
/// 3. expire_projectiles: per-tick проверка life_time
/// 4. handle_projectile_collisions: solid контакты
/// 5. handle_projectile_triggers: trigger overlap с Enemy
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SoundRequested>();

        app.add_systems(
            FixedUpdate,
            (
                systems::activate_projectiles,
                systems::reschedule_projectile_lifetimes,
                systems::expire_projectiles,
                systems::handle_projectile_collisions,
                systems::handle_projectile_triggers,
            )
                .chain()
                .in_set(SimulationSet::Projectiles),
        );
    }
}
