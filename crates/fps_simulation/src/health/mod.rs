//! Health: depletable hit points для любой damageable entity
//!
//! - component: Health + чистая логика take_damage / heal / set_health
//! - events: HealthEvent broadcast, HealthCommand вход
//! - systems: активация, обработка команд, death transition

use bevy::prelude::*;

pub mod component;
pub mod events;
pub mod systems;


pub use component::{Health, HealthChange};
pub use events::{publish_health_change, HealthCommand, HealthEvent, HealthOp};
pub use systems::Dead;

use crate::SimulationSet;

/// Health Plugin
///
/// Порядок в FixedUpdate:
/// 1. announce_initial_health (Activation)
/// 2. apply_health_commands → resolve_deaths (Health)
///
/// Снаряды наносят урон напрямую в SimulationSet::Projectiles,
/// их Died события доходят до resolve_deaths в том же тике.
pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthEvent>().add_event::<HealthCommand>();

        app.add_systems(
            FixedUpdate,
            systems::announce_initial_health.in_set(SimulationSet::Activation),
        )
        .add_systems(
            FixedUpdate,
            (systems::apply_health_commands, systems::resolve_deaths)
                .chain()
                .in_set(SimulationSet::Health),
        );
    }
}
