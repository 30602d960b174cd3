//! First-person player controller
//!
//! - components: PlayerController tunables, PlayerInput, Shooter, PlayerRig
//! - spawn: явная сборка игрока (тело + camera + muzzle)
//! - systems: активация, движение, стрельба, ground correction

use bevy::prelude::*;

pub mod components;
pub mod spawn;
pub mod systems;


pub use components::*;
pub use spawn::{build_player_rig, spawn_player};

use crate::SimulationSet;

/// Player Plugin
///
/// Activation: activate_players (one-time setup).
/// Player (chain): movement → shooting → ground correction → input edges reset.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShotFired>()
            .register_type::<PlayerInput>()
            .register_type::<Shooter>();

        app.add_systems(
            FixedUpdate,
            systems::activate_players.in_set(SimulationSet::Activation),
        )
        .add_systems(
            FixedUpdate,
            (
                systems::move_players,
                systems::fire_players,
                systems::correct_ground_penetration,
                systems::clear_player_input,
            )
                .chain()
                .in_set(SimulationSet::Player),
        );
    }
}
