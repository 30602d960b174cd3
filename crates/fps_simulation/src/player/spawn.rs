//! Явная сборка игрока: тело + capsule collider + camera + muzzle

use bevy::prelude::*;
use bevy_rapier3d::prelude::RigidBody;

use super::components::{Muzzle, PlayerCamera, PlayerController, PlayerRig, CAMERA_OFFSET, MUZZLE_OFFSET};
use crate::physics::CharacterCapsule;

/// Спавнит камеру (ребёнок игрока) и muzzle (ребёнок камеры), вешает PlayerRig
pub fn build_player_rig(commands: &mut Commands, player: Entity) -> PlayerRig {
    let camera = commands
        .spawn((
            PlayerCamera,
            Transform::from_translation(CAMERA_OFFSET),
            ChildOf(player),
        ))
        .id();

    let muzzle = commands
        .spawn((
            Muzzle,
            Transform::from_translation(MUZZLE_OFFSET),
            ChildOf(camera),
        ))
        .id();

    let rig = PlayerRig { camera, muzzle };
    commands.entity(player).insert(rig);
    rig
}

/// Спавн игрока со всем обвесом
///
/// activate_players увидит готовый PlayerRig и коллайдер и ничего не досоздаст.
pub fn spawn_player(commands: &mut Commands, position: Vec3, controller: PlayerController) -> Entity {
    let capsule = CharacterCapsule::default();

    let player = commands
        .spawn((
            controller,
            capsule,
            Transform::from_translation(position),
            RigidBody::KinematicPositionBased,
            capsule.collider(),
        ))
        .id();

    build_player_rig(commands, player);

    crate::logger::log_info(&format!("🧍 Player {:?} spawned at {:?}", player, position));

    player
}
