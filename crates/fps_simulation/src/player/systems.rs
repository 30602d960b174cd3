//! Player systems: активация, движение, стрельба, ground correction.
//!
//! Порядок в тике (chain): move_players → fire_players →
//! correct_ground_penetration → clear_player_input.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody};

use super::components::{
    Muzzle, PlayerCamera, PlayerController, PlayerInput, PlayerRig, Shooter, ShotFired,
    GROUND_RAY_LIFT, GROUND_RAY_RANGE, GROUND_STICK_VELOCITY, PENETRATION_MARGIN, SETUP_NUDGE,
};
use super::spawn::build_player_rig;
use crate::despawn::{DespawnQueue, DespawnTimer};
use crate::physics::{CharacterCapsule, CharacterMotion, GroundProbe};
use crate::projectile::spawn_projectile;

/// Система: one-time setup нового игрока (идемпотентно)
///
/// - нет коллайдера → capsule collider + kinematic body
/// - капсула уже касается земли → подъём на SETUP_NUDGE
/// - нет валидного PlayerRig → camera + muzzle
pub fn activate_players(
    mut commands: Commands,
    mut players: Query<
        (Entity, &CharacterCapsule, &mut Transform, Option<&PlayerRig>, Has<Collider>),
        Added<PlayerController>,
    >,
    cameras: Query<(), With<PlayerCamera>>,
    muzzles: Query<(), With<Muzzle>>,
    probe: GroundProbe,
) {
    for (entity, capsule, mut transform, rig, has_collider) in players.iter_mut() {
        if !has_collider {
            commands
                .entity(entity)
                .insert((capsule.collider(), RigidBody::KinematicPositionBased));
        }

        let ground = probe.ground_height(
            capsule.world_center(transform.translation),
            capsule.height / 2.0 + capsule.skin_width,
        );
        if capsule.touches_ground(transform.translation, ground) {
            transform.translation.y += SETUP_NUDGE;
        }

        let rig_valid =
            rig.is_some_and(|rig| cameras.contains(rig.camera) && muzzles.contains(rig.muzzle));
        if !rig_valid {
            build_player_rig(&mut commands, entity);
        }

        crate::logger::log(&format!(
            "Player {:?} activated at {:?} (rig rebuilt: {})",
            entity, transform.translation, !rig_valid
        ));
    }
}

/// Система: WASD + прыжок + гравитация + yaw
///
/// Горизонталь: в локальном базисе игрока (right / forward), вертикаль
/// через capsule motor, который останавливается на земле и даёт grounded.
pub fn move_players(
    mut players: Query<(
        &PlayerController,
        &CharacterCapsule,
        &mut CharacterMotion,
        &PlayerInput,
        &mut Transform,
    )>,
    probe: GroundProbe,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, capsule, mut motion, input, mut transform) in players.iter_mut() {
        if !capsule.enabled {
            continue;
        }

        let grounded = motion.grounded;
        if grounded && motion.vertical_velocity < 0.0 {
            motion.vertical_velocity = GROUND_STICK_VELOCITY;
        }

        let planar = transform.right() * input.axes.x + transform.forward() * input.axes.y;
        capsule.move_planar(&mut transform.translation, planar * controller.move_speed * delta);

        if input.jump && grounded {
            motion.vertical_velocity = controller.jump_velocity();
        }

        motion.vertical_velocity += controller.gravity * delta;
        let dy = motion.vertical_velocity * delta;

        let ground = probe.ground_height(
            capsule.world_center(transform.translation),
            capsule.height / 2.0 + dy.abs() + capsule.skin_width,
        );
        motion.grounded = capsule.move_vertical(&mut transform.translation, dy, ground);

        if input.look_x != 0.0 {
            // Положительный look → поворот вправо (по часовой сверху)
            transform.rotate_y(-(input.look_x * controller.look_sensitivity).to_radians());
        }
    }
}

/// Система: выстрел по fire edge с cooldown
///
/// Снаряд спавнится в мировой позиции muzzle (player * camera * muzzle),
/// летит по его forward. Стрелок дополнительно ставит страховочный деспавн.
pub fn fire_players(
    mut commands: Commands,
    mut players: Query<(Entity, &PlayerController, &mut Shooter, &PlayerInput, &Transform, Option<&PlayerRig>)>,
    rig_parts: Query<&Transform, Without<PlayerController>>,
    mut queue: ResMut<DespawnQueue>,
    mut shots: EventWriter<ShotFired>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, controller, mut shooter, input, transform, rig) in players.iter_mut() {
        if !input.fire || !shooter.ready(now, controller.shoot_cooldown) {
            continue;
        }
        shooter.last_shot_at = now;

        let muzzle = rig.and_then(|rig| {
            let camera = rig_parts.get(rig.camera).ok()?;
            let muzzle = rig_parts.get(rig.muzzle).ok()?;
            Some(transform.mul_transform(*camera).mul_transform(*muzzle))
        });

        let (Some(template), Some(muzzle)) = (&controller.projectile, muzzle) else {
            crate::logger::log(&format!("Player {:?} fired with nothing to spawn", entity));
            continue;
        };

        let direction = muzzle.forward().as_vec3();
        let projectile = spawn_projectile(
            &mut commands,
            template,
            Transform::from_translation(muzzle.translation).with_rotation(muzzle.rotation),
            direction * controller.shoot_force,
            controller.projectile_damage,
            controller.projectile_lifetime,
        );

        queue.schedule_after(
            projectile,
            DespawnTimer::SafetyNet,
            time.elapsed(),
            controller.safety_cleanup_delay,
        );

        shots.write(ShotFired {
            shooter: entity,
            projectile,
            origin: muzzle.translation,
            direction,
        });

        crate::logger::log(&format!(
            "🔫 Player {:?} fired {:?} from {:?} dir {:?}",
            entity, projectile, muzzle.translation, direction
        ));
    }
}

/// Система: вытащить капсулу из-под земли
///
/// Луч вниз от origin + GROUND_RAY_LIFT; если нижняя точка капсулы ниже
/// точки попадания: подъём на глубину + PENETRATION_MARGIN.
pub fn correct_ground_penetration(
    mut players: Query<(Entity, &CharacterCapsule, &mut Transform), With<PlayerController>>,
    probe: GroundProbe,
) {
    for (entity, capsule, mut transform) in players.iter_mut() {
        if !capsule.enabled {
            continue;
        }

        let origin = transform.translation + Vec3::Y * GROUND_RAY_LIFT;
        let Some(ground) = probe.ground_height(origin, GROUND_RAY_RANGE) else {
            continue;
        };

        if let Some(lift) = capsule.penetration_correction(transform.translation, ground, PENETRATION_MARGIN) {
            transform.translation.y += lift;
            crate::logger::log(&format!(
                "⚠️ Player {:?} was under ground, lifted by {:.3}",
                entity, lift
            ));
        }
    }
}

/// Система: сброс input edges в конце тика
pub fn clear_player_input(mut inputs: Query<&mut PlayerInput>) {
    for mut input in inputs.iter_mut() {
        if input.jump || input.fire || input.look_x != 0.0 {
            input.clear_edges();
        }
    }
}
