//! Health systems: активация, внешние команды, смерть.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, RigidBody, Velocity};

use super::component::Health;
use super::events::{publish_health_change, HealthCommand, HealthEvent, HealthOp};
use crate::components::{spawn_effect, Visual, DEATH_EFFECT_LIFETIME};
use crate::despawn::DespawnQueue;
use crate::physics::CharacterCapsule;

/// Компонент-маркер: entity мертва, но осталась в мире (destroy_on_death = false)
#[derive(Component, Debug)]
pub struct Dead;

/// Система: стартовое уведомление Changed для только что добавленного Health
pub fn announce_initial_health(
    query: Query<(Entity, &Health), Added<Health>>,
    mut events: EventWriter<HealthEvent>,
) {
    for (entity, health) in query.iter() {
        events.write(HealthEvent::Changed {
            entity,
            health: health.current(),
        });
    }
}

/// Система: применение HealthCommand событий по порядку
pub fn apply_health_commands(
    mut commands_in: EventReader<HealthCommand>,
    mut targets: Query<&mut Health>,
    mut events: EventWriter<HealthEvent>,
) {
    for command in commands_in.read() {
        let Ok(mut health) = targets.get_mut(command.target) else {
            continue;
        };

        let change = match command.op {
            HealthOp::Damage(amount) => health.take_damage(amount),
            HealthOp::Heal(amount) => health.heal(amount),
            HealthOp::Set(value) => health.set_health(value),
        };

        if let Some(change) = change {
            publish_health_change(&mut events, command.target, change, command.source);
        }
    }
}

/// Система: death transition
///
/// 1. Эффект смерти в позиции/ориентации entity (автоочистка 3s)
/// 2. destroy_on_death → деспавн
/// 3. иначе → collider off, rigid body kinematic, render off, маркер Dead
pub fn resolve_deaths(
    mut commands: Commands,
    mut events: EventReader<HealthEvent>,
    mut queue: ResMut<DespawnQueue>,
    time: Res<Time<Fixed>>,
    mut query: Query<(
        &Health,
        Option<&Transform>,
        Option<&mut Visual>,
        Option<&mut RigidBody>,
        Option<&mut Velocity>,
        Option<&mut CharacterCapsule>,
    )>,
) {
    let now = time.elapsed();

    for event in events.read() {
        let HealthEvent::Died { entity, killer } = event else {
            continue;
        };

        let Ok((health, transform, visual, rigid_body, velocity, capsule)) = query.get_mut(*entity)
        else {
            continue;
        };

        if let Some(template) = &health.death_effect {
            let at = transform.copied().unwrap_or_default();
            spawn_effect(
                &mut commands,
                &mut queue,
                template,
                Transform::from_translation(at.translation).with_rotation(at.rotation),
                now,
                DEATH_EFFECT_LIFETIME,
            );
        }

        crate::logger::log_info(&format!("💀 Entity {:?} died (killer: {:?})", entity, killer));

        if health.destroy_on_death {
            queue.forget(*entity);
            if let Ok(mut entity_commands) = commands.get_entity(*entity) {
                entity_commands.despawn();
            }
            continue;
        }

        if let Some(mut visual) = visual {
            visual.visible = false;
        }
        if let Some(mut rigid_body) = rigid_body {
            *rigid_body = RigidBody::KinematicPositionBased;
        }
        if let Some(mut velocity) = velocity {
            *velocity = Velocity::zero();
        }
        if let Some(mut capsule) = capsule {
            capsule.enabled = false;
        }
        if let Ok(mut entity_commands) = commands.get_entity(*entity) {
            entity_commands.insert((ColliderDisabled, Dead));
        }
    }
}
