//! SphereProjectile systems: активация, lifetime, контакты.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ActiveEvents, ColliderDisabled, RigidBody, Velocity};
use std::time::Duration;

use super::components::{ProjectileTemplate, SphereProjectile, SPENT_GRACE_DELAY};
use crate::components::{
    spawn_effect, Enemy, Player, SoundRequested, Visual, HIT_EFFECT_LIFETIME,
};
use crate::despawn::{DespawnQueue, DespawnTimer};
use crate::health::{publish_health_change, Health, HealthEvent};
use crate::physics::{CollisionEntered, TriggerEntered};

/// Спавн снаряда по шаблону с начальной скоростью
///
/// Снаряд сразу принадлежит миру: вызывающий получает Entity только для
/// логов / дополнительных таймеров и дальше его не хранит.
pub fn spawn_projectile(
    commands: &mut Commands,
    template: &ProjectileTemplate,
    transform: Transform,
    velocity: Vec3,
    damage: f32,
    life_time: f32,
) -> Entity {
    commands
        .spawn((
            template.instantiate(damage, life_time),
            transform,
            RigidBody::Dynamic,
            template.collider(),
            Velocity::linear(velocity),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

/// Spend: render + collider off сразу, деспавн через grace delay
///
/// Повторный вызов для того же снаряда ничего не делает.
fn spend(
    commands: &mut Commands,
    queue: &mut DespawnQueue,
    entity: Entity,
    projectile: &mut SphereProjectile,
    visual: Option<Mut<Visual>>,
    now: Duration,
) {
    if !projectile.mark_spent() {
        return;
    }

    if let Some(mut visual) = visual {
        visual.visible = false;
    }
    if let Ok(mut entity_commands) = commands.get_entity(entity) {
        entity_commands.insert(ColliderDisabled);
    }
    queue.schedule_after(entity, DespawnTimer::Grace, now, SPENT_GRACE_DELAY);

    crate::logger::log(&format!("🔻 Projectile {:?} spent", entity));
}

/// Урон цели, если у неё есть Health
fn strike(
    projectile_entity: Entity,
    damage: f32,
    target: Entity,
    targets: &mut Query<&mut Health>,
    health_events: &mut EventWriter<HealthEvent>,
) {
    let Ok(mut health) = targets.get_mut(target) else {
        return;
    };

    if let Some(change) = health.take_damage(damage) {
        crate::logger::log(&format!(
            "💥 Projectile {:?} hit {:?} for {} damage (HP → {})",
            projectile_entity, target, damage, change.health
        ));
        publish_health_change(health_events, target, change, Some(projectile_entity));
    }
}

/// Система: активация новых снарядов
///
/// spawned_at = now + безусловный деспавн через life_time.
pub fn activate_projectiles(
    mut projectiles: Query<(Entity, &mut SphereProjectile), Added<SphereProjectile>>,
    mut queue: ResMut<DespawnQueue>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed();

    for (entity, mut projectile) in projectiles.iter_mut() {
        projectile.activate(now);
        queue.reschedule_after(entity, DespawnTimer::Lifetime, now, projectile.life_time());
    }
}

/// Система: set_life_time после активации → переназначить безусловный деспавн
pub fn reschedule_projectile_lifetimes(
    mut projectiles: Query<(Entity, &mut SphereProjectile), Changed<SphereProjectile>>,
    mut queue: ResMut<DespawnQueue>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed();

    for (entity, mut projectile) in projectiles.iter_mut() {
        if !projectile.lifetime_dirty() || projectile.is_spent() {
            continue;
        }
        projectile.take_lifetime_dirty();

        queue.reschedule_after(entity, DespawnTimer::Lifetime, now, projectile.life_time());
    }
}

/// Система: per-tick проверка life_time
///
/// Дублирует безусловный Lifetime таймер: какой сработает первым, тот и удалит.
pub fn expire_projectiles(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut SphereProjectile, Option<&mut Visual>)>,
    mut queue: ResMut<DespawnQueue>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed();

    for (entity, mut projectile, visual) in projectiles.iter_mut() {
        if projectile.is_spent() || !projectile.is_expired(now) {
            continue;
        }
        spend(&mut commands, &mut queue, entity, &mut projectile, visual, now);
    }
}

/// Система: solid столкновения снарядов
///
/// - other с тегом Player → игнор (ни урона, ни spend)
/// - Health у other → take_damage(damage) ровно один раз
/// - hit effect в точке контакта (2s), hit sound
/// - destroy_on_hit → spend
#[allow(clippy::too_many_arguments)]
pub fn handle_projectile_collisions(
    mut commands: Commands,
    mut contacts: EventReader<CollisionEntered>,
    mut projectiles: Query<(&mut SphereProjectile, Option<&mut Visual>)>,
    mut targets: Query<&mut Health>,
    players: Query<(), With<Player>>,
    mut queue: ResMut<DespawnQueue>,
    mut health_events: EventWriter<HealthEvent>,
    mut sounds: EventWriter<SoundRequested>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed();

    for contact in contacts.read() {
        let Ok((mut projectile, visual)) = projectiles.get_mut(contact.entity) else {
            continue;
        };

        if projectile.is_spent() || players.contains(contact.other) {
            continue;
        }

        strike(
            contact.entity,
            projectile.damage(),
            contact.other,
            &mut targets,
            &mut health_events,
        );

        if let Some(template) = &projectile.hit_effect {
            spawn_effect(
                &mut commands,
                &mut queue,
                template,
                Transform::from_translation(contact.point),
                now,
                HIT_EFFECT_LIFETIME,
            );
        }

        if let Some(clip) = &projectile.hit_sound {
            sounds.write(SoundRequested {
                emitter: contact.entity,
                clip: clip.clone(),
                position: contact.point,
            });
        }

        if projectile.destroy_on_hit {
            spend(&mut commands, &mut queue, contact.entity, &mut projectile, visual, now);
        }
    }
}

/// Система: trigger overlap снаряда с Enemy
///
/// Параллельный путь урона для trigger-based врагов: без эффектов и звука.
pub fn handle_projectile_triggers(
    mut commands: Commands,
    mut overlaps: EventReader<TriggerEntered>,
    mut projectiles: Query<(&mut SphereProjectile, Option<&mut Visual>)>,
    mut targets: Query<&mut Health>,
    enemies: Query<(), With<Enemy>>,
    mut queue: ResMut<DespawnQueue>,
    mut health_events: EventWriter<HealthEvent>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed();

    for overlap in overlaps.read() {
        let Ok((mut projectile, visual)) = projectiles.get_mut(overlap.entity) else {
            continue;
        };

        if projectile.is_spent() || !enemies.contains(overlap.other) {
            continue;
        }

        strike(
            overlap.entity,
            projectile.damage(),
            overlap.other,
            &mut targets,
            &mut health_events,
        );

        if projectile.destroy_on_hit {
            spend(&mut commands, &mut queue, overlap.entity, &mut projectile, visual, now);
        }
    }
}
