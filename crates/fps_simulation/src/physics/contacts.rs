//! Contact events (host physics → gameplay)
//!
//! Gameplay системы читают только `CollisionEntered` / `TriggerEntered`.
//! Источник: либо bridge из Rapier `CollisionEvent`, либо любой другой host
//! (тесты, scripted headless host), пишущий эти события напрямую.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

/// Event: новый solid контакт, адресован `entity`
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CollisionEntered {
    /// Получатель callback'а
    pub entity: Entity,
    /// С кем столкнулись
    pub other: Entity,
    /// Точка контакта (world space)
    pub point: Vec3,
}

/// Event: `entity` вошла в trigger volume (или trigger вошёл в неё)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TriggerEntered {
    pub entity: Entity,
    pub other: Entity,
}

/// Система: Rapier `CollisionEvent::Started` → наши события для обоих участников
///
/// SENSOR flag → trigger overlap, иначе solid collision.
/// Rapier не кладёт точку контакта в CollisionEvent, берём середину между
/// origin'ами участников (или origin того, у кого есть Transform).
pub fn forward_rapier_contacts(
    mut rapier_events: EventReader<CollisionEvent>,
    transforms: Query<&Transform>,
    mut collisions: EventWriter<CollisionEntered>,
    mut triggers: EventWriter<TriggerEntered>,
) {
    for event in rapier_events.read() {
        let CollisionEvent::Started(a, b, flags) = event else {
            continue;
        };

        if flags.contains(CollisionEventFlags::SENSOR) {
            triggers.write(TriggerEntered { entity: *a, other: *b });
            triggers.write(TriggerEntered { entity: *b, other: *a });
            continue;
        }

        let point = match (transforms.get(*a), transforms.get(*b)) {
            (Ok(ta), Ok(tb)) => ta.translation.lerp(tb.translation, 0.5),
            (Ok(t), Err(_)) | (Err(_), Ok(t)) => t.translation,
            (Err(_), Err(_)) => Vec3::ZERO,
        };

        collisions.write(CollisionEntered { entity: *a, other: *b, point });
        collisions.write(CollisionEntered { entity: *b, other: *a, point });
    }
}
