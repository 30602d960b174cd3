//! Health notifications и внешние команды

use bevy::prelude::*;

use super::component::HealthChange;

/// Broadcast: изменения Health
///
/// Один поток событий на все три вида уведомлений, поэтому любой reader
/// видит их в порядке возникновения: Changed → Damaged → Died.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum HealthEvent {
    /// Новое значение current (в т.ч. стартовое при активации)
    Changed { entity: Entity, health: f32 },
    /// Урон применён
    Damaged {
        entity: Entity,
        amount: f32,
        source: Option<Entity>,
    },
    /// Entity умерла (ровно один раз за жизнь)
    Died {
        entity: Entity,
        killer: Option<Entity>,
    },
}

impl HealthEvent {
    pub fn entity(&self) -> Entity {
        match self {
            HealthEvent::Changed { entity, .. }
            | HealthEvent::Damaged { entity, .. }
            | HealthEvent::Died { entity, .. } => *entity,
        }
    }
}

/// Пишет уведомления для одной мутации Health
pub fn publish_health_change(
    events: &mut EventWriter<HealthEvent>,
    entity: Entity,
    change: HealthChange,
    source: Option<Entity>,
) {
    events.write(HealthEvent::Changed {
        entity,
        health: change.health,
    });

    if let Some(amount) = change.damage {
        events.write(HealthEvent::Damaged {
            entity,
            amount,
            source,
        });
    }

    if change.died {
        events.write(HealthEvent::Died {
            entity,
            killer: source,
        });
    }
}

/// Операция над Health
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthOp {
    Damage(f32),
    Heal(f32),
    Set(f32),
}

/// Event: внешний запрос на изменение Health
///
/// Для систем, которые не держат `Query<&mut Health>` сами.
/// Неизвестный target / entity без Health: тихий no-op.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealthCommand {
    pub target: Entity,
    pub op: HealthOp,
    pub source: Option<Entity>,
}

impl HealthCommand {
    pub fn damage(target: Entity, amount: f32) -> Self {
        Self {
            target,
            op: HealthOp::Damage(amount),
            source: None,
        }
    }

    pub fn heal(target: Entity, amount: f32) -> Self {
        Self {
            target,
            op: HealthOp::Heal(amount),
            source: None,
        }
    }

    pub fn set(target: Entity, value: f32) -> Self {
        Self {
            target,
            op: HealthOp::Set(value),
            source: None,
        }
    }

    pub fn with_source(mut self, source: Entity) -> Self {
        self.source = Some(source);
        self
    }
}
