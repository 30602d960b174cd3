//! Render/audio facets
//!
//! Симуляция не рендерит и не играет звук. Она только выставляет флаги и
//! спавнит entity-запросы, host (клиент) их исполняет:
//! - `Visual::visible`: показывать ли меш entity
//! - `Effect`: одноразовый визуальный эффект (particles) с автоочисткой
//! - `SoundRequested`: one-shot звук

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;

use crate::despawn::{DespawnQueue, DespawnTimer};

/// Время жизни эффекта смерти (секунды)
pub const DEATH_EFFECT_LIFETIME: f32 = 3.0;

/// Время жизни эффекта попадания (секунды)
pub const HIT_EFFECT_LIFETIME: f32 = 2.0;

/// Render facet entity (host синхронизирует с мешем)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visual {
    pub visible: bool,
}

impl Default for Visual {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Ссылка на шаблон эффекта (host резолвит имя в prefab/particles)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTemplate {
    pub name: Cow<'static, str>,
}

impl EffectTemplate {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }
}

/// Заспавненный экземпляр эффекта
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    pub name: Cow<'static, str>,
}

/// Ссылка на аудио клип (host резолвит имя)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundClip {
    pub name: Cow<'static, str>,
}

impl SoundClip {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }
}

/// Event: проиграть one-shot звук на emitter'е
#[derive(Event, Debug, Clone)]
pub struct SoundRequested {
    pub emitter: Entity,
    pub clip: SoundClip,
    pub position: Vec3,
}

/// Спавнит эффект по шаблону и ставит его автоочистку через `lifetime` секунд
pub fn spawn_effect(
    commands: &mut Commands,
    queue: &mut DespawnQueue,
    template: &EffectTemplate,
    transform: Transform,
    now: Duration,
    lifetime: f32,
) -> Entity {
    let effect = commands
        .spawn((
            Effect {
                name: template.name.clone(),
            },
            transform,
        ))
        .id();

    queue.schedule_after(effect, DespawnTimer::Effect, now, lifetime);

    crate::logger::log(&format!(
        "✨ Effect '{}' {:?} at {:?} (cleanup in {}s)",
        template.name, effect, transform.translation, lifetime
    ));

    effect
}
