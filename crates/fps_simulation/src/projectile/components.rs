//! SphereProjectile компоненты
//!
//! Lifecycle:
//! 1. spawn (стрелок) → damage / life_time уже выставлены
//! 2. activate → spawned_at + безусловный деспавн через life_time
//! 3. контакт или истечение life_time → spend (render/collider off) → деспавн через grace delay

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::components::{EffectTemplate, SoundClip, Visual};

/// Задержка между spend и фактическим деспавном (даём эффектам доиграть)
pub const SPENT_GRACE_DELAY: f32 = 0.1;

/// Снаряд-сфера
#[derive(Component, Debug, Clone, PartialEq)]
#[require(Visual)]
pub struct SphereProjectile {
    damage: f32,
    life_time: f32,
    /// Spend сразу после первого засчитанного контакта
    pub destroy_on_hit: bool,
    pub hit_effect: Option<EffectTemplate>,
    pub hit_sound: Option<SoundClip>,
    spawned_at: Option<Duration>,
    spent: bool,
    lifetime_dirty: bool,
}

impl Default for SphereProjectile {
    fn default() -> Self {
        Self::new(25.0, 3.0)
    }
}

impl SphereProjectile {
    pub fn new(damage: f32, life_time: f32) -> Self {
        Self {
            damage,
            life_time,
            destroy_on_hit: true,
            hit_effect: None,
            hit_sound: None,
            spawned_at: None,
            spent: false,
            lifetime_dirty: false,
        }
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn life_time(&self) -> f32 {
        self.life_time
    }

    pub fn spawned_at(&self) -> Option<Duration> {
        self.spawned_at
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    pub fn set_damage(&mut self, damage: f32) {
        self.damage = damage;
    }

    /// Новый life_time. Pending безусловный деспавн будет переназначен
    /// на now + life_time (reschedule_projectile_lifetimes).
    pub fn set_life_time(&mut self, life_time: f32) {
        self.life_time = life_time;
        self.lifetime_dirty = true;
    }

    pub(crate) fn activate(&mut self, now: Duration) {
        self.spawned_at = Some(now);
        self.lifetime_dirty = false;
    }

    pub(crate) fn take_lifetime_dirty(&mut self) -> bool {
        std::mem::take(&mut self.lifetime_dirty)
    }

    pub(crate) fn lifetime_dirty(&self) -> bool {
        self.lifetime_dirty
    }

    /// Прошло ли life_time с момента активации
    pub fn is_expired(&self, now: Duration) -> bool {
        self.spawned_at
            .is_some_and(|spawned| (now.saturating_sub(spawned)).as_secs_f32() >= self.life_time)
    }

    /// true только при первом вызове
    pub(crate) fn mark_spent(&mut self) -> bool {
        !std::mem::replace(&mut self.spent, true)
    }
}

/// Шаблон снаряда (что стрелок спавнит по выстрелу)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTemplate {
    /// Радиус сферы коллайдера
    pub radius: f32,
    pub destroy_on_hit: bool,
    pub hit_effect: Option<EffectTemplate>,
    pub hit_sound: Option<SoundClip>,
}

impl Default for ProjectileTemplate {
    fn default() -> Self {
        Self {
            radius: 0.2,
            destroy_on_hit: true,
            hit_effect: None,
            hit_sound: None,
        }
    }
}

impl ProjectileTemplate {
    /// Экземпляр компонента с переопределёнными damage / life_time
    pub fn instantiate(&self, damage: f32, life_time: f32) -> SphereProjectile {
        SphereProjectile {
            destroy_on_hit: self.destroy_on_hit,
            hit_effect: self.hit_effect.clone(),
            hit_sound: self.hit_sound.clone(),
            ..SphereProjectile::new(damage, life_time)
        }
    }

    pub fn collider(&self) -> Collider {
        Collider::ball(self.radius)
    }
}
