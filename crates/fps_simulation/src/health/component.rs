//! Health компонент
//!
//! Чистая логика без ECS side effects: методы возвращают `HealthChange`,
//! а системы превращают его в `HealthEvent` broadcast.

use bevy::prelude::*;

use crate::components::EffectTemplate;

/// Здоровье damageable entity
///
/// Инварианты:
/// - 0 ≤ current ≤ max
/// - `dead` переходит false → true ровно один раз и больше не сбрасывается
/// - мёртвая entity игнорирует любые мутации
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
    /// true: entity удаляется при смерти; false: остаётся inert (collider/physics/render off)
    pub destroy_on_death: bool,
    /// Эффект, спавнимый в позиции entity при смерти
    pub death_effect: Option<EffectTemplate>,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

/// Результат успешной мутации Health (None = no-op)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    /// Новое значение current
    pub health: f32,
    /// Нанесённый урон (только для take_damage)
    pub damage: Option<f32>,
    /// Эта мутация перевела entity в dead
    pub died: bool,
}

impl Health {
    /// max: NaN → 0, ±inf → [0, f32::MAX]
    pub fn new(max: f32) -> Self {
        let max = if max.is_nan() { 0.0 } else { max.clamp(0.0, f32::MAX) };
        Self {
            current: max,
            max,
            dead: false,
            destroy_on_death: true,
            death_effect: None,
        }
    }

    pub fn with_destroy_on_death(mut self, destroy_on_death: bool) -> Self {
        self.destroy_on_death = destroy_on_death;
        self
    }

    pub fn with_death_effect(mut self, effect: EffectTemplate) -> Self {
        self.death_effect = Some(effect);
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// current / max; 0 для max == 0
    pub fn percentage(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Урон. No-op если dead или amount ≤ 0.
    pub fn take_damage(&mut self, amount: f32) -> Option<HealthChange> {
        if self.dead || !(amount > 0.0) {
            return None;
        }

        self.current = (self.current - amount).clamp(0.0, self.max);

        Some(HealthChange {
            health: self.current,
            damage: Some(amount),
            died: self.die_if_depleted(),
        })
    }

    /// Лечение. No-op если dead или amount ≤ 0.
    pub fn heal(&mut self, amount: f32) -> Option<HealthChange> {
        if self.dead || !(amount > 0.0) {
            return None;
        }

        self.current = (self.current + amount).min(self.max);

        Some(HealthChange {
            health: self.current,
            damage: None,
            died: false,
        })
    }

    /// Прямая установка значения (clamp в [0, max]). Мёртвые игнорируют.
    pub fn set_health(&mut self, value: f32) -> Option<HealthChange> {
        if self.dead || value.is_nan() {
            return None;
        }

        self.current = value.clamp(0.0, self.max);

        Some(HealthChange {
            health: self.current,
            damage: None,
            died: self.die_if_depleted(),
        })
    }

    fn die_if_depleted(&mut self) -> bool {
        if self.dead || self.current > 0.0 {
            return false;
        }
        self.dead = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_then_death() {
        let mut health = Health::new(100.0);

        let change = health.take_damage(30.0).unwrap();
        assert_eq!(change.health, 70.0);
        assert_eq!(change.damage, Some(30.0));
        assert!(!change.died);
        assert!(health.is_alive());

        let change = health.take_damage(80.0).unwrap();
        assert_eq!(change.health, 0.0); // Clamped
        assert!(change.died);
        assert!(health.is_dead());
    }

    #[test]
    fn test_non_positive_damage_is_ignored() {
        let mut health = Health::new(100.0);

        assert!(health.take_damage(0.0).is_none());
        assert!(health.take_damage(-5.0).is_none());
        assert!(health.take_damage(f32::NAN).is_none());
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn test_death_only_once() {
        let mut health = Health::new(50.0);

        assert!(health.take_damage(50.0).unwrap().died);
        assert!(health.take_damage(10.0).is_none());
        assert!(health.set_health(0.0).is_none());
        assert!(health.is_dead());
    }

    #[test]
    fn test_heal_clamps_and_ignores_dead() {
        let mut health = Health::new(100.0);
        health.take_damage(50.0);

        assert_eq!(health.heal(30.0).unwrap().health, 80.0);
        assert_eq!(health.heal(100.0).unwrap().health, 100.0);
        assert!(health.heal(0.0).is_none());

        health.take_damage(200.0);
        assert!(health.heal(10.0).is_none());
        assert_eq!(health.current(), 0.0);
    }

    #[test]
    fn test_set_health_clamps() {
        let mut health = Health::new(100.0);

        assert_eq!(health.set_health(150.0).unwrap().health, 100.0);
        assert_eq!(health.set_health(-20.0).unwrap().health, 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_percentage() {
        let mut health = Health::new(200.0);
        health.take_damage(50.0);
        assert_eq!(health.percentage(), 0.75);
        assert_eq!(health.max(), 200.0);
    }

    #[test]
    fn test_percentage_of_zero_max() {
        let health = Health::new(0.0);
        assert_eq!(health.percentage(), 0.0);

        let health = Health::new(f32::NAN);
        assert_eq!(health.max(), 0.0);
        assert_eq!(health.percentage(), 0.0);
    }

    #[test]
    fn test_mixed_operations_stay_in_bounds() {
        #[derive(Clone, Copy)]
        enum Op {
            Damage(f32),
            Heal(f32),
            Set(f32),
        }

        let values = [
            0.0,
            -0.0,
            1.0,
            -1.0,
            12.5,
            -40.0,
            99.9,
            250.0,
            f32::NAN,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::MAX,
            f32::MIN_POSITIVE,
        ];
        let mut ops = Vec::new();
        for (i, value) in values.iter().enumerate() {
            ops.push(Op::Heal(*value));
            ops.push(Op::Damage(values[(i * 5 + 3) % values.len()]));
            ops.push(Op::Set(values[(i * 7 + 1) % values.len()]));
            ops.push(Op::Damage(*value));
            ops.push(Op::Set(*value));
            ops.push(Op::Heal(values[(i * 3 + 2) % values.len()]));
        }

        for max in [100.0, 0.0, 1.0e-3, f32::INFINITY, f32::NAN, -10.0] {
            let mut health = Health::new(max);
            assert!(health.max() >= 0.0 && health.max().is_finite());

            for (step, op) in ops.iter().cycle().take(ops.len() * 3).enumerate() {
                let change = match *op {
                    Op::Damage(amount) => health.take_damage(amount),
                    Op::Heal(amount) => health.heal(amount),
                    Op::Set(value) => health.set_health(value),
                };

                let current = health.current();
                assert!(
                    (0.0..=health.max()).contains(&current),
                    "max {} step {}: current = {}",
                    max,
                    step,
                    current
                );
                if let Some(change) = change {
                    assert_eq!(change.health, current);
                }
                assert!((0.0..=1.0).contains(&health.percentage()));

                if health.is_dead() {
                    assert_eq!(current, 0.0);
                    health = Health::new(max);
                }
            }
        }
    }
}
