//! Capsule collision volume + kinematic motor
//!
//! Собственная интеграция движения (Rapier только для формы коллайдера и
//! ray casts): горизонтальный сдвиг без коллизий, вертикальный сдвиг
//! останавливается на земле и выставляет grounded.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;
use serde::{Deserialize, Serialize};

/// Capsule collision volume персонажа
///
/// Значения по умолчанию: center (0,1,0), height 2, radius 0.5 →
/// нижняя точка капсулы совпадает с origin entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct CharacterCapsule {
    /// Центр капсулы относительно origin entity
    pub center: Vec3,
    pub height: f32,
    pub radius: f32,
    /// Допуск касания поверхности (против numerical tunneling)
    pub skin_width: f32,
    /// Сдвиги короче этого игнорируются
    pub min_move_distance: f32,
    /// false → volume не участвует в движении и ground correction
    pub enabled: bool,
}

impl Default for CharacterCapsule {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 1.0, 0.0),
            height: 2.0,
            radius: 0.5,
            skin_width: 0.08,
            min_move_distance: 0.001,
            enabled: true,
        }
    }
}

impl CharacterCapsule {
    /// Смещение нижней точки капсулы относительно origin по Y
    pub fn bottom_offset(&self) -> f32 {
        self.center.y - self.height / 2.0
    }

    /// Мировая Y нижней точки капсулы
    pub fn bottom(&self, translation: Vec3) -> f32 {
        translation.y + self.bottom_offset()
    }

    /// Мировая позиция центра капсулы
    pub fn world_center(&self, translation: Vec3) -> Vec3 {
        translation + self.center
    }

    /// Rapier коллайдер с тем же смещением центра
    pub fn collider(&self) -> Collider {
        let half_segment = (self.height / 2.0 - self.radius).max(0.0);
        Collider::compound(vec![(
            self.center,
            Quat::IDENTITY,
            Collider::capsule_y(half_segment, self.radius),
        )])
    }

    /// Касается ли нижняя точка земли (в пределах skin width)
    pub fn touches_ground(&self, translation: Vec3, ground_y: Option<f32>) -> bool {
        ground_y.is_some_and(|ground| (self.bottom(translation) - ground).abs() <= self.skin_width)
    }

    /// Горизонтальный сдвиг (без коллизий со стенами)
    pub fn move_planar(&self, translation: &mut Vec3, displacement: Vec3) {
        let planar = Vec3::new(displacement.x, 0.0, displacement.z);
        if planar.length() < self.min_move_distance {
            return;
        }
        *translation += planar;
    }

    /// Вертикальный сдвиг с остановкой на земле
    ///
    /// Возвращает grounded: движение вниз упёрлось в землю (с учётом skin width).
    pub fn move_vertical(&self, translation: &mut Vec3, dy: f32, ground_y: Option<f32>) -> bool {
        let bottom = self.bottom(*translation);

        if let Some(ground) = ground_y {
            if dy <= 0.0 && bottom + dy <= ground + self.skin_width {
                translation.y += ground - bottom;
                return true;
            }
        }

        if dy.abs() >= self.min_move_distance {
            translation.y += dy;
        }
        false
    }

    /// Насколько поднять entity, если нижняя точка ушла под землю
    ///
    /// None: не под землёй. Иначе глубина + `margin`.
    pub fn penetration_correction(&self, translation: Vec3, ground_y: f32, margin: f32) -> Option<f32> {
        let bottom = self.bottom(translation);
        (bottom < ground_y).then(|| ground_y - bottom + margin)
    }
}

/// Runtime состояние kinematic движения
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterMotion {
    /// Вертикальная скорость (m/s), горизонталь не хранится
    pub vertical_velocity: f32,
    /// Результат последнего вертикального сдвига
    pub grounded: bool,
}
