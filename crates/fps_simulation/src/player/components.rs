//! Player компоненты: tunables контроллера, input, rig (камера + muzzle), стрельба

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Player;
use crate::physics::{CharacterCapsule, CharacterMotion};
use crate::projectile::ProjectileTemplate;

/// Локальное смещение камеры относительно игрока
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 1.5, 0.0);

/// Локальное смещение точки выстрела относительно камеры (0.5 вперёд, Bevy forward = -Z)
pub const MUZZLE_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -0.5);

/// Вертикальная скорость, прижимающая капсулу к земле
pub const GROUND_STICK_VELOCITY: f32 = -2.0;

/// Подъём при активации, если капсула уже стоит на земле (anti-clip)
pub const SETUP_NUDGE: f32 = 0.1;

/// Ground correction: старт луча над origin
pub const GROUND_RAY_LIFT: f32 = 0.1;

/// Ground correction: дальность луча вниз
pub const GROUND_RAY_RANGE: f32 = 10.0;

/// Ground correction: запас сверх глубины проникновения
pub const PENETRATION_MARGIN: f32 = 0.1;

/// First-person контроллер игрока (tunables)
///
/// Автоматически добавляет Player, CharacterCapsule, CharacterMotion,
/// PlayerInput, Shooter через Required Components.
/// Камера и muzzle: дочерние entity, см. `PlayerRig`.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[require(Player, CharacterCapsule, CharacterMotion, PlayerInput, Shooter, Transform)]
#[serde(default)]
pub struct PlayerController {
    /// Скорость ходьбы (m/s)
    pub move_speed: f32,
    /// Высота прыжка (m)
    pub jump_height: f32,
    /// Гравитация (m/s², отрицательная)
    pub gravity: f32,
    /// Градусов yaw на единицу look input
    pub look_sensitivity: f32,
    /// Начальная скорость снаряда (m/s)
    pub shoot_force: f32,
    /// Минимальный интервал между выстрелами (s)
    pub shoot_cooldown: f32,
    pub projectile_damage: f32,
    pub projectile_lifetime: f32,
    /// Страховочный деспавн снаряда стрелком (s)
    pub safety_cleanup_delay: f32,
    /// None → выстрел ничего не спавнит (cooldown всё равно тратится)
    pub projectile: Option<ProjectileTemplate>,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_height: 8.0,
            gravity: -20.0,
            look_sensitivity: 2.0,
            shoot_force: 20.0,
            shoot_cooldown: 0.3,
            projectile_damage: 25.0,
            projectile_lifetime: 3.0,
            safety_cleanup_delay: 3.0,
            projectile: Some(ProjectileTemplate::default()),
        }
    }
}

impl PlayerController {
    /// Стартовая скорость прыжка: v = sqrt(h * -2 * g)
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).max(0.0).sqrt()
    }
}

/// Входные данные игрока (пишет host)
///
/// Для headless тестов: mock input через этот компонент.
/// `jump` / `fire` / `look_x`: edges одного тика, сбрасываются в конце тика.
/// `axes`: удерживаемое состояние, host обновляет сам.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// x = strafe (right +), y = forward (+)
    pub axes: Vec2,
    /// Горизонтальный look delta (right +)
    pub look_x: f32,
    pub jump: bool,
    pub fire: bool,
}

impl PlayerInput {
    pub fn clear_edges(&mut self) {
        self.look_x = 0.0;
        self.jump = false;
        self.fire = false;
    }
}

/// Состояние стрельбы
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Shooter {
    /// Время последнего выстрела (s, simulated time). Стартует с 0.
    pub last_shot_at: f32,
}

impl Shooter {
    pub fn ready(&self, now: f32, cooldown: f32) -> bool {
        now >= self.last_shot_at + cooldown
    }
}

/// Дочерние entity игрока
///
/// Инвариант: muzzle это ребёнок camera, camera это ребёнок игрока.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRig {
    pub camera: Entity,
    pub muzzle: Entity,
}

/// Marker: look camera игрока
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerCamera;

/// Marker: точка вылета снарядов
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Muzzle;

/// Event: игрок выстрелил
#[derive(Event, Debug, Clone)]
pub struct ShotFired {
    pub shooter: Entity,
    pub projectile: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_velocity() {
        let controller = PlayerController::default();
        // sqrt(8 * -2 * -20) = sqrt(320)
        assert!((controller.jump_velocity() - 320f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_shooter_cooldown() {
        let shooter = Shooter { last_shot_at: 1.0 };
        assert!(!shooter.ready(1.2, 0.3));
        assert!(shooter.ready(1.35, 0.3));

        // Стартовый last_shot_at = 0 → первые cooldown секунд стрелять нельзя
        assert!(!Shooter::default().ready(0.1, 0.3));
    }

    #[test]
    fn test_clear_edges_keeps_axes() {
        let mut input = PlayerInput {
            axes: Vec2::Y,
            look_x: 3.0,
            jump: true,
            fire: true,
        };
        input.clear_edges();

        assert_eq!(input.axes, Vec2::Y);
        assert_eq!(input.look_x, 0.0);
        assert!(!input.jump && !input.fire);
    }
}
