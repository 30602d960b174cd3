//! FPS Sandbox Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16 для трёх gameplay компонентов:
//! - Health: урон, лечение, смерть (health)
//! - First-person контроллер: движение, прыжок, ground correction, стрельба (player)
//! - SphereProjectile: снаряд, урон по Health, самоуничтожение (projectile)
//!
//! Host (клиент с рендером + Rapier pipeline, или тесты) пишет PlayerInput и
//! contact events, симуляция тикает в FixedUpdate и отдаёт события/флаги.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

pub mod components;
pub mod config;
pub mod despawn;
pub mod health;
pub mod logger;
pub mod physics;
pub mod player;
pub mod projectile;

// Re-export основных типов для удобства
pub use components::*;
pub use config::{GameplayTunables, SimulationConfig};
pub use despawn::{DespawnQueue, DespawnTimer};
pub use health::{Dead, Health, HealthCommand, HealthEvent, HealthOp, HealthPlugin};
pub use physics::{CharacterCapsule, CharacterMotion, CollisionEntered, ContactsPlugin, TriggerEntered};
pub use player::{
    spawn_player, PlayerCamera, PlayerController, PlayerInput, PlayerPlugin, PlayerRig, Shooter,
    ShotFired,
};
pub use projectile::{spawn_projectile, ProjectilePlugin, ProjectileTemplate, SphereProjectile};

/// Фазы одного тика FixedUpdate (строго последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Host contacts → CollisionEntered / TriggerEntered
    Contacts,
    /// One-time setup только что добавленных компонентов
    Activation,
    /// Движение и стрельба игрока
    Player,
    /// Lifetime и контакты снарядов
    Projectiles,
    /// Внешние HealthCommand + death transition
    Health,
    /// Отложенный деспавн
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let mut config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !config.tick_hz_is_valid() {
            logger::log_warning(&format!(
                "tick_hz {} out of range, using {}",
                config.tick_hz,
                config.effective_tick_hz()
            ));
            config.tick_hz = config.effective_tick_hz();
        }

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            .init_resource::<DespawnQueue>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Contacts,
                    SimulationSet::Activation,
                    SimulationSet::Player,
                    SimulationSet::Projectiles,
                    SimulationSet::Health,
                    SimulationSet::Cleanup,
                )
                    .chain(),
            )
            .add_plugins((ContactsPlugin, HealthPlugin, PlayerPlugin, ProjectilePlugin))
            .add_systems(
                FixedUpdate,
                despawn::process_despawn_queue.in_set(SimulationSet::Cleanup),
            );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается ровно на один fixed step за `app.update()` (кроме самого
/// первого update: Bevy стартует с нулевой delta), поэтому прогоны
/// детерминированы и не зависят от wall clock.
pub fn create_headless_app(config: &SimulationConfig) -> App {
    logger::set_log_level(config.log_level);
    logger::init_logger();

    let step = Duration::from_secs_f64(config.tick_secs());

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(config.clone())
        .add_plugins(SimulationPlugin);

    app
}

/// Прогоняет симуляцию вперёд на `seconds` simulated time
pub fn advance(app: &mut App, seconds: f32) {
    let tick_secs = app
        .world()
        .get_resource::<SimulationConfig>()
        .map(|config| config.tick_secs())
        .unwrap_or(1.0 / 60.0);

    let ticks = (seconds as f64 / tick_secs).round() as usize;
    for _ in 0..ticks {
        app.update();
    }
}

/// Snapshot мира для сравнения детерминизма
///
/// Компоненты сериализуются через Debug, entities сортируются по index.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
