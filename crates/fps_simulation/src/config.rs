//! Конфигурация симуляции
//!
//! - SimulationConfig: tick rate + уровень логов (Resource)
//! - GameplayTunables: стартовые значения gameplay компонентов, грузятся из JSON

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::logger::LogLevel;
use crate::player::PlayerController;

/// Параметры headless симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота FixedUpdate (Hz)
    pub tick_hz: f64,
    pub log_level: LogLevel,
}

/// Допустимый диапазон tick rate (Hz)
pub const MIN_TICK_HZ: f64 = 1.0;
pub const MAX_TICK_HZ: f64 = 1000.0;

const DEFAULT_TICK_HZ: f64 = 60.0;

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,
            log_level: LogLevel::Info,
        }
    }
}

impl SimulationConfig {
    pub fn tick_hz_is_valid(&self) -> bool {
        (MIN_TICK_HZ..=MAX_TICK_HZ).contains(&self.tick_hz)
    }

    /// tick_hz вне диапазона (0, NaN, отрицательный) → default 60
    pub fn effective_tick_hz(&self) -> f64 {
        if self.tick_hz_is_valid() {
            self.tick_hz
        } else {
            DEFAULT_TICK_HZ
        }
    }

    pub fn tick_secs(&self) -> f64 {
        1.0 / self.effective_tick_hz()
    }
}

/// Стартовые значения gameplay компонентов
///
/// Отсутствующие в JSON поля берутся из Default.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayTunables {
    pub simulation: SimulationConfig,
    pub player: PlayerController,
    pub enemy_max_health: f32,
    pub enemy_destroy_on_death: bool,
}

impl Default for GameplayTunables {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            player: PlayerController::default(),
            enemy_max_health: 100.0,
            enemy_destroy_on_death: true,
        }
    }
}

impl GameplayTunables {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tunables: Self = serde_json::from_str(json)?;
        if !tunables.simulation.tick_hz_is_valid() {
            return Err(serde::de::Error::custom(format!(
                "tick_hz {} out of range [{}, {}]",
                tunables.simulation.tick_hz, MIN_TICK_HZ, MAX_TICK_HZ
            )));
        }
        Ok(tunables)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
