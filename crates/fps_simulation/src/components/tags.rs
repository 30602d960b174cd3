//! Tag-маркеры
//!
//! "Has tag T" = наличие marker компонента. Проверка через `Has<T>` / `With<T>`.

use bevy::prelude::Component;

/// Marker для player-controlled entity
///
/// Снаряды игнорируют solid-столкновения с этим тегом (нет self-damage).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker для врагов
///
/// Trigger-overlap снаряда наносит урон только entity с этим тегом.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Поверхность, по которой ходит capsule (участвует в ground ray casts)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Ground;
