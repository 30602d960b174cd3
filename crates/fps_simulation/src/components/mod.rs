//! Общие ECS компоненты, не принадлежащие одному gameplay модулю
//!
//! - tags: маркеры ролей (Player, Enemy, Ground)
//! - visual: render/audio facets, которые исполняет host (Visual, Effect, SoundRequested)

pub mod tags;
pub mod visual;

pub use tags::*;
pub use visual::*;
