//! Ground ray casts против `Ground` коллайдеров
//!
//! Ray cast идёт напрямую по форме Rapier коллайдера (без RapierContext),
//! поэтому работает и в headless симуляции без physics pipeline.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use super::CharacterCapsule;
use crate::components::Ground;

/// SystemParam: ray cast вниз по всем Ground поверхностям
///
/// `Without<CharacterCapsule>`: персонаж никогда не считается землёй
/// (и query не конфликтует с `&mut Transform` персонажей).
#[derive(SystemParam)]
pub struct GroundProbe<'w, 's> {
    grounds: Query<'w, 's, (&'static Transform, &'static Collider), (With<Ground>, Without<CharacterCapsule>)>,
}

impl GroundProbe<'_, '_> {
    /// Ближайшая точка попадания луча `origin → -Y` в пределах `max_distance`
    pub fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        cast_down(self.grounds.iter(), origin, max_distance)
    }

    /// Y поверхности под `origin` (None: земли нет в радиусе)
    pub fn ground_height(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        self.cast_down(origin, max_distance).map(|hit| hit.y)
    }
}

/// Ray cast вниз по набору (transform, collider)
pub fn cast_down<'a>(
    grounds: impl Iterator<Item = (&'a Transform, &'a Collider)>,
    origin: Vec3,
    max_distance: f32,
) -> Option<Vec3> {
    grounds
        .filter_map(|(transform, collider)| {
            collider.cast_ray(
                transform.translation,
                transform.rotation,
                origin,
                Vec3::NEG_Y,
                max_distance,
                true,
            )
        })
        .min_by(|a, b| a.total_cmp(b))
        .map(|toi| origin + Vec3::NEG_Y * toi)
}
