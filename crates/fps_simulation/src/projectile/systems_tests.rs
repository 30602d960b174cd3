//! Tests for projectile systems.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use bevy_rapier3d::prelude::ColliderDisabled;

    use crate::components::{Effect, EffectTemplate, Enemy, Player, SoundClip, SoundRequested, Visual};
    use crate::despawn::{DespawnQueue, DespawnTimer};
    use crate::health::Health;
    use crate::logger::LogLevel;
    use crate::physics::{CollisionEntered, TriggerEntered};
    use crate::projectile::SphereProjectile;
    use crate::{advance, create_headless_app, SimulationConfig, SimulationSet};

    #[derive(Resource, Default)]
    struct SoundLog(Vec<SoundRequested>);

    fn record_sounds(mut events: EventReader<SoundRequested>, mut log: ResMut<SoundLog>) {
        log.0.extend(events.read().cloned());
    }

    fn test_app() -> App {
        let mut app = create_headless_app(&SimulationConfig {
            log_level: LogLevel::Warning,
            ..default()
        });
        app.init_resource::<SoundLog>()
            .add_systems(FixedUpdate, record_sounds.after(SimulationSet::Projectiles));
        app.update();
        app
    }

    /// Снаряд + цель со 100 HP, оба уже активированы
    fn setup(app: &mut App, projectile: SphereProjectile, target: impl Bundle) -> (Entity, Entity) {
        let projectile = app
            .world_mut()
            .spawn((projectile, Transform::default()))
            .id();
        let target = app
            .world_mut()
            .spawn((Health::new(100.0), Transform::from_xyz(0.0, 0.0, -5.0), target))
            .id();
        app.update();
        (projectile, target)
    }

    fn hit(app: &mut App, projectile: Entity, target: Entity) {
        app.world_mut().send_event(CollisionEntered {
            entity: projectile,
            other: target,
            point: Vec3::new(0.0, 0.0, -4.5),
        });
        app.update();
    }

    fn current_health(app: &App, entity: Entity) -> f32 {
        app.world().get::<Health>(entity).unwrap().current()
    }

    fn spent(app: &App, entity: Entity) -> bool {
        app.world().get::<SphereProjectile>(entity).unwrap().is_spent()
    }

    #[test]
    fn test_collision_damages_once_and_spends() {
        let mut app = test_app();
        let (projectile, target) = setup(&mut app, SphereProjectile::new(25.0, 3.0), ());

        hit(&mut app, projectile, target);

        assert_eq!(current_health(&app, target), 75.0);
        assert!(spent(&app, projectile));
        assert!(!app.world().get::<Visual>(projectile).unwrap().visible);
        assert!(app.world().get::<ColliderDisabled>(projectile).is_some());

        // Spent снаряд больше не бьёт
        hit(&mut app, projectile, target);
        assert_eq!(current_health(&app, target), 75.0);

        advance(&mut app, 0.2);
        assert!(app.world().get_entity(projectile).is_err());
    }

    #[test]
    fn test_collision_with_player_is_ignored() {
        let mut app = test_app();
        let (projectile, target) = setup(&mut app, SphereProjectile::new(25.0, 3.0), Player);

        hit(&mut app, projectile, target);

        assert_eq!(current_health(&app, target), 100.0);
        assert!(!spent(&app, projectile));
    }

    #[test]
    fn test_collision_without_health_still_spends() {
        let mut app = test_app();
        let projectile = app
            .world_mut()
            .spawn((SphereProjectile::new(25.0, 3.0), Transform::default()))
            .id();
        let wall = app.world_mut().spawn(Transform::default()).id();
        app.update();

        hit(&mut app, projectile, wall);

        assert!(spent(&app, projectile));
    }

    #[test]
    fn test_keep_alive_projectile_hits_repeatedly() {
        let mut app = test_app();
        let mut piercing = SphereProjectile::new(10.0, 3.0);
        piercing.destroy_on_hit = false;
        let (projectile, target) = setup(&mut app, piercing, ());

        hit(&mut app, projectile, target);
        hit(&mut app, projectile, target);

        assert_eq!(current_health(&app, target), 80.0);
        assert!(!spent(&app, projectile));
        assert!(app.world().get::<Visual>(projectile).unwrap().visible);
    }

    #[test]
    fn test_hit_effect_and_sound() {
        let mut app = test_app();
        let mut loud = SphereProjectile::new(25.0, 3.0);
        loud.hit_effect = Some(EffectTemplate::new("spark"));
        loud.hit_sound = Some(SoundClip::new("thud"));
        let (projectile, target) = setup(&mut app, loud, ());

        hit(&mut app, projectile, target);

        let mut effects = app.world_mut().query::<(&Effect, &Transform)>();
        let spawned: Vec<_> = effects.iter(app.world()).collect();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].0.name, "spark");
        assert_eq!(spawned[0].1.translation, Vec3::new(0.0, 0.0, -4.5));

        let sounds = &app.world().resource::<SoundLog>().0;
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].emitter, projectile);
        assert_eq!(sounds[0].clip, SoundClip::new("thud"));

        // Эффект попадания живёт 2s
        advance(&mut app, 2.2);
        let mut effects = app.world_mut().query::<&Effect>();
        assert_eq!(effects.iter(app.world()).count(), 0);
    }

    #[test]
    fn test_trigger_only_hits_enemies() {
        let mut app = test_app();
        let (projectile, bystander) = setup(&mut app, SphereProjectile::new(25.0, 3.0), ());
        let enemy = app.world_mut().spawn((Health::new(100.0), Enemy)).id();
        app.update();

        app.world_mut().send_event(TriggerEntered {
            entity: projectile,
            other: bystander,
        });
        app.update();
        assert_eq!(current_health(&app, bystander), 100.0);
        assert!(!spent(&app, projectile));

        app.world_mut().send_event(TriggerEntered {
            entity: projectile,
            other: enemy,
        });
        app.update();
        assert_eq!(current_health(&app, enemy), 75.0);
        assert!(spent(&app, projectile));
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut app = test_app();
        let projectile = app
            .world_mut()
            .spawn((SphereProjectile::new(25.0, 3.0), Transform::default()))
            .id();
        app.update();

        assert!(app.world().get::<SphereProjectile>(projectile).unwrap().spawned_at().is_some());
        assert!(app
            .world()
            .resource::<DespawnQueue>()
            .fire_time(projectile, DespawnTimer::Lifetime)
            .is_some());

        advance(&mut app, 2.9);
        assert!(!spent(&app, projectile));

        advance(&mut app, 0.3);
        assert!(app.world().get_entity(projectile).is_err());
    }

    #[test]
    fn test_set_life_time_reschedules_pending_despawn() {
        let mut app = test_app();
        let projectile = app
            .world_mut()
            .spawn((SphereProjectile::new(25.0, 3.0), Transform::default()))
            .id();
        app.update();
        advance(&mut app, 1.0);

        app.world_mut()
            .get_mut::<SphereProjectile>(projectile)
            .unwrap()
            .set_life_time(10.0);
        app.update();

        let now = app.world().resource::<Time<Fixed>>().elapsed();
        let fire_at = app
            .world()
            .resource::<DespawnQueue>()
            .fire_time(projectile, DespawnTimer::Lifetime)
            .unwrap();
        assert!((fire_at.as_secs_f32() - now.as_secs_f32() - 10.0).abs() < 0.05);

        advance(&mut app, 4.0);
        assert!(app.world().get_entity(projectile).is_ok());
        assert!(!spent(&app, projectile));
    }

    #[test]
    fn test_infinite_life_time_never_expires() {
        let mut app = test_app();
        let projectile = app
            .world_mut()
            .spawn((SphereProjectile::new(25.0, 3.0), Transform::default()))
            .id();
        app.update();

        app.world_mut()
            .get_mut::<SphereProjectile>(projectile)
            .unwrap()
            .set_life_time(f32::INFINITY);
        app.update();

        assert_eq!(
            app.world()
                .resource::<DespawnQueue>()
                .fire_time(projectile, DespawnTimer::Lifetime),
            None
        );

        advance(&mut app, 5.0);
        assert!(app.world().get_entity(projectile).is_ok());
        assert!(!spent(&app, projectile));
    }

    #[test]
    fn test_huge_life_time_at_spawn() {
        let mut app = test_app();
        let projectile = app
            .world_mut()
            .spawn((SphereProjectile::new(25.0, 1.0e30), Transform::default()))
            .id();
        app.update();

        assert!(app.world().get::<SphereProjectile>(projectile).unwrap().spawned_at().is_some());
        assert_eq!(
            app.world()
                .resource::<DespawnQueue>()
                .fire_time(projectile, DespawnTimer::Lifetime),
            None
        );

        // Попадание всё равно работает, grace delay обычный
        let target = app.world_mut().spawn(Health::new(100.0)).id();
        hit(&mut app, projectile, target);
        assert_eq!(current_health(&app, target), 75.0);
        advance(&mut app, 0.2);
        assert!(app.world().get_entity(projectile).is_err());
    }
}
