//! Headless симуляция FPS Sandbox
//!
//! Scripted арена: земля, игрок, два врага в линию по -Z.
//! Вместо Rapier pipeline работает упрощённый host: двигает снаряды по
//! Velocity и сообщает sphere-sphere контакты как CollisionEntered.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, ColliderDisabled, Velocity};
use fps_simulation::logger;
use fps_simulation::*;

/// Радиус врага (ball collider)
const ENEMY_RADIUS: f32 = 0.5;

/// Сколько тиков гонять арену
const TICK_COUNT: usize = 600;

/// Host: игрок держит fire весь прогон (стрельбу ограничивает cooldown)
fn script_input(mut inputs: Query<&mut PlayerInput>) {
    for mut input in inputs.iter_mut() {
        input.fire = true;
    }
}

/// Host: интеграция полёта снарядов + sphere-sphere контакты
fn host_projectile_flight(
    mut projectiles: Query<
        (Entity, &mut Transform, &Velocity, &Collider),
        (With<SphereProjectile>, Without<ColliderDisabled>),
    >,
    targets: Query<(Entity, &Transform, &Collider), (With<Health>, Without<SphereProjectile>, Without<ColliderDisabled>)>,
    mut contacts: EventWriter<CollisionEntered>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (projectile, mut transform, velocity, collider) in projectiles.iter_mut() {
        transform.translation += velocity.linvel * delta;

        let radius = collider.as_ball().map(|ball| ball.radius()).unwrap_or(0.0);
        for (target, target_transform, target_collider) in targets.iter() {
            let target_radius = target_collider
                .as_ball()
                .map(|ball| ball.radius())
                .unwrap_or(ENEMY_RADIUS);

            let distance = transform.translation.distance(target_transform.translation);
            if distance <= radius + target_radius {
                contacts.write(CollisionEntered {
                    entity: projectile,
                    other: target,
                    point: transform.translation.lerp(target_transform.translation, 0.5),
                });
            }
        }
    }
}

fn spawn_enemy(world: &mut World, position: Vec3, tunables: &GameplayTunables) -> Entity {
    world
        .spawn((
            Enemy,
            Health::new(tunables.enemy_max_health)
                .with_destroy_on_death(tunables.enemy_destroy_on_death)
                .with_death_effect(EffectTemplate::new("explosion")),
            Visual::default(),
            Transform::from_translation(position),
            Collider::ball(ENEMY_RADIUS),
        ))
        .id()
}

fn main() {
    let tunables = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|err| err.to_string())
            .and_then(|json| GameplayTunables::from_json(&json).map_err(|err| err.to_string()))
        {
            Ok(tunables) => tunables,
            Err(err) => {
                eprintln!("Failed to load tunables from {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => GameplayTunables::default(),
    };

    let mut app = create_headless_app(&tunables.simulation);
    app.add_systems(
        FixedUpdate,
        (script_input, host_projectile_flight)
            .chain()
            .before(SimulationSet::Contacts),
    );

    logger::log_info("Starting FPS Sandbox headless arena");

    let world = app.world_mut();
    world.spawn((
        Ground,
        Collider::cuboid(50.0, 0.5, 50.0),
        Transform::from_xyz(0.0, -0.5, 0.0),
    ));

    let player = {
        let mut commands = world.commands();
        spawn_player(&mut commands, Vec3::ZERO, tunables.player.clone())
    };
    world.flush();

    // Оба врага на линии огня (муззл на высоте 1.5)
    let front = spawn_enemy(world, Vec3::new(0.0, 1.5, -8.0), &tunables);
    let back = {
        let mut second = tunables.clone();
        second.enemy_destroy_on_death = false;
        spawn_enemy(world, Vec3::new(0.0, 1.5, -16.0), &second)
    };

    for tick in 0..TICK_COUNT {
        app.update();

        if tick % 60 == 0 {
            let entity_count = app.world().entities().len();
            logger::log_info(&format!("Tick {}: {} entities", tick, entity_count));
        }
    }

    let world = app.world();
    for (name, enemy) in [("front", front), ("back", back)] {
        match world.get::<Health>(enemy) {
            Some(health) => logger::log_info(&format!(
                "Enemy {} {:?}: {}/{} HP (dead: {})",
                name,
                enemy,
                health.current(),
                health.max(),
                health.is_dead()
            )),
            None => logger::log_info(&format!("Enemy {} {:?}: destroyed", name, enemy)),
        }
    }

    if let Some(transform) = world.get::<Transform>(player) {
        logger::log_info(&format!("Player finished at {:?}", transform.translation));
    }

    logger::log_info("Simulation complete!");
}
