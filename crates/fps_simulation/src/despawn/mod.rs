//! Отложенный деспавн (schedule now, despawn через N секунд simulated time)
//!
//! Очередь упорядочена по времени срабатывания. У каждой entity несколько
//! независимых слотов (`DespawnTimer`): lifetime снаряда, страховочный таймер
//! стрелка, grace delay после попадания, автоочистка эффектов.
//! Entity удаляется по самому раннему из своих слотов.

use bevy::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Слот таймера деспавна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DespawnTimer {
    /// Безусловный lifetime (SphereProjectile, переназначается `set_life_time`)
    Lifetime,
    /// Страховка стрелка после выстрела (дублирует Lifetime)
    SafetyNet,
    /// Короткая задержка после "spend": даём эффектам доиграть
    Grace,
    /// Автоочистка визуальных эффектов (hit / death)
    Effect,
}

impl DespawnTimer {
    pub const ALL: [DespawnTimer; 4] = [
        DespawnTimer::Lifetime,
        DespawnTimer::SafetyNet,
        DespawnTimer::Grace,
        DespawnTimer::Effect,
    ];
}

/// Time-ordered очередь деспавна, владеет ею симуляция (Resource)
#[derive(Resource, Debug, Default)]
pub struct DespawnQueue {
    entries: BTreeMap<(Duration, u64), (Entity, DespawnTimer)>,
    slots: HashMap<(Entity, DespawnTimer), (Duration, u64)>,
    next_seq: u64,
}

impl DespawnQueue {
    /// Ставит таймер. Если слот уже занят, остаётся более раннее время.
    ///
    /// Возвращает true если очередь изменилась.
    pub fn schedule(&mut self, entity: Entity, timer: DespawnTimer, at: Duration) -> bool {
        if let Some((existing, _)) = self.slots.get(&(entity, timer)) {
            if *existing <= at {
                return false;
            }
        }
        self.reschedule(entity, timer, at);
        true
    }

    /// Cancel + schedule: слот всегда получает новое время
    pub fn reschedule(&mut self, entity: Entity, timer: DespawnTimer, at: Duration) {
        self.cancel(entity, timer);

        let key = (at, self.next_seq);
        self.next_seq += 1;
        self.entries.insert(key, (entity, timer));
        self.slots.insert((entity, timer), key);
    }

    /// `schedule` через `secs` от `now`. Непредставимая задержка: слот не трогаем.
    pub fn schedule_after(&mut self, entity: Entity, timer: DespawnTimer, now: Duration, secs: f32) -> bool {
        match fire_time_after(now, secs) {
            Some(at) => self.schedule(entity, timer, at),
            None => false,
        }
    }

    /// `reschedule` через `secs` от `now`. Непредставимая задержка снимает слот
    /// (этот таймер больше никогда не сработает).
    pub fn reschedule_after(&mut self, entity: Entity, timer: DespawnTimer, now: Duration, secs: f32) {
        match fire_time_after(now, secs) {
            Some(at) => self.reschedule(entity, timer, at),
            None => {
                self.cancel(entity, timer);
            }
        }
    }

    pub fn cancel(&mut self, entity: Entity, timer: DespawnTimer) -> bool {
        match self.slots.remove(&(entity, timer)) {
            Some(key) => {
                self.entries.remove(&key);
                true
            }
            None => false,
        }
    }

    /// Убирает все слоты entity (после фактического деспавна)
    pub fn forget(&mut self, entity: Entity) {
        for timer in DespawnTimer::ALL {
            self.cancel(entity, timer);
        }
    }

    pub fn fire_time(&self, entity: Entity, timer: DespawnTimer) -> Option<Duration> {
        self.slots.get(&(entity, timer)).map(|(at, _)| *at)
    }

    /// Достаёт все entity с fire time <= now (по порядку, без дублей)
    pub fn pop_due(&mut self, now: Duration) -> Vec<Entity> {
        let mut due = Vec::new();

        while let Some((&key, &(entity, timer))) = self.entries.first_key_value() {
            if key.0 > now {
                break;
            }
            self.entries.remove(&key);
            self.slots.remove(&(entity, timer));

            if !due.contains(&entity) {
                due.push(entity);
            }
        }

        due
    }
}

/// `now + secs`, отрицательная задержка = "прямо сейчас"
///
/// None: задержка NaN / бесконечна / не влезает в Duration, таймер не ставится.
pub fn fire_time_after(now: Duration, secs: f32) -> Option<Duration> {
    if secs.is_nan() {
        return None;
    }
    let delay = Duration::try_from_secs_f32(secs.max(0.0)).ok()?;
    now.checked_add(delay)
}

/// Система: деспавн entities с истёкшими таймерами
///
/// Запускается последней в тике (SimulationSet::Cleanup).
/// Entity, уже удалённые другим путём (смерть с destroy_on_death), пропускаются.
pub fn process_despawn_queue(
    mut commands: Commands,
    mut queue: ResMut<DespawnQueue>,
    time: Res<Time<Fixed>>,
) {
    let due = queue.pop_due(time.elapsed());

    for entity in due {
        queue.forget(entity);

        if let Ok(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.despawn();
            crate::logger::log(&format!("⚰️ Despawning entity {:?} (timer)", entity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn test_schedule_keeps_earliest() {
        let mut queue = DespawnQueue::default();
        let entity = Entity::from_raw(7);

        assert!(queue.schedule(entity, DespawnTimer::Grace, secs(1.0)));
        assert!(!queue.schedule(entity, DespawnTimer::Grace, secs(2.0)));
        assert!(queue.schedule(entity, DespawnTimer::Grace, secs(0.5)));

        assert_eq!(queue.fire_time(entity, DespawnTimer::Grace), Some(secs(0.5)));
        assert_eq!(queue.pop_due(secs(0.5)), vec![entity]);
        assert!(queue.pop_due(Duration::MAX).is_empty());
    }

    #[test]
    fn test_reschedule_replaces_later() {
        let mut queue = DespawnQueue::default();
        let entity = Entity::from_raw(3);

        queue.schedule(entity, DespawnTimer::Lifetime, secs(3.0));
        queue.reschedule(entity, DespawnTimer::Lifetime, secs(10.0));

        assert_eq!(queue.fire_time(entity, DespawnTimer::Lifetime), Some(secs(10.0)));
        assert!(queue.pop_due(secs(5.0)).is_empty());
        assert_eq!(queue.pop_due(secs(10.0)), vec![entity]);
        assert!(queue.pop_due(Duration::MAX).is_empty());
    }

    #[test]
    fn test_pop_due_orders_and_dedups() {
        let mut queue = DespawnQueue::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        queue.schedule(b, DespawnTimer::Effect, secs(2.0));
        queue.schedule(a, DespawnTimer::Lifetime, secs(1.0));
        queue.schedule(a, DespawnTimer::SafetyNet, secs(1.5));

        assert_eq!(queue.pop_due(secs(2.0)), vec![a, b]);
        assert!(queue.pop_due(Duration::MAX).is_empty());
    }

    #[test]
    fn test_forget_clears_every_slot() {
        let mut queue = DespawnQueue::default();
        let entity = Entity::from_raw(4);

        queue.schedule(entity, DespawnTimer::Lifetime, secs(3.0));
        queue.schedule(entity, DespawnTimer::Grace, secs(0.1));

        queue.forget(entity);
        assert_eq!(queue.fire_time(entity, DespawnTimer::Lifetime), None);
        assert_eq!(queue.fire_time(entity, DespawnTimer::Grace), None);
        assert!(queue.pop_due(Duration::MAX).is_empty());
    }

    #[test]
    fn test_negative_delay_is_immediate() {
        let now = secs(4.0);
        assert_eq!(fire_time_after(now, -1.0), Some(now));
        assert_eq!(fire_time_after(now, 0.5), Some(secs(4.5)));
    }

    #[test]
    fn test_infinite_reschedule_drops_the_slot() {
        let mut queue = DespawnQueue::default();
        let entity = Entity::from_raw(9);

        queue.schedule_after(entity, DespawnTimer::Lifetime, secs(1.0), 3.0);
        assert_eq!(queue.fire_time(entity, DespawnTimer::Lifetime), Some(secs(4.0)));

        queue.reschedule_after(entity, DespawnTimer::Lifetime, secs(2.0), f32::INFINITY);
        assert_eq!(queue.fire_time(entity, DespawnTimer::Lifetime), None);

        assert!(!queue.schedule_after(entity, DespawnTimer::SafetyNet, secs(2.0), 1.0e30));
        assert!(queue.pop_due(Duration::MAX).is_empty());
    }

    #[test]
    fn test_unrepresentable_delay_never_fires() {
        let now = secs(4.0);
        assert_eq!(fire_time_after(now, f32::INFINITY), None);
        assert_eq!(fire_time_after(now, f32::NAN), None);
        assert_eq!(fire_time_after(now, 1.0e30), None);
        assert_eq!(fire_time_after(Duration::MAX, 1.0), None);
    }
}
