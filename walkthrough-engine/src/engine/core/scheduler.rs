use std::time::Duration;

use bevy::prelude::*;

/// Scene an action belongs to. Tearing a scene down cancels its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneScope {
    Session,
    Primary,
    Exhibit,
}

/// Handle returned by [`ActionScheduler::schedule`], used to cancel one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle(u64);

struct ScheduledEntry<A> {
    handle: ActionHandle,
    name: &'static str,
    scope: SceneScope,
    timer: Timer,
    action: A,
}

/// Named, cancellable delayed actions driven by the frame delta.
///
/// Fired actions come back from [`tick`](Self::tick) in scheduling order, so
/// two entries due in the same frame always fire in the same order.
pub struct ActionScheduler<A> {
    next_id: u64,
    entries: Vec<ScheduledEntry<A>>,
}

impl<A> Default for ActionScheduler<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<A: Clone> ActionScheduler<A> {
    /// Fire `action` once after `delay`.
    pub fn schedule(
        &mut self,
        name: &'static str,
        scope: SceneScope,
        delay: Duration,
        action: A,
    ) -> ActionHandle {
        self.push(name, scope, Timer::new(delay, TimerMode::Once), action)
    }

    /// Fire `action` every `interval` until cancelled.
    pub fn schedule_repeating(
        &mut self,
        name: &'static str,
        scope: SceneScope,
        interval: Duration,
        action: A,
    ) -> ActionHandle {
        // A zero interval would fire without bound inside one tick.
        let interval = interval.max(Duration::from_millis(1));
        self.push(name, scope, Timer::new(interval, TimerMode::Repeating), action)
    }

    fn push(&mut self, name: &'static str, scope: SceneScope, timer: Timer, action: A) -> ActionHandle {
        let handle = ActionHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(ScheduledEntry {
            handle,
            name,
            scope,
            timer,
            action,
        });
        debug!("Scheduled `{}` ({:?})", name, scope);
        handle
    }

    pub fn cancel(&mut self, handle: ActionHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        before != self.entries.len()
    }

    /// Cancel everything owned by a scene. Called on scene teardown.
    pub fn cancel_scope(&mut self, scope: SceneScope) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.scope != scope);
        let cancelled = before - self.entries.len();
        if cancelled > 0 {
            debug!("Cancelled {} pending action(s) for {:?}", cancelled, scope);
        }
        cancelled
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Advance every timer by `delta` and return the actions that fired.
    pub fn tick(&mut self, delta: Duration) -> Vec<A> {
        let mut fired = Vec::new();

        for entry in &mut self.entries {
            entry.timer.tick(delta);
            for _ in 0..entry.timer.times_finished_this_tick() {
                debug!("Fired `{}`", entry.name);
                fired.push(entry.action.clone());
            }
        }

        // One-shot entries are done once they finish.
        self.entries
            .retain(|entry| entry.timer.mode() == TimerMode::Repeating || !entry.timer.finished());

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn one_shot_fires_once_after_delay() {
        let mut scheduler = ActionScheduler::default();
        scheduler.schedule("cue", SceneScope::Primary, secs(1.5), 7);

        assert!(scheduler.tick(secs(1.0)).is_empty());
        assert_eq!(scheduler.tick(secs(0.5)), vec![7]);
        assert!(scheduler.tick(secs(5.0)).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn repeating_fires_every_interval() {
        let mut scheduler = ActionScheduler::default();
        scheduler.schedule_repeating("advance", SceneScope::Exhibit, secs(2.0), 'a');

        assert_eq!(scheduler.tick(secs(2.0)), vec!['a']);
        assert_eq!(scheduler.tick(secs(4.0)), vec!['a', 'a']);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn cancelled_entries_never_fire() {
        let mut scheduler = ActionScheduler::default();
        scheduler.schedule("keep", SceneScope::Session, secs(1.0), 1);
        let drop = scheduler.schedule("drop", SceneScope::Session, secs(1.0), 2);

        assert!(scheduler.cancel(drop));
        assert!(!scheduler.cancel(drop));
        assert_eq!(scheduler.tick(secs(1.0)), vec![1]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn scope_teardown_leaves_other_scopes() {
        let mut scheduler = ActionScheduler::default();
        scheduler.schedule("cue", SceneScope::Primary, secs(1.0), "primary");
        scheduler.schedule_repeating("advance", SceneScope::Primary, secs(0.5), "interval");
        scheduler.schedule("banner", SceneScope::Exhibit, secs(1.0), "exhibit");

        assert_eq!(scheduler.cancel_scope(SceneScope::Primary), 2);
        assert_eq!(scheduler.tick(secs(1.0)), vec!["exhibit"]);
    }

    #[test]
    fn same_frame_fires_in_schedule_order() {
        let mut scheduler = ActionScheduler::default();
        scheduler.schedule("b", SceneScope::Session, secs(0.2), 'b');
        scheduler.schedule("a", SceneScope::Session, secs(0.1), 'a');

        assert_eq!(scheduler.tick(secs(1.0)), vec!['b', 'a']);
    }
}
