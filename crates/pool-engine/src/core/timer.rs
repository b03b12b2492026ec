// core/timer.rs
//
// Deferred callbacks driven by the fixed tick instead of wall-clock timers.
// Payloads are plain data; the owner decides what to do when one fires.
//
// Usage:
//   let mut timers = TimerQueue::new();
//   let id = timers.schedule(1.0, Verify { ball: 3 });
//   for fired in timers.tick(dt) { ... }
//   timers.cancel(id);

use std::collections::BTreeMap;

/// Handle to a scheduled timer for later cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u32);

#[derive(Debug, Clone)]
struct Pending<T> {
    remaining: f32,
    payload: T,
}

/// One-shot timers keyed by `TimerId`. Fired payloads come out in scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: BTreeMap<TimerId, Pending<T>>,
    next_id: u32,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to fire after `delay` seconds.
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.timers.insert(id, Pending { remaining: delay, payload });
        id
    }

    /// Cancel a pending timer. Returns the payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(&id).map(|p| p.payload)
    }

    /// Advance all timers by `dt` seconds and return the ones that expired.
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        let mut due = Vec::new();
        for (&id, pending) in self.timers.iter_mut() {
            pending.remaining -= dt;
            if pending.remaining <= 0.0 {
                due.push(id);
            }
        }

        due.into_iter()
            .filter_map(|id| self.timers.remove(&id).map(|p| p.payload))
            .collect()
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let mut timers = TimerQueue::new();
        timers.schedule(1.0, "verify");

        assert!(timers.tick(0.5).is_empty());
        assert_eq!(timers.tick(0.5), vec!["verify"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn fired_in_scheduling_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.2, 1);
        timers.schedule(0.1, 2);
        timers.schedule(0.2, 3);
        assert_eq!(timers.tick(0.25), vec![1, 2, 3]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(1.0, 7);
        assert!(timers.contains(id));
        assert_eq!(timers.cancel(id), Some(7));
        assert!(timers.tick(2.0).is_empty());
        assert_eq!(timers.cancel(id), None);
    }
}
