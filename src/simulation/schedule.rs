//! Repeating timers behind a small scheduling abstraction
//!
//! Each pet owns one [`Schedule`]. The simulation only ever asks a
//! [`Scheduler`] for "call this every N", so the same roster logic runs on a
//! real tokio clock in the binary and on a virtual clock in tests.
//!
//! Everything here is single-threaded: tasks are `!Send` closures and run to
//! completion one at a time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

/// Work run on every tick of a schedule
pub type Task = Box<dyn FnMut()>;

/// Source of repeating timers
pub trait Scheduler {
    /// Run `task` every `every`, starting one period from now
    fn repeat(&self, every: Duration, task: Task) -> Schedule;
}

/// Owned handle to a running repeating task
///
/// Cancelling is idempotent and also happens on drop, so a pet's timer can
/// never outlive the pet.
pub struct Schedule {
    cancelled: Rc<Cell<bool>>,
    on_cancel: Option<Box<dyn FnOnce()>>,
}

impl Schedule {
    /// Wrap a cancellation flag shared with the running task
    pub fn new(cancelled: Rc<Cell<bool>>) -> Self {
        Self {
            cancelled,
            on_cancel: None,
        }
    }

    /// Extra teardown run once, on first cancellation
    pub fn on_cancel(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }

    pub fn cancel(&mut self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let Some(f) = self.on_cancel.take() {
            f();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl Drop for Schedule {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schedule")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// === VIRTUAL CLOCK ===

/// Deterministic scheduler driven by [`ManualScheduler::advance`]
///
/// Cloning yields another handle to the same clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

struct Entry {
    id: u64,
    every: Duration,
    due: Duration,
    cancelled: Rc<Cell<bool>>,
    /// None while the task is running
    task: Option<Task>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Schedules that have not been cancelled
    pub fn active_count(&self) -> usize {
        self.clock
            .borrow()
            .entries
            .iter()
            .filter(|e| !e.cancelled.get())
            .count()
    }

    /// Move the clock forward, firing every task that falls due
    ///
    /// Tasks fire in due-time order; ties go to the earlier registration.
    /// A task may cancel itself or any other schedule while it runs.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;

        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                clock.entries.retain(|e| !e.cancelled.get());

                let Some(index) = clock
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.task.is_some() && e.due <= target)
                    .min_by_key(|(i, e)| (e.due, *i))
                    .map(|(i, _)| i)
                else {
                    break;
                };

                let entry = &mut clock.entries[index];
                let due = entry.due;
                entry.due += entry.every;
                let fired = (entry.id, entry.cancelled.clone(), entry.task.take());
                clock.now = due;
                fired
            };

            let (id, cancelled, task) = next;
            let Some(mut task) = task else { continue };
            if !cancelled.get() {
                task();
            }

            let mut clock = self.clock.borrow_mut();
            if let Some(entry) = clock.entries.iter_mut().find(|e| e.id == id) {
                entry.task = Some(task);
            }
        }

        self.clock.borrow_mut().now = target;
    }

    /// Shorthand for advancing by whole seconds
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Scheduler for ManualScheduler {
    fn repeat(&self, every: Duration, task: Task) -> Schedule {
        // zero periods would never let the clock move
        let every = every.max(Duration::from_millis(1));
        let cancelled = Rc::new(Cell::new(false));

        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now + every;
        clock.entries.push(Entry {
            id,
            every,
            due,
            cancelled: cancelled.clone(),
            task: Some(task),
        });

        Schedule::new(cancelled)
    }
}

// === TOKIO CLOCK ===

/// Scheduler backed by `tokio::time::interval`
///
/// Tasks are spawned with `spawn_local`, so this must be used from inside a
/// `tokio::task::LocalSet`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn repeat(&self, every: Duration, mut task: Task) -> Schedule {
        let cancelled = Rc::new(Cell::new(false));
        let flag = cancelled.clone();

        let handle = tokio::task::spawn_local(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + every, every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if flag.get() {
                    break;
                }
                task();
            }
        });

        Schedule::new(cancelled).on_cancel(move || handle.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, Task) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, Box::new(move || inner.set(inner.get() + 1)))
    }

    #[test]
    fn test_fires_once_per_period() {
        let scheduler = ManualScheduler::new();
        let (count, task) = counter();
        let _schedule = scheduler.repeat(Duration::from_secs(1), task);

        scheduler.advance(Duration::from_millis(999));
        assert_eq!(count.get(), 0);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);

        scheduler.advance_secs(9);
        assert_eq!(count.get(), 10);
        assert_eq!(scheduler.now(), Duration::from_secs(10));
    }

    #[test]
    fn test_cancel_is_idempotent_and_stops_task() {
        let scheduler = ManualScheduler::new();
        let (count, task) = counter();
        let mut schedule = scheduler.repeat(Duration::from_secs(1), task);

        scheduler.advance_secs(2);
        schedule.cancel();
        schedule.cancel();
        assert!(schedule.is_cancelled());

        scheduler.advance_secs(5);
        assert_eq!(count.get(), 2);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_drop_cancels() {
        let scheduler = ManualScheduler::new();
        let (count, task) = counter();
        drop(scheduler.repeat(Duration::from_secs(1), task));

        scheduler.advance_secs(3);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_on_cancel_runs_once() {
        let (runs, mut teardown) = counter();
        let mut schedule = Schedule::new(Rc::new(Cell::new(false))).on_cancel(move || teardown());
        schedule.cancel();
        schedule.cancel();
        drop(schedule);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_ties_fire_in_registration_order() {
        let scheduler = ManualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut schedules = Vec::new();
        for label in ["a", "b", "c"] {
            let order = order.clone();
            schedules.push(scheduler.repeat(
                Duration::from_secs(1),
                Box::new(move || order.borrow_mut().push(label)),
            ));
        }

        scheduler.advance_secs(2);
        assert_eq!(*order.borrow(), vec!["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn test_task_can_cancel_another() {
        let scheduler = ManualScheduler::new();
        let (count, task) = counter();
        let victim = Rc::new(RefCell::new(Some(
            scheduler.repeat(Duration::from_secs(1), task),
        )));

        let slot = victim.clone();
        let _killer = scheduler.repeat(
            Duration::from_secs(3),
            Box::new(move || {
                slot.borrow_mut().take();
            }),
        );

        scheduler.advance_secs(10);
        // the victim fired at 1, 2 and 3 (registered first, so it wins the tie)
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_ticks_and_cancels() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let (count, task) = counter();
                let mut schedule = TokioScheduler.repeat(Duration::from_secs(1), task);

                tokio::time::sleep(Duration::from_millis(3500)).await;
                assert_eq!(count.get(), 3);

                schedule.cancel();
                tokio::time::sleep(Duration::from_secs(5)).await;
                assert_eq!(count.get(), 3);
            })
            .await;
    }
}
