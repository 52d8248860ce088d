//! Timer seam for tick-driven engines.
//!
//! Engines never own a timer. A host [`Scheduler`] calls back at a fixed interval and the
//! [`Mounted`] wrapper forwards each call to [`Ticking::tick`]. Dropping or cancelling the
//! returned [`TimerHandle`] guarantees no further tick reaches the engine.

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    NoChange,
    Moved,
    /// A point, a food pellet or a cleared line.
    Scored,
    Ended,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

pub trait Ticking {
    fn tick(&mut self) -> Result<TickOutcome>;

    fn tick_interval_ms(&self) -> u32;
}

pub trait TimerHandle {
    fn cancel(self);
}

pub trait Scheduler {
    type Handle: TimerHandle;

    fn schedule_repeating(&self, interval_ms: u32, callback: Box<dyn FnMut()>) -> Self::Handle;
}

/// An engine owned by one UI session together with its running timer.
pub struct Mounted<E, S: Scheduler> {
    engine: Rc<RefCell<E>>,
    on_tick: Rc<RefCell<Box<dyn FnMut(Result<TickOutcome>)>>>,
    timer: Option<S::Handle>,
    interval_ms: u32,
}

impl<E, S> Mounted<E, S>
where
    E: Ticking + 'static,
    S: Scheduler,
{
    /// Starts ticking `engine` and reports each tick result to `on_tick`, usually a re-render.
    pub fn mount(
        engine: E,
        scheduler: &S,
        on_tick: impl FnMut(Result<TickOutcome>) + 'static,
    ) -> Self {
        let interval_ms = engine.tick_interval_ms();
        let engine = Rc::new(RefCell::new(engine));
        let on_tick: Rc<RefCell<Box<dyn FnMut(Result<TickOutcome>)>>> =
            Rc::new(RefCell::new(Box::new(on_tick)));
        let timer = Self::start_timer(scheduler, &engine, &on_tick, interval_ms);
        log::debug!("Mounted engine ticking every {} ms", interval_ms);
        Self {
            engine,
            on_tick,
            timer: Some(timer),
            interval_ms,
        }
    }

    fn start_timer(
        scheduler: &S,
        engine: &Rc<RefCell<E>>,
        on_tick: &Rc<RefCell<Box<dyn FnMut(Result<TickOutcome>)>>>,
        interval_ms: u32,
    ) -> S::Handle {
        let engine: Weak<RefCell<E>> = Rc::downgrade(engine);
        let on_tick = Rc::downgrade(on_tick);
        scheduler.schedule_repeating(
            interval_ms,
            Box::new(move || {
                let Some(engine) = engine.upgrade() else {
                    return;
                };
                // ticks never overlap, a busy engine skips this one
                let result = match engine.try_borrow_mut() {
                    Ok(mut engine) => engine.tick(),
                    Err(_) => return,
                };
                if let Some(on_tick) = on_tick.upgrade() {
                    if let Ok(mut on_tick) = on_tick.try_borrow_mut() {
                        on_tick(result);
                    }
                }
            }),
        )
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn engine(&self) -> Ref<'_, E> {
        self.engine.borrow()
    }

    pub fn with_engine<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        f(&mut self.engine.borrow_mut())
    }

    /// Replaces the timer when the engine asks for a different interval, e.g. after a level up.
    pub fn sync_interval(&mut self, scheduler: &S) -> bool {
        let wanted = self.engine.borrow().tick_interval_ms();
        if wanted == self.interval_ms || self.timer.is_none() {
            return false;
        }
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        log::debug!("Tick interval {} -> {} ms", self.interval_ms, wanted);
        self.interval_ms = wanted;
        self.timer = Some(Self::start_timer(
            scheduler,
            &self.engine,
            &self.on_tick,
            wanted,
        ));
        true
    }

    /// Cancels the timer and hands the engine back.
    pub fn unmount(mut self) -> Option<E> {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        log::debug!("Unmounted engine");
        Rc::try_unwrap(self.engine)
            .ok()
            .map(RefCell::into_inner)
    }
}

struct ManualTimer {
    id: u64,
    interval_ms: u64,
    next_due: u64,
    callback: Option<Box<dyn FnMut()>>,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Default)]
struct ManualState {
    now: u64,
    next_id: u64,
    timers: Vec<ManualTimer>,
}

/// Deterministic scheduler driven by [`ManualScheduler::advance`], for tests and headless hosts.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

pub struct ManualTimerHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle for ManualTimerHandle {
    fn cancel(self) {
        self.cancelled.set(true);
    }
}

impl Drop for ManualTimerHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    pub fn active_timers(&self) -> usize {
        self.state
            .borrow()
            .timers
            .iter()
            .filter(|timer| !timer.cancelled.get())
            .count()
    }

    /// Moves the clock forward, firing every due callback in time order.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        loop {
            let due = {
                let state = self.state.borrow();
                state
                    .timers
                    .iter()
                    .filter(|timer| !timer.cancelled.get() && timer.callback.is_some())
                    .min_by_key(|timer| (timer.next_due, timer.id))
                    .filter(|timer| timer.next_due <= target)
                    .map(|timer| timer.id)
            };
            let Some(id) = due else {
                break;
            };

            let mut callback = {
                let mut state = self.state.borrow_mut();
                let ManualState { now, timers, .. } = &mut *state;
                let Some(timer) = timers.iter_mut().find(|timer| timer.id == id) else {
                    break;
                };
                *now = timer.next_due;
                timer.next_due += timer.interval_ms;
                timer.callback.take()
            };
            if let Some(callback) = callback.as_mut() {
                callback();
            }
            if let Some(timer) = self
                .state
                .borrow_mut()
                .timers
                .iter_mut()
                .find(|timer| timer.id == id)
            {
                timer.callback = callback;
            }
        }

        let mut state = self.state.borrow_mut();
        state.now = target;
        state.timers.retain(|timer| !timer.cancelled.get());
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimerHandle;

    fn schedule_repeating(&self, interval_ms: u32, callback: Box<dyn FnMut()>) -> Self::Handle {
        let mut state = self.state.borrow_mut();
        let interval_ms = u64::from(interval_ms.max(1));
        let cancelled = Rc::new(Cell::new(false));
        let id = state.next_id;
        state.next_id += 1;
        let next_due = state.now + interval_ms;
        state.timers.push(ManualTimer {
            id,
            interval_ms,
            next_due,
            callback: Some(callback),
            cancelled: cancelled.clone(),
        });
        ManualTimerHandle { cancelled }
    }
}
