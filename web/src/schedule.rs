use gloo::timers::callback::Interval;
use retrodesk_core::{Mounted, Result, Scheduler, TickOutcome, Ticking, TimerHandle};
use std::cell::Ref;
use yew::html::Scope;
use yew::Component;

use crate::utils::HasUpdate;

/// Browser timers through `setInterval`.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct GlooScheduler;

pub(crate) struct IntervalHandle(Interval);

impl TimerHandle for IntervalHandle {
    fn cancel(self) {
        // dropping the interval clears it
        drop(self.0);
    }
}

impl Scheduler for GlooScheduler {
    type Handle = IntervalHandle;

    fn schedule_repeating(&self, interval_ms: u32, mut callback: Box<dyn FnMut()>) -> Self::Handle {
        IntervalHandle(Interval::new(interval_ms, move || callback()))
    }
}

/// A tick-driven engine mounted for one component. Each tick that changes something sends
/// `on_change` to the component.
pub(crate) struct TickDriver<E: Ticking + 'static> {
    mounted: Option<Mounted<E, GlooScheduler>>,
}

impl<E: Ticking + 'static> TickDriver<E> {
    pub(crate) fn start<C>(engine: E, link: &Scope<C>, on_change: C::Message) -> Self
    where
        C: Component,
        C::Message: Clone,
    {
        let link = link.clone();
        let mounted = Mounted::mount(engine, &GlooScheduler, move |result: Result<TickOutcome>| {
            if result.has_update() {
                link.send_message(on_change.clone());
            }
        });
        Self {
            mounted: Some(mounted),
        }
    }

    pub(crate) fn engine(&self) -> Option<Ref<'_, E>> {
        self.mounted.as_ref().map(Mounted::engine)
    }

    pub(crate) fn with_engine<R>(&self, f: impl FnOnce(&mut E) -> R) -> Option<R> {
        self.mounted.as_ref().map(|mounted| mounted.with_engine(f))
    }

    /// Follows interval changes, e.g. faster gravity after a level up.
    pub(crate) fn sync_interval(&mut self) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.sync_interval(&GlooScheduler);
        }
    }

    pub(crate) fn stop(&mut self) -> Option<E> {
        self.mounted.take().and_then(Mounted::unmount)
    }
}

impl<E: Ticking + 'static> Drop for TickDriver<E> {
    fn drop(&mut self) {
        self.stop();
    }
}
