use std::time::Duration;

use crate::engine::core::error::{StateMachine, WalkthroughError};
use crate::engine::core::scheduler::{ActionHandle, ActionScheduler, SceneScope};

struct CarouselItem<T> {
    value: T,
    loaded: bool,
}

/// Cyclic display over a fixed item list.
///
/// Inactive until explicitly activated with every item loaded. While active
/// a repeating scheduler entry advances the index; deactivating cancels it.
pub struct Carousel<T> {
    items: Vec<CarouselItem<T>>,
    index: usize,
    interval: Option<ActionHandle>,
}

impl<T> Carousel<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|value| CarouselItem {
                    value,
                    loaded: false,
                })
                .collect(),
            index: 0,
            interval: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    pub fn all_loaded(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.loaded)
    }

    /// Re-evaluate which items are ready.
    pub fn refresh_loaded(&mut self, is_loaded: impl Fn(&T) -> bool) {
        for item in &mut self.items {
            item.loaded = is_loaded(&item.value);
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The item on screen, `None` while inactive.
    pub fn displayed(&self) -> Option<&T> {
        if !self.is_active() {
            return None;
        }
        self.items.get(self.index).map(|item| &item.value)
    }

    /// Show the first item and start the advance interval.
    pub fn activate<A: Clone>(
        &mut self,
        scheduler: &mut ActionScheduler<A>,
        interval: Duration,
        advance: A,
    ) -> Result<&T, WalkthroughError> {
        if self.is_active() {
            return Err(WalkthroughError::invalid(
                StateMachine::Carousel,
                "Active",
                "activate",
            ));
        }
        if !self.all_loaded() {
            return Err(WalkthroughError::invalid(
                StateMachine::Carousel,
                "Loading",
                "activate",
            ));
        }

        self.index = 0;
        self.interval = Some(scheduler.schedule_repeating(
            "carousel advance",
            SceneScope::Exhibit,
            interval,
            advance,
        ));
        Ok(&self.items[0].value)
    }

    /// Step to the next item, wrapping. Ignored while inactive.
    pub fn advance(&mut self) -> Option<&T> {
        if !self.is_active() {
            return None;
        }
        self.index = (self.index + 1) % self.items.len();
        Some(&self.items[self.index].value)
    }

    /// Stop the interval and clear the display. Returns `false` if already inactive.
    pub fn deactivate<A: Clone>(&mut self, scheduler: &mut ActionScheduler<A>) -> bool {
        let Some(handle) = self.interval.take() else {
            return false;
        };
        scheduler.cancel(handle);
        self.index = 0;
        true
    }
}
