//! Roll overlay: a transient display for roll events.
//!
//! Each event is shown masked on arrival, revealed after [`REVEAL_AFTER`]
//! and dismissed after [`DISMISS_AFTER`], both measured from its own
//! arrival. A newer event cancels the pending timers of the older one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use tiandao_shared::RollEvent;

use crate::infrastructure::messaging::EventBus;
use crate::ports::outbound::{PlayerEvent, RollOverlayView};

pub const REVEAL_AFTER: Duration = Duration::from_millis(1_000);
pub const DISMISS_AFTER: Duration = Duration::from_millis(3_000);

/// The running reveal/dismiss cycle. Bumping `generation` retires it even if
/// its task is already past the abort point.
#[derive(Default)]
struct Cycle {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    view: watch::Sender<RollOverlayView>,
    cycle: Mutex<Cycle>,
    events: EventBus,
}

impl Inner {
    async fn publish(&self, view: RollOverlayView) {
        self.view.send_replace(view.clone());
        self.events.dispatch(PlayerEvent::RollOverlay(view)).await;
    }

    /// Publish a timed step unless a newer event has started its own cycle.
    async fn step(&self, generation: u64, view: RollOverlayView) -> bool {
        let cycle = self.cycle.lock().await;
        if cycle.generation != generation {
            return false;
        }
        self.publish(view).await;
        true
    }
}

#[derive(Clone)]
pub struct RollOverlay {
    inner: Arc<Inner>,
}

impl RollOverlay {
    pub fn new(events: EventBus) -> Self {
        let (view, _) = watch::channel(RollOverlayView::dismissed());
        Self {
            inner: Arc::new(Inner {
                view,
                cycle: Mutex::new(Cycle::default()),
                events,
            }),
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> RollOverlayView {
        self.inner.view.borrow().clone()
    }

    pub async fn deliver(&self, event: RollEvent) {
        let mut cycle = self.inner.cycle.lock().await;
        cycle.generation += 1;
        if let Some(previous) = cycle.timer.take() {
            previous.abort();
        }

        tracing::debug!(kind = %event.kind, "Roll event masked");
        self.inner.publish(RollOverlayView::masked(event.clone())).await;

        let inner = Arc::clone(&self.inner);
        let generation = cycle.generation;
        cycle.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(REVEAL_AFTER).await;
            if !inner.step(generation, RollOverlayView::revealed(event)).await {
                return;
            }

            tokio::time::sleep(DISMISS_AFTER - REVEAL_AFTER).await;
            inner.step(generation, RollOverlayView::dismissed()).await;
        }));
    }
}
