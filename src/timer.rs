use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_timer::Delay;

pub type BoxedDelay = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// The one suspension primitive used by every timed behavior in the crate.
///
/// Implementations schedule a continuation and return control to the event
/// loop; the returned future resolves once `duration` has elapsed.
pub trait Timer: Send + Sync + 'static {
    fn sleep(&self, duration: Duration) -> BoxedDelay;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FuturesTimer;

impl Timer for FuturesTimer {
    fn sleep(&self, duration: Duration) -> BoxedDelay {
        Box::pin(Delay::new(duration))
    }
}

/// Resolves immediately and keeps a log of requested durations, so callers can
/// assert on simulated time.
#[derive(Clone, Debug, Default)]
pub struct InstantTimer {
    requested: Arc<Mutex<Vec<Duration>>>,
}

impl InstantTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> Vec<Duration> {
        match self.requested.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.requested().into_iter().sum()
    }
}

impl Timer for InstantTimer {
    fn sleep(&self, duration: Duration) -> BoxedDelay {
        match self.requested.lock() {
            Ok(mut guard) => guard.push(duration),
            Err(poisoned) => poisoned.into_inner().push(duration),
        }
        Box::pin(std::future::ready(()))
    }
}

impl<T> Timer for Arc<T>
where
    T: Timer + ?Sized,
{
    fn sleep(&self, duration: Duration) -> BoxedDelay {
        (**self).sleep(duration)
    }
}
