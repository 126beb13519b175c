use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::timer::Timer;

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(2_000);

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("delivery rejected: {0}")]
    Rejected(String),
    #[error("delivery unavailable: {0}")]
    Unavailable(String),
}

pub type BoxedSubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send + 'a>>;

/// Delivers a validated snapshot somewhere. This is the integration point for
/// a real backend; the crate only ships [`SimulatedTransport`].
pub trait SubmitTransport<T>: Send + Sync + 'static {
    fn send<'a>(&'a self, model: &'a T) -> BoxedSubmitFuture<'a>;
}

impl<T, F> SubmitTransport<T> for F
where
    F: for<'a> Fn(&'a T) -> BoxedSubmitFuture<'a> + Send + Sync + 'static,
{
    fn send<'a>(&'a self, model: &'a T) -> BoxedSubmitFuture<'a> {
        (self)(model)
    }
}

/// Stand-in for delivery: waits a fixed delay and always succeeds. No request
/// leaves the process.
#[derive(Clone)]
pub struct SimulatedTransport {
    delay: Duration,
    timer: Arc<dyn Timer>,
}

impl SimulatedTransport {
    pub fn new(timer: impl Timer) -> Self {
        Self {
            delay: DEFAULT_SIMULATED_DELAY,
            timer: Arc::new(timer),
        }
    }

    pub fn delay(mut self, value: Duration) -> Self {
        self.delay = value;
        self
    }
}

impl std::fmt::Debug for SimulatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedTransport")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl<T> SubmitTransport<T> for SimulatedTransport
where
    T: Sync,
{
    fn send<'a>(&'a self, _model: &'a T) -> BoxedSubmitFuture<'a> {
        let sleep = self.timer.sleep(self.delay);
        Box::pin(async move {
            sleep.await;
            tracing::debug!(delay_ms = self.delay.as_millis() as u64, "simulated delivery finished");
            Ok(())
        })
    }
}
