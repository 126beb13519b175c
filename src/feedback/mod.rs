use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::form::StatusKind;
use crate::timer::{FuturesTimer, Timer};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NotificationId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationPhase {
    Visible,
    /// Exit transition running; removed once it finishes.
    Leaving,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: StatusKind,
    pub phase: NotificationPhase,
}

impl Notification {
    /// Font Awesome glyph shown next to the message.
    pub fn icon(&self) -> &'static str {
        match self.kind {
            StatusKind::Success => "fas fa-check-circle",
            StatusKind::Error => "fas fa-exclamation-circle",
        }
    }

    /// Class list for the container, e.g. `notification notification-success`.
    pub fn class_name(&self) -> String {
        format!("notification notification-{}", self.kind.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NotificationOptions {
    /// `None` keeps notifications until closed by hand.
    pub auto_close: Option<Duration>,
    pub exit_duration: Duration,
    pub max_visible: usize,
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self {
            auto_close: Some(Duration::from_millis(5_000)),
            exit_duration: Duration::from_millis(300),
            max_visible: 5,
        }
    }
}

impl NotificationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_close(mut self, value: Option<Duration>) -> Self {
        self.auto_close = value;
        self
    }

    pub fn exit_duration(mut self, value: Duration) -> Self {
        self.exit_duration = value;
        self
    }

    pub fn max_visible(mut self, value: usize) -> Self {
        self.max_visible = value.max(1);
        self
    }
}

/// Transient floating messages, newest last.
#[derive(Clone)]
pub struct NotificationCenter {
    options: NotificationOptions,
    next_id: Arc<AtomicU64>,
    queue: Arc<RwLock<VecDeque<Notification>>>,
    timer: Arc<dyn Timer>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NotificationOptions::default())
    }
}

impl NotificationCenter {
    pub fn new(options: NotificationOptions) -> Self {
        Self::with_timer(options, FuturesTimer)
    }

    pub fn with_timer(options: NotificationOptions, timer: impl Timer) -> Self {
        Self {
            options,
            next_id: Arc::new(AtomicU64::new(0)),
            queue: Arc::new(RwLock::new(VecDeque::new())),
            timer: Arc::new(timer),
        }
    }

    pub fn options(&self) -> &NotificationOptions {
        &self.options
    }

    /// Adds a notification, dropping the oldest ones past `max_visible`.
    pub fn show(&self, message: impl Into<String>, kind: StatusKind) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut queue = self.write_queue();
        queue.push_back(Notification {
            id,
            message: message.into(),
            kind,
            phase: NotificationPhase::Visible,
        });
        while queue.len() > self.options.max_visible {
            if let Some(dropped) = queue.pop_front() {
                tracing::trace!(id = dropped.id.0, "notification dropped over limit");
            }
        }
        id
    }

    pub fn list(&self) -> Vec<Notification> {
        self.read_queue().iter().cloned().collect()
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.read_queue().iter().find(|entry| entry.id == id).cloned()
    }

    /// Starts the exit transition. Returns `false` when the notification is
    /// gone or already leaving.
    pub fn begin_dismiss(&self, id: NotificationId) -> bool {
        let mut queue = self.write_queue();
        match queue.iter_mut().find(|entry| entry.id == id) {
            Some(entry) if entry.phase == NotificationPhase::Visible => {
                entry.phase = NotificationPhase::Leaving;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&self, id: NotificationId) -> bool {
        let mut queue = self.write_queue();
        match queue.iter().position(|entry| entry.id == id) {
            Some(index) => queue.remove(index).is_some(),
            None => false,
        }
    }

    /// Close-button path: exit transition, then removal. A second call while
    /// the first is running does nothing.
    pub async fn dismiss(&self, id: NotificationId) -> bool {
        if !self.begin_dismiss(id) {
            return false;
        }
        self.timer.sleep(self.options.exit_duration).await;
        self.remove(id)
    }

    /// Waits out the auto-close delay and dismisses `id` if it is still shown.
    pub async fn auto_close(&self, id: NotificationId) -> bool {
        let Some(delay) = self.options.auto_close else {
            return false;
        };
        self.timer.sleep(delay).await;
        self.dismiss(id).await
    }

    /// Shows a notification and resolves once it has auto-closed.
    pub async fn notify(&self, message: impl Into<String>, kind: StatusKind) -> NotificationId {
        let id = self.show(message, kind);
        self.auto_close(id).await;
        id
    }

    pub fn clear(&self) {
        self.write_queue().clear();
    }

    fn read_queue(&self) -> RwLockReadGuard<'_, VecDeque<Notification>> {
        match self.queue.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_queue(&self) -> RwLockWriteGuard<'_, VecDeque<Notification>> {
        match self.queue.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("options", &self.options)
            .field("visible", &self.read_queue().len())
            .finish_non_exhaustive()
    }
}
