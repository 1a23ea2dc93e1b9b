//! Notification center for transient user-facing messages.
//!
//! Producers hold a `&mut dyn Notifier` and fire notifications without
//! waiting on them. The TUI owns a [`NotificationCenter`] that keeps active
//! notifications until their deadline passes or they are dismissed; the CLI
//! uses [`LogNotifier`], which only logs.

use std::fmt;
use std::time::{Duration, Instant};

/// Display duration used when a notification does not set its own.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// An action completed.
    Success,
    /// An action failed.
    Error,
    /// Neutral information.
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// A message to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Text shown to the user.
    pub message: String,
    /// How long to show it. `None` uses the center's default;
    /// `Some(Duration::ZERO)` keeps it until dismissed.
    pub duration: Option<Duration>,
}

impl Notification {
    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: None,
        }
    }

    /// Informational notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    /// Success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    /// Error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    /// Sets an explicit display duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Keeps the notification until it is dismissed.
    pub fn sticky(self) -> Self {
        self.with_duration(Duration::ZERO)
    }
}

/// Handle returned by [`Notifier::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

/// Sink for notifications.
pub trait Notifier {
    /// Shows a notification and returns its handle.
    fn show(&mut self, notification: Notification) -> NotificationId;

    /// Dismisses a notification. Unknown handles are ignored.
    fn dismiss(&mut self, id: NotificationId);
}

/// A notification currently on screen.
#[derive(Debug, Clone)]
pub struct ActiveNotification {
    /// Handle.
    pub id: NotificationId,
    /// The notification itself.
    pub notification: Notification,
    /// When it expires; `None` for sticky notifications.
    pub deadline: Option<Instant>,
}

/// Keeps active notifications and expires them by deadline.
#[derive(Debug)]
pub struct NotificationCenter {
    default_duration: Duration,
    next_id: u64,
    active: Vec<ActiveNotification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_DURATION)
    }
}

impl NotificationCenter {
    /// Creates an empty center.
    pub fn new(default_duration: Duration) -> Self {
        Self {
            default_duration,
            next_id: 0,
            active: Vec::new(),
        }
    }

    /// Active notifications, oldest first.
    pub fn active(&self) -> &[ActiveNotification] {
        &self.active
    }

    /// Shows a notification starting at `now`.
    pub fn show_at(&mut self, notification: Notification, now: Instant) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        let duration = notification.duration.unwrap_or(self.default_duration);
        // An unrepresentable deadline never arrives, so treat it as sticky.
        let deadline = if duration.is_zero() {
            None
        } else {
            now.checked_add(duration)
        };
        tracing::debug!("notification {:?} [{}]: {}", id, notification.kind, notification.message);
        self.active.push(ActiveNotification {
            id,
            notification,
            deadline,
        });
        id
    }

    /// Drops notifications whose deadline is at or before `now`.
    ///
    /// Returns the number removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active
            .retain(|n| n.deadline.map_or(true, |deadline| deadline > now));
        before - self.active.len()
    }
}

impl Notifier for NotificationCenter {
    fn show(&mut self, notification: Notification) -> NotificationId {
        self.show_at(notification, Instant::now())
    }

    fn dismiss(&mut self, id: NotificationId) {
        self.active.retain(|n| n.id != id);
    }
}

/// Notifier that writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier {
    next_id: u64,
}

impl Notifier for LogNotifier {
    fn show(&mut self, notification: Notification) -> NotificationId {
        self.next_id += 1;
        match notification.kind {
            NotificationKind::Error => tracing::warn!("{}", notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!("{}", notification.message)
            }
        }
        NotificationId(self.next_id)
    }

    fn dismiss(&mut self, _id: NotificationId) {}
}
