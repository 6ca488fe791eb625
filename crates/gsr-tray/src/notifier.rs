//! User-facing notifications.
//!
//! The sink is chosen once at startup: desktop notifications over D-Bus when
//! a notification server answers, otherwise the log.

use std::{sync::Arc, time::Duration};

use notify_rust::{Notification, Timeout};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Application name shown by the notification server.
pub const APP_NAME: &str = "GPU Screen Recorder";

/// Title of every notification.
pub const TITLE: &str = APP_NAME;

/// Freedesktop icon name.
pub const ICON: &str = "media-record";

/// How long ordinary notifications stay visible.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// How long the "Replay saved" notification stays visible.
pub const REPLAY_SAVED_TIMEOUT: Duration = Duration::from_millis(5000);

/// A notification sink. Failures are logged, never returned.
pub trait Notifier: Send + Sync {
    /// Show `message` under `title` for roughly `timeout`.
    fn notify(&self, title: &str, message: &str, timeout: Duration);

    /// Sink name for logs.
    fn name(&self) -> &'static str;
}

/// Desktop notifications via `org.freedesktop.Notifications`.
///
/// Each call is a blocking D-Bus round trip.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str, timeout: Duration) {
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);

        let result = Notification::new()
            .appname(APP_NAME)
            .summary(title)
            .body(message)
            .icon(ICON)
            .timeout(Timeout::Milliseconds(millis))
            .show();

        if let Err(e) = result {
            warn!(error = %e, "Desktop notification failed");
            LogNotifier.notify(title, message, timeout);
        }
    }

    fn name(&self) -> &'static str {
        "desktop"
    }
}

/// Hands each notification to a blocking task so a slow sink never stalls
/// the caller's runtime thread.
///
/// Outside a tokio runtime the inner sink is called inline.
pub struct BackgroundNotifier<N> {
    inner: Arc<N>,
}

impl<N: Notifier + 'static> BackgroundNotifier<N> {
    /// Wrap `inner`.
    pub fn new(inner: N) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<N: Notifier + 'static> Notifier for BackgroundNotifier<N> {
    fn notify(&self, title: &str, message: &str, timeout: Duration) {
        let Ok(handle) = Handle::try_current() else {
            debug!("No runtime, notifying inline");
            self.inner.notify(title, message, timeout);
            return;
        };

        let inner = Arc::clone(&self.inner);
        let title = title.to_string();
        let message = message.to_string();
        handle.spawn_blocking(move || inner.notify(&title, &message, timeout));
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str, timeout: Duration) {
        info!(
            target: "notification",
            title,
            message,
            timeout_ms = timeout.as_millis(),
            "Notification"
        );
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Pick the notification sink for this desktop session.
pub fn probe() -> Box<dyn Notifier> {
    let notifier: Box<dyn Notifier> = if desktop_notifications_available() {
        Box::new(BackgroundNotifier::new(DesktopNotifier))
    } else {
        Box::new(LogNotifier)
    };

    info!(notifier = notifier.name(), "Notification sink selected");

    notifier
}

#[cfg(all(unix, not(target_os = "macos")))]
fn desktop_notifications_available() -> bool {
    match notify_rust::get_server_information() {
        Ok(server) => {
            info!(server = %server.name, version = %server.version, "Notification server found");
            true
        }
        Err(e) => {
            warn!(error = %e, "No notification server, notifications go to the log");
            false
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn desktop_notifications_available() -> bool {
    true
}
