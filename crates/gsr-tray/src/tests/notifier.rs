use crate::notifier::{BackgroundNotifier, LogNotifier, Notifier};

#[cfg(unix)]
use crate::tests::app::RecordingNotifier;

use std::{
    sync::{Arc, Condvar, Mutex},
    time::{Duration, Instant},
};

/// Longest a gated notification waits before giving up.
const GATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocks every notification until [`GatedNotifier::open`] is called.
#[cfg(unix)]
#[derive(Clone, Default)]
pub(super) struct GatedNotifier {
    gate: Arc<(Mutex<bool>, Condvar)>,
    delivered: RecordingNotifier,
}

#[cfg(unix)]
impl GatedNotifier {
    pub(super) fn open(&self) {
        let (open, condvar) = &*self.gate;
        *open.lock().unwrap_or_else(|e| e.into_inner()) = true;
        condvar.notify_all();
    }

    pub(super) fn delivered(&self) -> &RecordingNotifier {
        &self.delivered
    }

    /// Wait until `count` notifications got through.
    pub(super) async fn wait_for(&self, count: usize, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if self.delivered.messages().len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

#[cfg(unix)]
impl Notifier for GatedNotifier {
    fn notify(&self, title: &str, message: &str, timeout: Duration) {
        let (open, condvar) = &*self.gate;
        let guard = open.lock().unwrap_or_else(|e| e.into_inner());
        let _guard = condvar
            .wait_timeout_while(guard, GATE_TIMEOUT, |open| !*open)
            .unwrap_or_else(|e| e.into_inner());
        self.delivered.notify(title, message, timeout);
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

/// WHAT: Background delivery returns before the sink finishes
/// WHY: Notification servers can stall on D-Bus
#[cfg(unix)]
#[tokio::test]
async fn given_blocking_sink_when_notifying_in_background_then_returns_immediately() {
    // Given: A closed gate behind a background notifier
    let gated = GatedNotifier::default();
    let notifier = BackgroundNotifier::new(gated.clone());

    // When: Notifying
    let started = Instant::now();
    notifier.notify("GPU Screen Recorder", "Replay saved", Duration::from_secs(5));

    // Then: The call did not wait for the sink
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(gated.delivered().messages().is_empty());

    // And: The message is delivered once the sink unblocks
    gated.open();
    assert!(gated.wait_for(1, Duration::from_secs(5)).await);
    assert_eq!(gated.delivered().messages(), vec!["Replay saved"]);
}

/// WHAT: Without a runtime the inner sink is called inline
/// WHY: CLI commands notify from plain threads
#[cfg(unix)]
#[test]
fn given_no_runtime_when_notifying_in_background_then_delivered_inline() {
    let delivered = RecordingNotifier::default();
    let notifier = BackgroundNotifier::new(delivered.clone());

    notifier.notify("GPU Screen Recorder", "Recording started", Duration::from_secs(3));

    assert_eq!(delivered.messages(), vec!["Recording started"]);
}

/// WHAT: The wrapper reports the inner sink's name
/// WHY: The startup log names the selected sink
#[test]
fn given_log_sink_when_wrapped_then_name_is_inner_name() {
    let notifier = BackgroundNotifier::new(LogNotifier);

    assert_eq!(notifier.name(), "log");
}
