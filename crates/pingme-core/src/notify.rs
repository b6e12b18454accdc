//! Desktop notifications.
//!
//! Notification delivery is best-effort, same as audio cues: a failure to
//! reach the notification daemon is logged and the cycle proceeds.

use crate::config::NotificationConfig;
use crate::error::NotifyError;

/// Raises the per-cycle desktop notification.
pub trait Notifier {
    /// Best-effort: implementations log failures instead of returning them.
    fn notify(&self, config: &NotificationConfig);
}

/// notify-rust backed notifier.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn show(config: &NotificationConfig) -> Result<(), NotifyError> {
        let timeout_ms =
            u32::try_from(config.timeout_secs.saturating_mul(1000)).unwrap_or(u32::MAX);
        notify_rust::Notification::new()
            .summary(&config.title)
            .body(&config.message)
            .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::ShowFailed(e.to_string()))
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, config: &NotificationConfig) {
        if let Err(e) = Self::show(config) {
            log::warn!("desktop notification failed: {e}");
        }
    }
}
