use chrono::Local;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Delivery channel for reminder alerts. Fire-and-forget: implementations
/// must swallow their own failures rather than surface them to the tick loop.
pub trait Notifier: Send + Sync {
    fn deliver(&self, title: &str, body: &str);
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub title: String,
    pub body: String,
    /// Local instant "%Y-%m-%dT%H:%M:%S".
    pub at: String,
}

/// In-app banner queue, drained by the page via `GET /api/notifications`.
/// This is the lowest-common-denominator channel; the page itself can
/// escalate to OS notifications when permission was granted.
#[derive(Clone, Default)]
pub struct BannerNotifier {
    banners: Arc<Mutex<Vec<Banner>>>,
}

impl BannerNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Banner> {
        match self.banners.lock() {
            Ok(mut banners) => std::mem::take(&mut *banners),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for BannerNotifier {
    fn deliver(&self, title: &str, body: &str) {
        info!("notification: {title}: {body}");
        let banner = Banner {
            title: title.to_string(),
            body: body.to_string(),
            at: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
        };
        match self.banners.lock() {
            Ok(mut banners) => banners.push(banner),
            Err(poisoned) => poisoned.into_inner().push(banner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banners_queue_and_drain_once() {
        let notifier = BannerNotifier::new();
        notifier.deliver("Reminder", "drink up");
        notifier.deliver("Reminder", "again");

        let drained = notifier.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].body, "drink up");

        assert!(notifier.drain().is_empty());
    }
}
