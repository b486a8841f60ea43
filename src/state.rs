use crate::models::{ReminderSettings, TrackerData};
use crate::notify::{BannerNotifier, Notifier};
use crate::scheduler::SchedulerHandle;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub tracker_path: PathBuf,
    pub reminders_path: PathBuf,
    pub tracker: Arc<Mutex<TrackerData>>,
    pub reminders: Arc<Mutex<ReminderSettings>>,
    /// Delivery channel used by the scheduler.
    pub notifier: Arc<dyn Notifier>,
    /// The in-app banner queue behind `notifier`, drained by the page.
    pub banners: BannerNotifier,
    pub scheduler: Arc<Mutex<SchedulerHandle>>,
}

impl AppState {
    pub fn new(
        tracker_path: PathBuf,
        reminders_path: PathBuf,
        tracker: TrackerData,
        reminders: ReminderSettings,
    ) -> Self {
        let banners = BannerNotifier::new();
        Self {
            tracker_path,
            reminders_path,
            tracker: Arc::new(Mutex::new(tracker)),
            reminders: Arc::new(Mutex::new(reminders)),
            notifier: Arc::new(banners.clone()),
            banners,
            scheduler: Arc::new(Mutex::new(SchedulerHandle::new())),
        }
    }
}
