use chrono::{DateTime, Duration, Utc};

use crate::model::task::{Stage, Task, TaskId};

const SCAN_INTERVAL_SECS: i64 = 60;

/// Tasks sitting in Ongoing with a due date already behind `now`.
pub fn overdue_task_ids(tasks: &[Task], now: DateTime<Utc>) -> Vec<TaskId> {
    tasks
        .iter()
        .filter(|t| t.stage == Stage::Ongoing && t.due_date.is_some_and(|due| due < now))
        .map(|t| t.id)
        .collect()
}

/// Owns the displayed overdue-alert set. The presentation layer calls
/// [`poll`](OverdueMonitor::poll) from its tick and
/// [`rescan`](OverdueMonitor::rescan) after every task mutation.
///
/// Dismissal is display-only: a dismissed alert comes back on the next
/// rescan as long as the task stays overdue. Whether that is the right
/// product behavior is an open UX question; it is the observed one.
pub struct OverdueMonitor {
    interval: Duration,
    last_scan: Option<DateTime<Utc>>,
    alerts: Vec<TaskId>,
}

impl OverdueMonitor {
    pub fn new() -> Self {
        Self::with_interval(Duration::seconds(SCAN_INTERVAL_SECS))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_scan: None,
            alerts: Vec::new(),
        }
    }

    /// Rescans on the first call and whenever the interval has elapsed
    /// since the last scan. Returns whether a scan ran.
    pub fn poll(&mut self, tasks: &[Task], now: DateTime<Utc>) -> bool {
        let due = match self.last_scan {
            None => true,
            Some(last) => now - last >= self.interval,
        };
        if due {
            self.rescan(tasks, now);
        }
        due
    }

    /// Rebuilds the alert set from scratch, forgetting any dismissals.
    pub fn rescan(&mut self, tasks: &[Task], now: DateTime<Utc>) {
        self.alerts = overdue_task_ids(tasks, now);
        self.last_scan = Some(now);
    }

    /// Hides one alert until the next rescan. The task itself is untouched.
    pub fn dismiss(&mut self, id: TaskId) {
        self.alerts.retain(|alert| *alert != id);
    }

    pub fn alerts(&self) -> &[TaskId] {
        &self.alerts
    }
}

impl Default for OverdueMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn task(stage: Stage, due: Option<DateTime<Utc>>) -> Task {
        let mut task = Task::new("t".to_string(), String::new(), due);
        task.stage = stage;
        task
    }

    #[test]
    fn scan_flags_ongoing_tasks_past_due() {
        let now = anchor();
        let overdue = task(Stage::Ongoing, Some(now - Duration::hours(1)));
        let future = task(Stage::Ongoing, Some(now + Duration::hours(1)));
        let no_due = task(Stage::Ongoing, None);
        let done = task(Stage::Done, Some(now - Duration::hours(1)));
        let fresh = task(Stage::New, Some(now - Duration::hours(1)));

        let tasks = vec![overdue.clone(), future, no_due, done, fresh];
        assert_eq!(overdue_task_ids(&tasks, now), vec![overdue.id]);
    }

    #[test]
    fn moving_to_done_clears_the_flag_on_next_scan() {
        let now = anchor();
        let mut flagged = task(Stage::Ongoing, Some(now - Duration::hours(1)));
        let tasks = vec![flagged.clone()];

        let mut monitor = OverdueMonitor::new();
        monitor.rescan(&tasks, now);
        assert_eq!(monitor.alerts(), &[flagged.id]);

        flagged.stage = Stage::Done;
        monitor.rescan(&[flagged], now + Duration::seconds(1));
        assert!(monitor.alerts().is_empty());
    }

    #[test]
    fn poll_scans_immediately_then_respects_the_interval() {
        let now = anchor();
        let tasks = vec![task(Stage::Ongoing, Some(now - Duration::hours(1)))];
        let mut monitor = OverdueMonitor::new();

        assert!(monitor.poll(&tasks, now));
        assert!(!monitor.poll(&tasks, now + Duration::seconds(30)));
        assert!(monitor.poll(&tasks, now + Duration::seconds(60)));
    }

    #[test]
    fn dismissal_is_ephemeral() {
        let now = anchor();
        let flagged = task(Stage::Ongoing, Some(now - Duration::hours(1)));
        let tasks = vec![flagged.clone()];

        let mut monitor = OverdueMonitor::new();
        monitor.rescan(&tasks, now);
        monitor.dismiss(flagged.id);
        assert!(monitor.alerts().is_empty());

        // Still overdue, so the banner comes back on the next scan.
        monitor.rescan(&tasks, now + Duration::seconds(60));
        assert_eq!(monitor.alerts(), &[flagged.id]);
    }

    #[test]
    fn dismissing_an_unknown_id_is_harmless() {
        let mut monitor = OverdueMonitor::new();
        monitor.dismiss(uuid::Uuid::new_v4());
        assert!(monitor.alerts().is_empty());
    }
}
