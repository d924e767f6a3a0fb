use super::Dispatcher;
use crate::time::{format_date, get_server_time_now, localize, ServerTime};
use std::sync::Arc;
use std::time::Duration;
use chrono::{Days, NaiveTime};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// A time of day in a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub at: NaiveTime,
    pub timezone: Tz,
}

impl DailySchedule {
    /// The first time strictly after `now` this schedule runs. A time skipped by a clock change
    /// runs at the first valid instant after it.
    pub fn next_run_after(&self, now: &ServerTime) -> ServerTime {
        let today = now.with_timezone(&self.timezone).date_naive();
        let next = localize(today.and_time(self.at), &self.timezone);

        if next > *now {
            return next;
        }

        match today.checked_add_days(Days::new(1)) {
            Some(tomorrow) => localize(tomorrow.and_time(self.at), &self.timezone),
            None => next,
        }
    }
}

/// Spawns the scheduled checks: once after `startup_delay`, then daily on `schedule`.
pub fn start_scheduler(
    dispatcher: Arc<Dispatcher>,
    schedule: DailySchedule,
    startup_delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let startup = async {
            sleep(startup_delay).await;
            log::info!("Running startup check");
            dispatcher.run_scheduled_check().await;
        };
        let daily = async {
            loop {
                let now = get_server_time_now();
                let next = schedule.next_run_after(&now);
                let wait = (next - now).to_std()
                    .unwrap_or_default();

                log::info!("Next scheduled check at {} {}", format_date(&next, &schedule.timezone), schedule.timezone.name());
                sleep(wait).await;
                dispatcher.run_scheduled_check().await;
            }
        };

        tokio::join!(startup, daily);
    })
}
