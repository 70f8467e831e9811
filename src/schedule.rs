use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::error::{Error, Result};

// One-shot wall-clock schedule: the next occurrence of a fixed
// hour/minute/second in local time.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    target: NaiveTime,
}

impl Schedule {
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self> {
        let target = NaiveTime::from_hms_opt(hour, minute, second).ok_or(
            Error::InvalidScheduleTime {
                hour,
                minute,
                second,
            },
        )?;
        Ok(Schedule { target })
    }

    // Target is today at the configured time, or the same time tomorrow if
    // that moment has already passed. An exact match waits zero seconds.
    pub fn delay_from(&self, now: NaiveDateTime) -> Duration {
        let mut target = now.date().and_time(self.target);
        if now > target {
            target = target + Duration::days(1);
        }
        target - now
    }

    pub async fn wait(&self) {
        let delay = self.delay_from(Local::now().naive_local());
        let seconds = delay.num_seconds();
        info!(
            "Waiting {:.2} hours until {}...",
            seconds as f64 / 3600.0,
            self.target
        );
        tokio::time::sleep(delay.to_std().unwrap_or_default()).await;
    }
}
