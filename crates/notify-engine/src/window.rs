//! Delivery-window policy.
//!
//! Hour comparisons happen in the tribunal's reference time zone, never in
//! the host zone or UTC, so a deployment region change cannot shift when
//! parties are contacted.

use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use rand::Rng;

use notify_core::config::window::WindowConfig;
use notify_core::{NotifyError, NotifyResult};

/// Permitted delivery window, `[start_hour, end_hour)` in the reference
/// zone.
#[derive(Debug, Clone)]
pub struct DeliveryWindow {
    start_hour: u32,
    end_hour: u32,
    zone: Tz,
}

impl DeliveryWindow {
    pub fn from_config(config: &WindowConfig) -> NotifyResult<Self> {
        let zone: Tz = config
            .zone
            .parse()
            .map_err(|_| NotifyError::configuration(format!("unknown time zone {}", config.zone)))?;
        if config.start_hour >= 24 || config.end_hour > 24 || config.start_hour >= config.end_hour {
            return Err(NotifyError::configuration(format!(
                "invalid delivery window {}..{}",
                config.start_hour, config.end_hour
            )));
        }
        Ok(Self {
            start_hour: config.start_hour,
            end_hour: config.end_hour,
            zone,
        })
    }

    /// Whether `now` falls outside the permitted window.
    pub fn is_out_of_hours(&self, now: DateTime<Utc>) -> bool {
        let hour = now.with_timezone(&self.zone).hour();
        hour < self.start_hour || hour >= self.end_hour
    }

    /// Next instant at which deferred delivery may fire: today at the
    /// window start if that is still ahead, otherwise tomorrow, with a
    /// uniformly random minute in `[0, 59)` so simultaneously deferred
    /// cases do not all fire in the same minute.
    pub fn next_in_hours_slot(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.zone);
        let mut date = local.date_naive();
        if local.hour() >= self.start_hour {
            date = date.succ_opt().unwrap_or(date);
        }
        let minute = rand::thread_rng().gen_range(0..59);
        let time = NaiveTime::from_hms_opt(self.start_hour, minute, 0).unwrap_or(NaiveTime::MIN);
        let naive = date.and_time(time);
        let fire = match self.zone.from_local_datetime(&naive) {
            LocalResult::Single(t) => t,
            LocalResult::Ambiguous(earliest, _) => earliest,
            // The slot fell in a spring-forward gap; take the instant an
            // hour later.
            LocalResult::None => self
                .zone
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .unwrap_or_else(|| local + Duration::days(1)),
        };
        fire.with_timezone(&Utc)
    }
}
