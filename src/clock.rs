use chrono::{DateTime, Utc};

/// Source of the current time. Injected wherever documents get timestamped or
/// cached data ages out, so tests can control time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use super::Clock;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Clock that only moves when told to.
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            let start = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
            Self { now: Mutex::new(start) }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::from_std(by).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}
