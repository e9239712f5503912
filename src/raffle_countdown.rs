use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::utils::format_time_unit;

const TICK: Duration = Duration::from_secs(1);

/// Source of the current unix time in seconds
pub trait UnixClock: Send + Sync + 'static {
    fn now(&self) -> u64;
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl UnixClock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Time left until the next draw
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Only true once loaded inputs say the draw time has passed
    pub is_expired: bool,
}

impl CountdownState {
    /// Derive the countdown at `now`. Unset inputs give the zero state, not
    /// an expired one.
    pub fn derive(last_time_stamp: Option<u64>, interval: Option<u64>, now: u64) -> Self {
        let (Some(last_time_stamp), Some(interval)) = (last_time_stamp, interval) else {
            return Self::default();
        };

        let next_draw = last_time_stamp.saturating_add(interval);
        let remaining = next_draw.saturating_sub(now);
        Self::from_remaining(remaining)
    }

    pub fn from_remaining(remaining: u64) -> Self {
        Self {
            hours: remaining / 3600,
            minutes: (remaining % 3600) / 60,
            seconds: remaining % 60,
            is_expired: remaining == 0,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            format_time_unit(self.hours),
            format_time_unit(self.minutes),
            format_time_unit(self.seconds)
        )
    }
}

/// A 1 Hz countdown. The ticker task is aborted when this handle is dropped.
pub struct Countdown {
    clock: Arc<dyn UnixClock>,
    schedule: Option<(u64, u64)>,
    sender: Arc<watch::Sender<CountdownState>>,
    receiver: watch::Receiver<CountdownState>,
    ticker: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Starts ticking if both inputs are present
    pub fn start(clock: Arc<dyn UnixClock>, last_time_stamp: Option<u64>, interval: Option<u64>) -> Self {
        let initial = CountdownState::derive(last_time_stamp, interval, clock.now());
        let (sender, receiver) = watch::channel(initial);
        let mut countdown = Self {
            clock,
            schedule: None,
            sender: Arc::new(sender),
            receiver,
            ticker: None,
        };
        countdown.retarget(last_time_stamp, interval);
        countdown
    }

    /// Point the countdown at new inputs, replacing the running ticker
    pub fn retarget(&mut self, last_time_stamp: Option<u64>, interval: Option<u64>) {
        let schedule = last_time_stamp.zip(interval);
        if schedule == self.schedule && (self.ticker.is_some() || schedule.is_none()) {
            return;
        }
        self.stop();
        self.schedule = schedule;

        let state = CountdownState::derive(last_time_stamp, interval, self.clock.now());
        self.sender.send_if_modified(|current| replace_if_changed(current, state));

        let Some((last_time_stamp, interval)) = schedule else {
            return;
        };
        let clock = Arc::clone(&self.clock);
        let sender = Arc::clone(&self.sender);
        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let state = CountdownState::derive(Some(last_time_stamp), Some(interval), clock.now());
                sender.send_if_modified(|current| replace_if_changed(current, state));
            }
        }));
    }

    pub fn current(&self) -> CountdownState {
        *self.receiver.borrow()
    }

    /// Receiver that sees every change; closes once the countdown is dropped
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.receiver.clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

fn replace_if_changed(current: &mut CountdownState, next: CountdownState) -> bool {
    if *current == next {
        return false;
    }
    *current = next;
    true
}
