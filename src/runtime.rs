use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// How often a host loop should poll for due timers when idle.
pub const TICK_RATE_MS: u64 = 100;

const MIN_TIMER_INTERVAL: Duration = Duration::from_millis(1);

/// Most firings a single timer reports from one poll after a long stall.
pub const MAX_CATCH_UP: u32 = 3600;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

/// Identifies one repeating timer registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Repeating timer registry.
///
/// Firings are not delivered by callback: the host collects them with
/// [`Scheduler::due`] and feeds each handle back into the session, which keeps
/// all mutation on the caller's thread.
pub trait Scheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle;
    /// Repeating timer that retires itself after `times` firings.
    fn schedule_times(&mut self, interval: Duration, times: u32) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
    /// Drains the firings that are due, oldest first.
    fn due(&mut self) -> Vec<TimerHandle>;
}

#[derive(Debug)]
struct Timer {
    handle: TimerHandle,
    interval: Duration,
    next_due: Instant,
    remaining: Option<u32>,
}

/// Wall-clock driven scheduler for real hosts.
#[derive(Debug)]
pub struct IntervalScheduler<K: Clock = SystemClock> {
    clock: K,
    timers: Vec<Timer>,
    next_id: u64,
}

impl IntervalScheduler<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for IntervalScheduler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clock> IntervalScheduler<K> {
    pub fn with_clock(clock: K) -> Self {
        Self {
            clock,
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Earliest instant any active timer fires.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.next_due).min()
    }

    /// How long a host may block before the next firing, capped at `max`.
    pub fn time_until_next(&self, max: Duration) -> Duration {
        match self.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(self.clock.now()).min(max),
            None => max,
        }
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn register(&mut self, interval: Duration, remaining: Option<u32>) -> TimerHandle {
        let interval = interval.max(MIN_TIMER_INTERVAL);
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            interval,
            next_due: self.clock.now() + interval,
            remaining,
        });
        tracing::debug!(?handle, ?interval, ?remaining, "timer scheduled");
        handle
    }
}

impl<K: Clock> Scheduler for IntervalScheduler<K> {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        self.register(interval, None)
    }

    fn schedule_times(&mut self, interval: Duration, times: u32) -> TimerHandle {
        self.register(interval, Some(times))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
        tracing::debug!(?handle, "timer cancelled");
    }

    /// Missed periods are replayed, but never more than the timer has firings
    /// left or [`MAX_CATCH_UP`] per poll; the rest are skipped.
    fn due(&mut self) -> Vec<TimerHandle> {
        let now = self.clock.now();
        let mut fired: Vec<(Instant, TimerHandle)> = Vec::new();
        for timer in &mut self.timers {
            if timer.next_due > now {
                continue;
            }
            let behind = now.duration_since(timer.next_due);
            let interval_nanos = timer.interval.as_nanos();
            let missed =
                u64::try_from(behind.as_nanos() / interval_nanos + 1).unwrap_or(u64::MAX);
            let mut count = u32::try_from(missed).unwrap_or(u32::MAX).min(MAX_CATCH_UP);
            if let Some(remaining) = timer.remaining.as_mut() {
                count = count.min(*remaining);
                *remaining -= count;
            }
            if u64::from(count) < missed {
                tracing::debug!(handle = ?timer.handle, missed, count, "skipping missed firings");
            }
            fired.extend(
                (0..count).map(|k| (timer.next_due + timer.interval * k, timer.handle)),
            );

            let phase = behind.as_nanos() % interval_nanos;
            timer.next_due = now - Duration::from_nanos(phase as u64) + timer.interval;
        }
        self.timers.retain(|t| t.remaining != Some(0));
        fired.sort_by_key(|(at, _)| *at);
        fired.into_iter().map(|(_, handle)| handle).collect()
    }
}

/// Scheduler for tests: nothing fires until [`ManualScheduler::trigger`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    active: Vec<TimerHandle>,
    cancelled: Vec<TimerHandle>,
    pending: Vec<TimerHandle>,
    next_id: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `times` firings of `handle`. Firings of inactive handles are
    /// still delivered so stale-timer handling can be exercised.
    pub fn trigger(&mut self, handle: TimerHandle, times: usize) {
        self.pending.extend(std::iter::repeat(handle).take(times));
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.active.contains(&handle)
    }

    pub fn active(&self) -> &[TimerHandle] {
        &self.active
    }

    pub fn cancelled(&self) -> &[TimerHandle] {
        &self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, _interval: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.active.push(handle);
        handle
    }

    fn schedule_times(&mut self, interval: Duration, _times: u32) -> TimerHandle {
        self.schedule_repeating(interval)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.active.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }

    fn due(&mut self) -> Vec<TimerHandle> {
        std::mem::take(&mut self.pending)
    }
}

/// Event delivered by a host shell to the trainer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// Full contents of the input field.
    Input(String),
    Stop,
    /// Nothing arrived within the tick interval; poll timers.
    Tick,
}

/// Source of host events (keyboard, buttons, ...)
pub trait EventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError>;
}

/// Event source fed through a channel, e.g. from an input thread.
pub struct ChannelEventSource {
    rx: Receiver<HostEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<HostEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Advances the host one event at a time.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> HostEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => HostEvent::Tick,
        }
    }
}
