//! Per-song practice stopwatches.
//!
//! A running stopwatch owns a ticker thread that bumps its elapsed seconds
//! once per interval. Pausing, resetting, releasing, or dropping the
//! registry stops that thread and joins it, so no ticker outlives its row.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Sender};
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::TICK_INTERVAL;

/// Payload emitted on every tick of a running stopwatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeTick {
    pub song_id: String,
    pub elapsed_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub song_id: String,
    pub elapsed_secs: u64,
    pub running: bool,
    pub display: String,
}

pub type TickObserver = Arc<dyn Fn(PracticeTick) + Send + Sync>;

/// A live ticker thread. Dropping it cancels and joins the thread.
struct Ticker {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn spawn(
        song_id: String,
        elapsed: Arc<AtomicU64>,
        interval: Duration,
        observer: TickObserver,
    ) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::spawn(move || {
            let ticks = tick(interval);
            loop {
                select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticks) -> _ => {
                        let secs = elapsed.fetch_add(1, Ordering::Relaxed) + 1;
                        observer(PracticeTick {
                            song_id: song_id.clone(),
                            elapsed_secs: secs,
                        });
                    }
                }
            }
            log::debug!("[Timer] Ticker for {} stopped", song_id);
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        let _ = self.stop_tx.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[Timer] Ticker thread panicked");
            }
        }
    }
}

/// One song row's stopwatch.
struct Stopwatch {
    elapsed: Arc<AtomicU64>,
    ticker: Option<Ticker>,
}

impl Stopwatch {
    fn new() -> Self {
        Self {
            elapsed: Arc::new(AtomicU64::new(0)),
            ticker: None,
        }
    }

    fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    fn elapsed(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }
}

/// Registry of stopwatches keyed by song id.
pub struct PracticeTimers {
    watches: Mutex<HashMap<String, Stopwatch>>,
    interval: Duration,
    observer: TickObserver,
}

impl PracticeTimers {
    pub fn new(observer: impl Fn(PracticeTick) + Send + Sync + 'static) -> Self {
        Self::with_interval(TICK_INTERVAL, observer)
    }

    pub fn with_interval(
        interval: Duration,
        observer: impl Fn(PracticeTick) + Send + Sync + 'static,
    ) -> Self {
        Self {
            watches: Mutex::new(HashMap::new()),
            interval,
            observer: Arc::new(observer),
        }
    }

    /// Starts the stopwatch if paused, pauses it if running.
    pub fn toggle(&self, song_id: &str) -> TimerStatus {
        let (status, stopped) = {
            let mut watches = self.watches.lock();
            let watch = watches
                .entry(song_id.to_string())
                .or_insert_with(Stopwatch::new);

            let stopped = watch.ticker.take();
            if stopped.is_none() {
                watch.ticker = Some(Ticker::spawn(
                    song_id.to_string(),
                    watch.elapsed.clone(),
                    self.interval,
                    self.observer.clone(),
                ));
                log::info!("[Timer] Started {} at {}s", song_id, watch.elapsed());
            }
            (status_of(song_id, watch), stopped)
        };

        // Join outside the lock so a tick observer can't deadlock against us.
        if let Some(ticker) = stopped {
            drop(ticker);
            log::info!("[Timer] Paused {} at {}s", song_id, self.elapsed(song_id));
            return self.status(song_id);
        }
        status
    }

    /// Stops the stopwatch and zeroes it.
    pub fn reset(&self, song_id: &str) -> TimerStatus {
        let removed = self.watches.lock().remove(song_id);
        drop(removed);
        self.status(song_id)
    }

    /// Takes a paused stopwatch's elapsed seconds, zeroing it. A running
    /// stopwatch is left alone and yields 0.
    pub fn take_paused_elapsed(&self, song_id: &str) -> u64 {
        let mut watches = self.watches.lock();
        match watches.get(song_id) {
            Some(watch) if watch.is_running() => {
                log::debug!("[Timer] {} is still running, nothing taken", song_id);
                0
            }
            Some(watch) => {
                let elapsed = watch.elapsed();
                watches.remove(song_id);
                elapsed
            }
            None => 0,
        }
    }

    pub fn status(&self, song_id: &str) -> TimerStatus {
        let watches = self.watches.lock();
        match watches.get(song_id) {
            Some(watch) => status_of(song_id, watch),
            None => TimerStatus {
                song_id: song_id.to_string(),
                elapsed_secs: 0,
                running: false,
                display: format_clock(0),
            },
        }
    }

    pub fn elapsed(&self, song_id: &str) -> u64 {
        self.watches
            .lock()
            .get(song_id)
            .map(Stopwatch::elapsed)
            .unwrap_or(0)
    }

    /// Tears down the stopwatch for a row that is no longer displayed.
    pub fn release(&self, song_id: &str) {
        let removed = self.watches.lock().remove(song_id);
        if removed.is_some() {
            drop(removed);
            log::debug!("[Timer] Released {}", song_id);
        }
    }

    #[cfg(test)]
    pub(crate) fn running_count(&self) -> usize {
        self.watches
            .lock()
            .values()
            .filter(|w| w.is_running())
            .count()
    }
}

impl Drop for PracticeTimers {
    fn drop(&mut self) {
        let watches = self.watches.get_mut();
        let running = watches.values().filter(|w| w.is_running()).count();
        if running > 0 {
            log::debug!("[Timer] Stopping {} running stopwatches", running);
        }
        watches.clear();
    }
}

fn status_of(song_id: &str, watch: &Stopwatch) -> TimerStatus {
    let elapsed = watch.elapsed();
    TimerStatus {
        song_id: song_id.to_string(),
        elapsed_secs: elapsed,
        running: watch.is_running(),
        display: format_clock(elapsed),
    }
}

/// `MM:SS`, minutes unbounded.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Memo entry for a logged practice session, e.g. `[Practice: 1m 5s]`.
pub fn format_practice_entry(secs: u64) -> String {
    let mins = secs / 60;
    let rest = secs % 60;
    if mins > 0 {
        format!("[Practice: {}m {}s]", mins, rest)
    } else {
        format!("[Practice: {}s]", rest)
    }
}
