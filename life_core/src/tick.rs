// tick.rs - Background loop that steps the grid on a timer
//
// Each run owns its own stop flag. `stop` only raises the flag; the task
// notices it after finishing the step in progress, so a step is never cut
// short.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::guard::Guard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickState {
    Idle,
    Running,
    Stopping,
}

/// One launched task and the flag that asks it to finish.
#[derive(Debug)]
struct Run {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Run {
    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }
}

#[derive(Debug)]
pub struct TickLoop {
    guard: Guard,
    runtime: Handle,
    delay_ns: Arc<AtomicU64>,
    ticks: Arc<AtomicU64>,
    run: Mutex<Option<Run>>,
}

impl TickLoop {
    /// A loop over `guard` whose task will be spawned on `runtime`.
    pub fn new(guard: Guard, delay: Duration, runtime: Handle) -> Self {
        Self {
            guard,
            runtime,
            delay_ns: Arc::new(AtomicU64::new(as_nanos(delay))),
            ticks: Arc::new(AtomicU64::new(0)),
            run: Mutex::new(None),
        }
    }

    /// Same as [`TickLoop::new`] using the runtime of the calling context.
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn on_current_runtime(guard: Guard, delay: Duration) -> Self {
        Self::new(guard, delay, Handle::current())
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn state(&self) -> TickState {
        let run = self.run.lock().unwrap_or_else(|p| p.into_inner());
        match run.as_ref() {
            Some(r) if r.is_alive() && r.stop.load(Ordering::Acquire) => TickState::Stopping,
            Some(r) if r.is_alive() => TickState::Running,
            _ => TickState::Idle,
        }
    }

    /// True while a task is alive, including one finishing its last step.
    pub fn is_running(&self) -> bool {
        self.state() != TickState::Idle
    }

    /// Launches the stepping task. No-op while already running.
    ///
    /// A loop still finishing after `stop` is replaced by a fresh run which
    /// first waits for the old task to exit, so only one task ever steps the
    /// grid.
    pub fn start(&self) {
        let mut run = self.run.lock().unwrap_or_else(|p| p.into_inner());

        let previous = match run.take() {
            Some(r) if r.is_alive() && !r.stop.load(Ordering::Acquire) => {
                *run = Some(r);
                return;
            }
            Some(r) if r.is_alive() => Some(r.handle),
            _ => None,
        };

        let stop = Arc::new(AtomicBool::new(false));
        let handle = self.runtime.spawn(tick_task(
            self.guard.clone(),
            Arc::clone(&self.delay_ns),
            Arc::clone(&self.ticks),
            Arc::clone(&stop),
            previous,
        ));
        debug!(delay = ?self.delay(), "tick loop started");
        *run = Some(Run { stop, handle });
    }

    /// Asks the running task to exit after its current step. Never blocks.
    pub fn stop(&self) {
        let run = self.run.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(r) = run.as_ref() {
            if r.is_alive() && !r.stop.swap(true, Ordering::AcqRel) {
                debug!("tick loop stop requested");
            }
        }
    }

    /// New delay, used from the next sleep on.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ns.store(as_nanos(delay), Ordering::Relaxed);
        debug!(?delay, "tick delay changed");
    }

    pub fn delay(&self) -> Duration {
        Duration::from_nanos(self.delay_ns.load(Ordering::Relaxed))
    }

    /// Steps performed by every run of this loop so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Drop for TickLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn as_nanos(delay: Duration) -> u64 {
    u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX)
}

async fn tick_task(
    guard: Guard,
    delay_ns: Arc<AtomicU64>,
    ticks: Arc<AtomicU64>,
    stop: Arc<AtomicBool>,
    previous: Option<JoinHandle<()>>,
) {
    if let Some(previous) = previous {
        let _ = previous.await;
    }

    loop {
        let delay = Duration::from_nanos(delay_ns.load(Ordering::Relaxed));
        tokio::time::sleep(delay).await;

        // The step blocks on the grid lock and computes a whole generation,
        // so it runs on the blocking pool. The flag is only checked after it
        // completes.
        let stepper = guard.clone();
        if tokio::task::spawn_blocking(move || stepper.step()).await.is_err() {
            warn!("tick step panicked, ending loop");
            break;
        }
        let n = ticks.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(tick = n, "stepped");

        if stop.load(Ordering::Acquire) {
            break;
        }
    }
    debug!("tick loop finished");
}
