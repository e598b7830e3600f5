//! Async monitor loop: reactor-driven tick and flush scheduling.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! scheduling and `async-io-mini` reactor timers.  Two futures share the
//! [`Monitor`]:
//!
//! 1. **Input**: awaits [`MonitorInput`]s from the channel and applies
//!    them in arrival order.  Ends the loop on `Shutdown`.
//! 2. **Clock**: sleeps until the next tick or flush deadline, whichever
//!    comes first, then ticks and/or flushes.
//!
//! ```text
//!  ┌────────────────────────────────────────────────────┐
//!  │  Monitor thread                                    │
//!  │  ┌──────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                │  │
//!  │  │  ┌──────────────┐      ┌──────────────────┐  │  │
//!  │  │  │ Input        │      │ Clock            │  │  │
//!  │  │  │ wake-on-send │      │ tick ⏱ / flush ⏱ │  │  │
//!  │  │  └──────────────┘      └──────────────────┘  │  │
//!  │  └──────────────────────────────────────────────┘  │
//!  └────────────────────────────────────────────────────┘
//! ```
//!
//! Both futures run on one thread, so sample handling and ticks never
//! interleave.  Every wake-up reads the wall clock and the tick interval
//! afresh: a late tick runs once and the next one is scheduled a full
//! period later.

pub mod channels;

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Context;
use log::info;

use crate::app::commands::MonitorInput;
use crate::app::ports::{Clock, EventSink};
use crate::app::service::Monitor;

pub use channels::{InputChannel, MonitorHandle};

/// Shortest sleep between clock-loop iterations, in seconds.
const MIN_SLEEP_SECS: f64 = 0.001;

type Shared<T> = Rc<RefCell<T>>;

async fn input_loop<C: Clock>(channel: Arc<InputChannel>, monitor: Shared<Monitor<C>>) {
    loop {
        let input = channel.receive().await;
        if matches!(input, MonitorInput::Shutdown) {
            info!("Monitor loop: shutdown requested");
            return;
        }
        monitor.borrow_mut().handle(input);
    }
}

/// When the last tick ran.  The next one is due a full interval later,
/// with the interval read fresh each time so reloads take effect.
#[derive(Debug, Clone, Copy)]
struct TickSchedule {
    last_tick: f64,
}

impl TickSchedule {
    fn starting_at(now: f64) -> Self {
        Self { last_tick: now }
    }

    fn next_tick(&self, interval: f64) -> f64 {
        self.last_tick + interval
    }
}

/// Outcome of one clock-loop iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClockStep {
    ticked: bool,
    /// Earliest of the next tick and the next flush deadline.
    wake_at: f64,
}

/// Tick if due, then deliver due batches.  However late `now` is, at most
/// one tick runs and the next is scheduled a full period after it.
fn clock_step<C: Clock, S: EventSink>(
    monitor: &mut Monitor<C>,
    sink: &mut S,
    schedule: &mut TickSchedule,
) -> ClockStep {
    let interval = monitor.settings().tick_interval;
    let now = monitor.clock().now();

    let ticked = now >= schedule.next_tick(interval);
    if ticked {
        monitor.tick(now);
        schedule.last_tick = now;
    }
    monitor.poll_flush(now, sink);

    let next_tick = schedule.next_tick(interval);
    let wake_at = monitor
        .next_flush_due()
        .map_or(next_tick, |due| due.min(next_tick));
    ClockStep { ticked, wake_at }
}

async fn clock_loop<C: Clock, S: EventSink>(monitor: Shared<Monitor<C>>, sink: Shared<S>) {
    let mut schedule = TickSchedule::starting_at(monitor.borrow().clock().now());
    loop {
        let step = clock_step(
            &mut *monitor.borrow_mut(),
            &mut *sink.borrow_mut(),
            &mut schedule,
        );
        let sleep = (step.wake_at - monitor.borrow().clock().now()).max(MIN_SLEEP_SECS);
        async_io_mini::Timer::after(Duration::from_secs_f64(sleep)).await;
    }
}

/// Drive `monitor` on the current thread until a `Shutdown` input
/// arrives, then flush everything still pending into `sink`.
pub fn run<C: Clock, S: EventSink>(monitor: Monitor<C>, sink: S, channel: Arc<InputChannel>) {
    let tick_secs = monitor.settings().tick_interval;
    let monitor: Shared<Monitor<C>> = Rc::new(RefCell::new(monitor));
    let sink: Shared<S> = Rc::new(RefCell::new(sink));

    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
    executor
        .spawn(clock_loop(monitor.clone(), sink.clone()))
        .detach();

    info!("Monitor loop started (tick every {:.1}s)", tick_secs);
    futures_lite::future::block_on(executor.run(input_loop(channel, monitor.clone())));

    let flushed = monitor.borrow_mut().flush_all(&mut *sink.borrow_mut());
    info!("Monitor loop stopped, {} batch(es) flushed on exit", flushed);
}

/// Start the monitor loop on its own thread.  Returns the input handle
/// and the thread's join handle.
pub fn spawn<C, S>(monitor: Monitor<C>, sink: S) -> anyhow::Result<(MonitorHandle, JoinHandle<()>)>
where
    C: Clock + Send + 'static,
    S: EventSink + Send + 'static,
{
    let handle = MonitorHandle::new();
    let channel = handle.channel();
    let join = std::thread::Builder::new()
        .name("med-monitor".into())
        .spawn(move || run(monitor, sink, channel))
        .context("failed to spawn monitor thread")?;
    Ok((handle, join))
}
