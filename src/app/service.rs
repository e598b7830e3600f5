//! Monitor service: the hexagonal core.
//!
//! [`Monitor`] owns one [`SubjectState`] per registered subject, the
//! per-subject [`EventBatcher`], and the current [`Settings`] snapshot.
//! It exposes a hardware-agnostic API; time enters as plain epoch
//! seconds and through the [`Clock`] port, events leave through the
//! [`EventSink`] port.
//!
//! ```text
//!  notify_sample ──▶ ┌──────────────────────────┐
//!  tick(now)     ──▶ │         Monitor          │ ──▶ EventSink
//!  poll_flush    ──▶ │ Motion · Window · Remind │
//!                    └──────────────────────────┘
//! ```
//!
//! No sample, tick or dispatch failure is returned to the caller; each is
//! logged and the monitor carries on.  Only configuration can fail.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::batch::EventBatcher;
use crate::config::{ConfigMessage, MonitorConfig, Settings};
use crate::error::{ConfigError, TickError};
use crate::scheduler::{self, ReminderScheduler};
use crate::sensors::Sample;
use crate::sensors::motion::{Detection, MotionDetector};

use super::commands::MonitorInput;
use super::ports::{Clock, EventSink};

/// State owned for one monitored subject.
#[derive(Debug, Clone)]
pub struct SubjectState {
    display_name: String,
    /// `{owner}/{display_name_with_underscores}`.
    series_base: String,
    detector: MotionDetector,
    reminder: ReminderScheduler,
}

impl SubjectState {
    fn new(owner_id: &str, display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            series_base: series_base(owner_id, display_name),
            detector: MotionDetector::new(),
            reminder: ReminderScheduler::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn series_base(&self) -> &str {
        &self.series_base
    }

    pub fn detector(&self) -> &MotionDetector {
        &self.detector
    }

    pub fn reminder(&self) -> &ReminderScheduler {
        &self.reminder
    }
}

fn series_base(owner_id: &str, display_name: &str) -> String {
    format!("{}/{}", owner_id, display_name.replace(' ', "_"))
}

// ───────────────────────────────────────────────────────────────
// Monitor
// ───────────────────────────────────────────────────────────────

pub struct Monitor<C: Clock> {
    owner_id: String,
    settings: Arc<Settings>,
    clock: C,
    subjects: HashMap<String, SubjectState>,
    batcher: EventBatcher,
}

impl<C: Clock> Monitor<C> {
    /// Build a monitor for bridge/owner `owner_id`.  Fails only if the
    /// configuration is invalid.
    pub fn new(owner_id: &str, config: &MonitorConfig, clock: C) -> Result<Self, ConfigError> {
        let settings = config.validate()?;
        info!(
            "Monitor '{}' started with {} time slot(s)",
            owner_id,
            settings.time_slots.len()
        );
        Ok(Self {
            owner_id: owner_id.to_string(),
            settings: Arc::new(settings),
            clock,
            subjects: HashMap::new(),
            batcher: EventBatcher::new(),
        })
    }

    // ── Subjects ──────────────────────────────────────────────

    /// Start tracking a subject.  Registering an already known id keeps its
    /// state and only updates the display name.
    pub fn register_subject(&mut self, id: &str, display_name: &str) {
        match self.subjects.get_mut(id) {
            Some(subject) => {
                subject.display_name = display_name.to_string();
                subject.series_base = series_base(&self.owner_id, display_name);
                debug!("Subject '{}' re-registered as '{}'", id, display_name);
            }
            None => {
                self.subjects
                    .insert(id.to_string(), SubjectState::new(&self.owner_id, display_name));
                info!("Subject '{}' registered ('{}')", id, display_name);
            }
        }
    }

    /// Stop tracking a subject, cancelling its pending flush.
    pub fn deregister_subject(&mut self, id: &str) {
        if self.subjects.remove(id).is_none() {
            warn!("Deregister: unknown subject '{}'", id);
            return;
        }
        self.batcher.cancel(id);
        info!("Subject '{}' deregistered", id);
    }

    // ── Inbound samples ───────────────────────────────────────

    /// Feed one acceleration sample.  Returns what the detector made of
    /// it, or `None` if the sample was dropped.
    pub fn notify_sample(&mut self, id: &str, timestamp: f64, axes: &[f64]) -> Option<Detection> {
        let Some(subject) = self.subjects.get_mut(id) else {
            warn!("Sample for unknown subject '{}' ignored", id);
            return None;
        };
        if !self.settings.medicine {
            return None;
        }
        let sample = match Sample::new(timestamp, axes) {
            Ok(s) => s,
            Err(e) => {
                warn!("Sample for '{}' discarded: {}", id, e);
                return None;
            }
        };

        let detection = subject.detector.on_sample(&sample, &self.settings);
        if let Detection::Taken(t) = detection {
            debug!("Subject '{}': movement confirmed at {:.3}", id, t);
        }
        Some(detection)
    }

    // ── Periodic tick ─────────────────────────────────────────

    /// Run classification then reminder evaluation for every subject.
    pub fn tick(&mut self, now: f64) {
        let settings = Arc::clone(&self.settings);
        let Self {
            subjects,
            batcher,
            clock,
            ..
        } = self;

        for (id, subject) in subjects.iter_mut() {
            if let Err(e) = classify_phase(id, subject, &*clock, &settings, now, batcher) {
                warn!("Tick: classification for '{}' failed: {}", id, e);
            }
            if let Err(e) = reminder_phase(id, subject, &*clock, &settings, now, batcher) {
                warn!("Tick: reminder for '{}' failed: {}", id, e);
            }
        }
    }

    /// Deliver every batch whose flush timer has expired.
    pub fn poll_flush(&mut self, now: f64, sink: &mut impl EventSink) -> usize {
        self.batcher
            .flush_due(now, self.settings.data_send_delay, sink)
    }

    /// Deliver every pending batch regardless of timers.
    pub fn flush_all(&mut self, sink: &mut impl EventSink) -> usize {
        self.batcher.flush_all(sink)
    }

    /// Earliest pending flush deadline.
    pub fn next_flush_due(&self) -> Option<f64> {
        self.batcher.next_due()
    }

    // ── Configuration ─────────────────────────────────────────

    /// Validate and swap in a new settings snapshot.  Subject state is
    /// kept; on error the current snapshot stays in place.
    pub fn reload(&mut self, config: &MonitorConfig) -> Result<(), ConfigError> {
        let settings = config.validate()?;
        self.settings = Arc::new(settings);
        info!("Configuration reloaded");
        Ok(())
    }

    /// Apply a config message from the remote config service.
    pub fn apply_config_message(&mut self, json: &str) -> Result<(), ConfigError> {
        match ConfigMessage::parse(json)? {
            ConfigMessage::Update(config) => self.reload(&config),
            ConfigMessage::Warning(_) => Ok(()),
        }
    }

    /// Dispatch one inbound command.  Errors are logged, never returned.
    pub fn handle(&mut self, input: MonitorInput) {
        match input {
            MonitorInput::Sample {
                subject,
                timestamp,
                axes,
            } => {
                self.notify_sample(&subject, timestamp, &axes);
            }
            MonitorInput::Register {
                subject,
                display_name,
            } => self.register_subject(&subject, &display_name),
            MonitorInput::Deregister { subject } => self.deregister_subject(&subject),
            MonitorInput::Reload(config) => {
                if let Err(e) = self.reload(&config) {
                    warn!("Reload rejected, keeping current config: {}", e);
                }
            }
            MonitorInput::Shutdown => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }

    pub fn subject(&self, id: &str) -> Option<&SubjectState> {
        self.subjects.get(id)
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    pub fn batcher(&self) -> &EventBatcher {
        &self.batcher
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

// ── Tick phases ───────────────────────────────────────────────

fn classify_phase(
    id: &str,
    subject: &mut SubjectState,
    clock: &impl Clock,
    settings: &Settings,
    now: f64,
    batcher: &mut EventBatcher,
) -> Result<(), TickError> {
    // Oldest first; an unmappable timestamp stays queued for the next tick.
    while let Some(taken_at) = subject.detector.pending() {
        let tod = clock
            .time_of_day(taken_at)
            .ok_or(TickError::UnmappableTime(taken_at))?;
        subject.detector.take_taken();

        let event = scheduler::classify(&subject.series_base, taken_at, tod, &settings.time_slots);
        info!("Subject '{}': taken at {} -> {:?}", id, tod, event);
        batcher.enqueue(id, event, now, settings.data_send_delay);
    }
    Ok(())
}

fn reminder_phase(
    id: &str,
    subject: &mut SubjectState,
    clock: &impl Clock,
    settings: &Settings,
    now: f64,
    batcher: &mut EventBatcher,
) -> Result<(), TickError> {
    if !settings.reminders {
        return Ok(());
    }
    let now_tod = clock.time_of_day(now).ok_or(TickError::UnmappableTime(now))?;
    let last_taken = subject.detector.last_taken();
    if let Some(alert) =
        subject
            .reminder
            .evaluate(now, now_tod, last_taken, &subject.display_name, settings)
    {
        batcher.enqueue(id, alert, now, settings.data_send_delay);
    }
    Ok(())
}
