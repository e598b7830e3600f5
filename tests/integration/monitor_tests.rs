//! Monitor end-to-end scenarios against mock ports.

use medmonitor::app::commands::MonitorInput;
use medmonitor::app::events::OutboundEvent;
use medmonitor::app::service::Monitor;
use medmonitor::config::{MonitorConfig, TimeSlotConfig};
use medmonitor::sensors::motion::Detection;

use super::mock_ports::{OffsetClock, RecordingSink};

const OWNER: &str = "BID42";
const SUBJECT: &str = "ADT7";

fn config() -> MonitorConfig {
    MonitorConfig {
        time_slots: vec![TimeSlotConfig::new("Morning", "07:00", "08:00")],
        accel_min_change: 0.2,
        ignore_time: 30.0,
        data_send_delay: 1.0,
        ..Default::default()
    }
}

fn monitor(clock: OffsetClock) -> Monitor<OffsetClock> {
    let mut m = Monitor::new(OWNER, &config(), clock).unwrap();
    m.register_subject(SUBJECT, "Pill Box");
    m
}

fn settle(m: &mut Monitor<OffsetClock>, start: f64) {
    for i in 0..3 {
        assert_eq!(
            m.notify_sample(SUBJECT, start + f64::from(i), &[0.0, 0.0, 0.0]),
            Some(Detection::Settling)
        );
    }
}

// ── Detection → classification → flush ──────────────────────

#[test]
fn taken_in_slot_is_classified_and_flushed() {
    let mut m = monitor(OffsetClock::pinned(101.0, 7, 30));
    let mut sink = RecordingSink::new();

    settle(&mut m, 97.0);
    assert_eq!(
        m.notify_sample(SUBJECT, 100.0, &[0.0, 0.0, 0.5]),
        Some(Detection::Taken(100.0))
    );
    assert_eq!(m.subject(SUBJECT).unwrap().detector().pending(), Some(100.0));

    m.tick(101.0);
    assert_eq!(m.subject(SUBJECT).unwrap().detector().pending(), None);
    assert_eq!(m.poll_flush(101.5, &mut sink), 0, "flush waits for data_send_delay");
    assert_eq!(m.poll_flush(102.0, &mut sink), 1);

    assert_eq!(sink.batches.len(), 1);
    assert_eq!(sink.batches[0].0, SUBJECT);
    assert_eq!(
        sink.batches[0].1,
        vec![OutboundEvent::Taken {
            series_name: "BID42/Pill_Box/in_slot".into(),
            timestamp_millis: 100_000,
            value: 1,
        }]
    );
}

#[test]
fn taken_outside_slot_is_out_slot() {
    let mut m = monitor(OffsetClock::pinned(101.0, 12, 0));
    let mut sink = RecordingSink::new();

    settle(&mut m, 97.0);
    m.notify_sample(SUBJECT, 100.0, &[0.5, 0.0, 0.0]);
    m.tick(101.0);
    m.poll_flush(110.0, &mut sink);

    assert_eq!(sink.taken_series(), vec!["BID42/Pill_Box/out_slot".to_string()]);
}

#[test]
fn flag_is_consumed_exactly_once() {
    let mut m = monitor(OffsetClock::pinned(101.0, 7, 30));
    let mut sink = RecordingSink::new();

    settle(&mut m, 97.0);
    m.notify_sample(SUBJECT, 100.0, &[0.5, 0.0, 0.0]);
    for k in 0..5 {
        m.tick(101.0 + 5.0 * f64::from(k));
    }
    m.poll_flush(200.0, &mut sink);
    assert_eq!(sink.taken_series().len(), 1);
}

#[test]
fn confirmations_between_ticks_are_all_delivered() {
    let mut m = monitor(OffsetClock::pinned(105.0, 7, 30));
    let mut sink = RecordingSink::new();
    m.reload(&MonitorConfig {
        ignore_time: 1.0,
        tick_interval: 1.0,
        ..config()
    })
    .unwrap();

    settle(&mut m, 90.0);
    assert_eq!(
        m.notify_sample(SUBJECT, 100.0, &[0.0, 0.0, 0.5]),
        Some(Detection::Taken(100.0))
    );
    assert_eq!(
        m.notify_sample(SUBJECT, 102.0, &[0.0, 0.0, 0.0]),
        Some(Detection::Taken(102.0))
    );

    // One late tick covers both.
    m.tick(105.0);
    assert_eq!(m.subject(SUBJECT).unwrap().detector().pending_count(), 0);
    m.poll_flush(110.0, &mut sink);

    let stamps: Vec<i64> = sink
        .all_events()
        .into_iter()
        .filter_map(|e| match e {
            OutboundEvent::Taken { timestamp_millis, .. } => Some(timestamp_millis),
            OutboundEvent::Alert { .. } => None,
        })
        .collect();
    assert_eq!(stamps, vec![100_000, 102_000]);
}

#[test]
fn debounced_gesture_yields_one_event() {
    let mut m = monitor(OffsetClock::pinned(100.0, 7, 10));
    let mut sink = RecordingSink::new();

    settle(&mut m, 0.0);
    // Shaking the box for 20 s.
    let mut t = 100.0;
    let mut z = 0.0;
    while t <= 120.0 {
        z = if z == 0.0 { 0.6 } else { 0.0 };
        m.notify_sample(SUBJECT, t, &[0.0, 0.0, z]);
        t += 2.0;
    }
    m.tick(125.0);
    // Picked up again 31 s after the first confirmation.
    m.notify_sample(SUBJECT, 131.0, &[0.0, 0.0, z + 0.6]);
    m.tick(135.0);
    m.poll_flush(200.0, &mut sink);

    assert_eq!(sink.taken_series().len(), 2);
}

// ── Reminders ─────────────────────────────────────────────────

#[test]
fn one_reminder_per_window_when_nothing_taken() {
    // Epoch 0 reads as 07:00.
    let mut m = monitor(OffsetClock::pinned(0.0, 7, 0));
    let mut sink = RecordingSink::new();

    let mut t = 0.0;
    while t < 3600.0 {
        m.tick(t);
        m.poll_flush(t, &mut sink);
        t += 5.0;
    }
    m.poll_flush(t + 5.0, &mut sink);

    let alerts = sink.alerts();
    assert_eq!(alerts.len(), 1, "{alerts:?}");
    assert!(alerts[0].contains("Morning"));
    assert!(alerts[0].contains("08:00"));
}

#[test]
fn detection_in_same_tick_suppresses_reminder() {
    // Epoch 3300 reads as 07:55, inside the lead time.
    let mut m = monitor(OffsetClock::pinned(0.0, 7, 0));
    let mut sink = RecordingSink::new();

    settle(&mut m, 3290.0);
    m.notify_sample(SUBJECT, 3300.0, &[0.0, 0.5, 0.0]);
    m.tick(3302.0);
    m.poll_flush(3400.0, &mut sink);

    assert!(sink.alerts().is_empty());
    assert_eq!(sink.taken_series(), vec!["BID42/Pill_Box/in_slot".to_string()]);
}

#[test]
fn reminder_and_classification_share_a_batch() {
    // Epoch 4000 reads as 07:00.
    let mut m = monitor(OffsetClock::pinned(4000.0, 7, 0));
    let mut sink = RecordingSink::new();

    // Taken at 05:53, before the window; reminder due at 07:55.
    settle(&mut m, 0.0);
    m.notify_sample(SUBJECT, 10.0, &[0.0, 0.5, 0.0]);
    m.tick(7300.0);
    m.poll_flush(7301.0, &mut sink);

    assert_eq!(sink.batches.len(), 1);
    let batch = &sink.batches[0].1;
    assert_eq!(batch.len(), 2);
    assert!(matches!(&batch[0], OutboundEvent::Taken { series_name, .. } if series_name.ends_with("out_slot")));
    assert!(matches!(&batch[1], OutboundEvent::Alert { .. }));
}

// ── Robustness ────────────────────────────────────────────────

#[test]
fn malformed_sample_does_not_touch_state() {
    let mut m = monitor(OffsetClock::utc());
    m.notify_sample(SUBJECT, 0.0, &[0.0, 0.0, 0.0]);
    m.notify_sample(SUBJECT, 1.0, &[0.0, 0.0, 0.0]);

    assert_eq!(m.notify_sample(SUBJECT, 2.0, &[9.0, 9.0]), None);
    assert_eq!(m.notify_sample(SUBJECT, 2.0, &[f64::NAN, 0.0, 0.0]), None);
    assert_eq!(m.notify_sample(SUBJECT, f64::NAN, &[0.0, 0.0, 0.0]), None);

    // Still the third settle sample.
    assert_eq!(
        m.notify_sample(SUBJECT, 3.0, &[0.0, 0.0, 0.0]),
        Some(Detection::Settling)
    );
    assert_eq!(m.notify_sample(SUBJECT, 4.0, &[0.0, 0.0, 0.0]), Some(Detection::Still));
}

#[test]
fn unknown_subject_is_a_no_op() {
    let mut m = monitor(OffsetClock::utc());
    assert_eq!(m.notify_sample("nobody", 0.0, &[0.0, 0.0, 0.0]), None);
    m.deregister_subject("nobody");
    assert_eq!(m.subject_count(), 1);
}

#[test]
fn failed_dispatch_is_retried_with_all_events() {
    let mut m = monitor(OffsetClock::pinned(101.0, 7, 30));
    let mut sink = RecordingSink {
        offline: true,
        ..Default::default()
    };

    settle(&mut m, 97.0);
    m.notify_sample(SUBJECT, 100.0, &[0.5, 0.0, 0.0]);
    m.tick(101.0);
    assert_eq!(m.poll_flush(102.0, &mut sink), 0);
    assert_eq!(sink.failed_attempts, 1);
    assert_eq!(m.batcher().pending(SUBJECT).len(), 1);

    sink.offline = false;
    assert_eq!(m.poll_flush(103.0, &mut sink), 1);
    assert_eq!(sink.taken_series().len(), 1);
    assert!(m.batcher().pending(SUBJECT).is_empty());
}

#[test]
fn deregister_cancels_pending_flush() {
    let mut m = monitor(OffsetClock::pinned(101.0, 7, 30));
    let mut sink = RecordingSink::new();

    settle(&mut m, 97.0);
    m.notify_sample(SUBJECT, 100.0, &[0.5, 0.0, 0.0]);
    m.tick(101.0);
    assert!(m.batcher().timer(SUBJECT).is_some());

    m.deregister_subject(SUBJECT);
    assert!(m.batcher().timer(SUBJECT).is_none());
    assert_eq!(m.next_flush_due(), None);
    assert_eq!(m.poll_flush(500.0, &mut sink), 0);
    assert!(sink.batches.is_empty());
    assert!(m.subject(SUBJECT).is_none());
}

#[test]
fn handle_dispatches_inputs() {
    let mut m = Monitor::new(OWNER, &config(), OffsetClock::utc()).unwrap();
    m.handle(MonitorInput::Register {
        subject: "s1".into(),
        display_name: "Box".into(),
    });
    m.handle(MonitorInput::Sample {
        subject: "s1".into(),
        timestamp: 0.0,
        axes: vec![0.0, 0.0, 0.0],
    });
    assert_eq!(m.subject_count(), 1);
    m.handle(MonitorInput::Deregister { subject: "s1".into() });
    assert_eq!(m.subject_count(), 0);
}
