//! Fuzz target: `Monitor` sample and tick handling
//!
//! Decodes the input as a stream of `(dt, x, y, z)` records, including
//! NaN and infinite values, and drives a monitor with them.  Checks that
//! nothing panics and that confirmed detections stay debounced.
//!
//! cargo fuzz run fuzz_sample_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use medmonitor::app::events::OutboundEvent;
use medmonitor::app::ports::{Clock, EventSink};
use medmonitor::app::service::Monitor;
use medmonitor::config::MonitorConfig;
use medmonitor::error::DispatchError;
use medmonitor::sensors::motion::Detection;
use medmonitor::window::TimeOfDay;

struct UtcClock;

impl Clock for UtcClock {
    fn now(&self) -> f64 {
        0.0
    }

    fn time_of_day(&self, epoch_secs: f64) -> Option<TimeOfDay> {
        TimeOfDay::from_epoch(epoch_secs, 0)
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn send_batch(&mut self, _subject: &str, _events: &[OutboundEvent]) -> Result<(), DispatchError> {
        Ok(())
    }
}

fn f32_at(data: &[u8], i: usize) -> f64 {
    let bytes: [u8; 4] = data[i..i + 4].try_into().unwrap_or([0; 4]);
    f64::from(f32::from_le_bytes(bytes))
}

fuzz_target!(|data: &[u8]| {
    let config = MonitorConfig::default();
    let ignore_time = config.ignore_time;
    let Ok(mut monitor) = Monitor::new("BIDF", &config, UtcClock) else {
        return;
    };
    monitor.register_subject("dev", "Fuzz Box");
    let mut sink = NullSink;

    let mut t = 0.0;
    let mut last_taken: Option<f64> = None;
    for record in data.chunks_exact(16) {
        t += f64::from(u16::from_le_bytes([record[0], record[1]])) / 10.0;
        let axes = [f32_at(record, 4), f32_at(record, 8), f32_at(record, 12)];
        let timestamp = if record[2] == 0xFF { f64::NAN } else { t };

        if let Some(Detection::Taken(at)) = monitor.notify_sample("dev", timestamp, &axes) {
            if let Some(prev) = last_taken {
                assert!(at - prev > ignore_time);
            }
            last_taken = Some(at);
        }
        if record[3] & 1 == 1 {
            monitor.tick(t);
            monitor.poll_flush(t, &mut sink);
        }
    }
    monitor.flush_all(&mut sink);
});
