//! Fuzz target: config decoding
//!
//! Feeds arbitrary text to both config entry points and checks that a
//! document which validates always yields a usable snapshot.
//!
//! cargo fuzz run fuzz_config_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use medmonitor::config::{ConfigMessage, MAX_TIME_SLOTS, MonitorConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let _ = ConfigMessage::parse(text);

    if let Ok(config) = MonitorConfig::from_json(text) {
        if let Ok(settings) = config.validate() {
            assert!(settings.time_slots.len() <= MAX_TIME_SLOTS);
            assert!(settings.accel_min_change > 0.0);
            assert!(settings.tick_interval > 0.0);
            for slot in &settings.time_slots {
                assert_ne!(slot.start, slot.end, "empty window accepted");
            }
        }
    }
});
