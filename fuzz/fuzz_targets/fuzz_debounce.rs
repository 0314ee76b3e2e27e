//! Fuzz target: `SensorChannel` debounce state machine
//!
//! Input bytes are decoded as (level, time step) pairs.  Verifies:
//! - No panics, including across `u32` uptime wrap
//! - A reported change always carries the level just sampled
//! - The stable level never changes without a reported change

#![no_main]

use garage::sensors::debounce::SensorChannel;
use garage::sensors::Level;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&threshold, rest)) = data.split_first() else {
        return;
    };
    let mut ch = SensorChannel::new(u32::from(threshold));
    // Start close to the wrap point so long inputs cross it.
    let mut now = u32::MAX - 1_000;

    for pair in rest.chunks_exact(2) {
        let raw = Level::from(pair[0] & 1 == 1);
        now = now.wrapping_add(u32::from(pair[1]));
        let before = ch.level();
        let changed = ch.observe(raw, now);
        if changed {
            assert_eq!(ch.level(), raw);
        } else {
            assert_eq!(ch.level(), before);
        }
    }
});
