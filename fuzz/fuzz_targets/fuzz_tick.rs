//! Fuzz target: `DoorController::tick` / `report_motion`
//!
//! Interprets the input as a script of 3-byte steps (time delta, presence,
//! feedback) and asserts the controller never panics, never leaves a
//! motion state running past its timeout, and keeps the presence
//! timestamp monotonic.
//!
//! cargo fuzz run fuzz_tick

#![no_main]

use autodoor::{DoorController, MotionFeedback};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&head, script)) = data.split_first() else {
        return;
    };
    // Keep the timeouts small so scripts reach them.
    let inactivity = u32::from(head & 0x0f) * 100 + 1;
    let motion = u32::from(head >> 4) * 100 + 1;
    let Ok(mut door) = DoorController::new(inactivity, motion) else {
        return;
    };

    let mut now: u64 = 0;
    let mut last_presence = None;

    for chunk in script.chunks_exact(3) {
        // Signed delta: occasional regressions model clock glitches.
        let dt = i64::from(i16::from_le_bytes([chunk[0], chunk[1]]) >> 4);
        now = now.saturating_add_signed(dt);

        let flags = chunk[2];
        match flags >> 6 {
            1 => door.report_motion(MotionFeedback::OpenReached),
            2 => door.report_motion(MotionFeedback::ClosedReached),
            3 => door.report_motion(MotionFeedback::Stalled),
            _ => {}
        }

        let out = door.tick(now, flags & 1 == 1);
        assert!(out.commands().len() <= 2);
        if out.state.is_moving() {
            assert!(door.ms_in_state() < u64::from(motion));
        }

        let lp = door.last_time_presence();
        assert!(lp >= last_presence, "last presence went backwards");
        last_presence = lp;
    }
});
