//! Phase timer facility.
//!
//! `std::sync::RwLock` gives us no way to "cancel" a sleeping thread short of tearing it down, so
//! cancellation is modeled with a generation counter instead: arming a timer captures the Room's
//! current generation, and firing only acts if that generation is still current. Any transition
//! that leaves the timed phase early bumps the generation, which makes a timer that wakes up
//! afterwards a no-op — race-safe without needing to signal or join the sleeping thread.

use std::thread;
use std::time::Duration;

use crate::Room;

/// Which cascading finisher a fired timer should invoke.
#[derive(Copy, Clone, Debug)]
pub(crate) enum TimerKind {
    Vote,
    Night,
}

/// Spawns a detached thread that sleeps for `duration`, then attempts to fire `kind`'s finisher
/// on `room`, provided the room's timer generation hasn't moved past `generation` in the meantime.
pub(crate) fn arm(room: Room, duration: Duration, generation: u64, kind: TimerKind) {
    thread::spawn(move || {
        thread::sleep(duration);

        let mut inner = room.write();

        if inner.timer_generation() != generation {
            tracing::debug!(?kind, generation, "timer fired after being superseded, ignoring");
            return;
        }

        tracing::info!(?kind, generation, "phase timer fired");

        match kind {
            TimerKind::Vote => inner.finish_vote_phase(&room),
            TimerKind::Night => inner.finish_night_phase(&room),
        }
    });
}
