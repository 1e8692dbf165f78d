//! Constants for the Mafia room.

use std::time::Duration;

/// Display color tokens handed out to players as they join. A room's
/// `active_players_number` must not exceed the length of this universe.
pub const COLOR_PALETTE: &[&str] = &[
    "hot_pink",
    "plum1",
    "dark_orange",
    "pale_turquoise1",
    "blue",
    "green",
    "yellow",
];

/// Default duration of a vote-phase timer.
pub const DEFAULT_VOTE_PHASE_DURATION: Duration = Duration::from_secs(60);

/// Default duration of a night-phase timer.
pub const DEFAULT_NIGHT_PHASE_DURATION: Duration = Duration::from_secs(60);

/// Max number of entries the event log retains before evicting the oldest.
pub const EVENT_LOG_CAPACITY: usize = 100;
