//! Bounded, append-only broadcast log with per-recipient visibility.

use std::collections::VecDeque;
use std::sync::Arc;

use mafia_room_lib::EventView;

use crate::consts::EVENT_LOG_CAPACITY;
use crate::player::Player;

type AccessPredicate = Box<dyn Fn(&Player) -> bool + Send + Sync>;

struct Entry {
    index: u64,
    message: Arc<str>,
    access: AccessPredicate,
}

/// Append-only log of broadcast messages. Bounded at [`EVENT_LOG_CAPACITY`] entries; the oldest
/// entry is evicted to make room for a new one, but the index sequence is never reset or reused.
pub(crate) struct EventLog {
    entries: VecDeque<Entry>,
    next_index: u64,
}

impl EventLog {
    pub(crate) fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            next_index: 0,
        }
    }

    /// Appends `message`, visible to every player for whom `access` returns `true`.
    pub(crate) fn emit(&mut self, message: impl Into<Arc<str>>, access: AccessPredicate) -> u64 {
        if self.entries.len() == EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }

        let index = self.next_index;
        self.next_index += 1;

        self.entries.push_back(Entry {
            index,
            message: message.into(),
            access,
        });

        index
    }

    /// Appends a message visible to everyone.
    pub(crate) fn emit_public(&mut self, message: impl Into<Arc<str>>) -> u64 {
        self.emit(message, Box::new(|_| true))
    }

    /// Returns the entries visible to `viewer`, in log order.
    pub(crate) fn project_for(&self, viewer: &Player) -> Vec<EventView> {
        self.entries
            .iter()
            .filter(|entry| (entry.access)(viewer))
            .map(|entry| EventView {
                index: entry.index,
                message: Arc::clone(&entry.message),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mafia_room_lib::Role;
    use std::sync::Arc as StdArc;

    fn player(name: &str) -> Player {
        Player::new(StdArc::from(name), StdArc::from("red"))
    }

    #[test]
    fn indices_are_monotonic_and_never_reused() {
        let mut log = EventLog::new();
        for i in 0..(EVENT_LOG_CAPACITY + 5) {
            let idx = log.emit_public(format!("event {i}"));
            assert_eq!(idx, i as u64);
        }

        let viewer = player("alice");
        let projected = log.project_for(&viewer);
        assert_eq!(projected.len(), EVENT_LOG_CAPACITY);
        // Oldest 5 were evicted; the earliest surviving index is 5.
        assert_eq!(projected.first().unwrap().index, 5);
        assert_eq!(
            projected.last().unwrap().index,
            (EVENT_LOG_CAPACITY + 4) as u64
        );
    }

    #[test]
    fn access_predicate_filters_per_viewer() {
        let mut log = EventLog::new();
        let mut mafia = player("m");
        mafia.assign(Role::Mafia);
        let mut civilian = player("c");
        civilian.assign(Role::Civilian);

        log.emit("mafia only".to_string(), Box::new(|p: &Player| p.is_mafia()));

        assert_eq!(log.project_for(&mafia).len(), 1);
        assert_eq!(log.project_for(&civilian).len(), 0);
    }
}
