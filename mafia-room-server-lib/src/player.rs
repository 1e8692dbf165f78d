//! A single player's hidden state and the projection rules that keep it hidden.

use std::collections::HashSet;
use std::sync::Arc;

use mafia_room_lib::LifeStatus;
use mafia_room_lib::PlayerView;
use mafia_room_lib::Role;

/// State for a player that has joined the room.
///
/// Role-reveal is computed at projection time from the `knowledge` set rather than baked into a
/// stored view, so there's no stale snapshot that could leak a role early.
pub(crate) struct Player {
    username: Arc<str>,
    role: Role,
    status: LifeStatus,
    color: Arc<str>,
    exposed: bool,
    /// Usernames whose true role this player is allowed to see. Always contains `username` itself.
    knowledge: HashSet<Arc<str>>,
}

impl Player {
    pub(crate) fn new(username: Arc<str>, color: Arc<str>) -> Self {
        let mut knowledge = HashSet::new();
        knowledge.insert(Arc::clone(&username));

        Self {
            username,
            role: Role::Unknown,
            status: LifeStatus::Unknown,
            color,
            exposed: false,
            knowledge,
        }
    }

    pub(crate) fn username(&self) -> &Arc<str> {
        &self.username
    }

    pub(crate) fn color(&self) -> &Arc<str> {
        &self.color
    }

    pub(crate) fn role(&self) -> Role {
        self.role
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.status == LifeStatus::Alive
    }

    pub(crate) fn is_mafia(&self) -> bool {
        self.role == Role::Mafia
    }

    pub(crate) fn is_sheriff(&self) -> bool {
        self.role == Role::Sheriff
    }

    /// Assigns this player's role at game start. Callable once per player.
    pub(crate) fn assign(&mut self, role: Role) {
        self.role = role;
        self.status = LifeStatus::Alive;
    }

    /// Marks the player dead. Idempotent in effect; callers are expected to call this at most
    /// once per player.
    pub(crate) fn kill(&mut self) {
        self.status = LifeStatus::Dead;
    }

    /// Adds `other`'s username to this player's knowledge set.
    pub(crate) fn learn(&mut self, other: &Arc<str>) {
        self.knowledge.insert(Arc::clone(other));
    }

    /// Marks this player as publicly exposed. The audience side of exposure (each viewer learning
    /// this player's role) is applied separately via [`Player::learn`] on each audience member,
    /// since it mutates players other than `self`.
    pub(crate) fn mark_exposed(&mut self) {
        self.exposed = true;
    }

    /// `true` if `viewer` (this player) knows `other`'s true role.
    pub(crate) fn knows(&self, other: &Player) -> bool {
        if self.status == LifeStatus::Dead || other.status == LifeStatus::Dead {
            return true;
        }

        if self.is_mafia() && other.is_mafia() {
            return true;
        }

        if self.is_sheriff() && other.is_sheriff() {
            return true;
        }

        self.knowledge.contains(&other.username)
    }

    /// Returns the view of `self` as seen by `viewer`.
    pub(crate) fn project_for(&self, viewer: &Player) -> PlayerView {
        PlayerView {
            username: Arc::clone(&self.username),
            role: if viewer.knows(self) {
                self.role
            } else {
                Role::Unknown
            },
            status: self.status,
            color: Arc::clone(&self.color),
            exposed: self.exposed,
        }
    }
}

/// Has every member of `audience` learn `subject`'s true role.
pub(crate) fn expose_to<'a>(subject: &Arc<str>, audience: impl Iterator<Item = &'a mut Player>) {
    for player in audience {
        player.learn(subject);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> Player {
        Player::new(Arc::from(name), Arc::from("red"))
    }

    #[test]
    fn knowledge_always_contains_self() {
        let alice = player("alice");
        assert!(alice.knowledge.contains(&alice.username));
    }

    #[test]
    fn dead_players_know_everyone() {
        let mut alice = player("alice");
        alice.assign(Role::Civilian);
        let mut bob = player("bob");
        bob.assign(Role::Civilian);
        bob.kill();

        assert!(alice.knows(&bob));
        assert!(bob.knows(&alice));
    }

    #[test]
    fn same_allegiance_roles_know_each_other() {
        let mut alice = player("alice");
        alice.assign(Role::Mafia);
        let mut bob = player("bob");
        bob.assign(Role::Mafia);

        assert!(alice.knows(&bob));
        assert!(bob.knows(&alice));

        let mut carol = player("carol");
        carol.assign(Role::Civilian);
        assert!(!alice.knows(&carol));
    }

    #[test]
    fn project_hides_role_until_known() {
        let mut alice = player("alice");
        alice.assign(Role::Civilian);
        let mut bob = player("bob");
        bob.assign(Role::Mafia);

        let view = bob.project_for(&alice);
        assert_eq!(view.role, Role::Unknown);

        alice.learn(bob.username());
        let view = bob.project_for(&alice);
        assert_eq!(view.role, Role::Mafia);
    }
}
