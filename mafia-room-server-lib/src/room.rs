//! The Room state machine: phase transitions, role assignment, the three voting lanes, and the
//! reader-writer discipline that lets commands and view projections run concurrently.
//!
//! `Room` is a thin, cloneable handle around a single [`RwLock<RoomInner>`]. Every public method
//! on `Room` acquires the lock once and delegates to a private `RoomInner` method; cascading
//! transitions (e.g. `add_player` triggering `start_game` triggering `begin_new_day`) call one
//! another directly on the already-borrowed `&mut RoomInner` rather than re-acquiring the lock,
//! since `std::sync::RwLock` has no reentrant acquisition of its own. Phase timers run on a
//! detached thread and acquire the lock fresh when they wake; see [`crate::timer`].

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::time::Duration;

use mafia_room_lib::ChatMessageView;
use mafia_room_lib::GameRules;
use mafia_room_lib::RoomStatus;
use mafia_room_lib::RoomView;
use mafia_room_lib::Role;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::consts::COLOR_PALETTE;
use crate::consts::DEFAULT_NIGHT_PHASE_DURATION;
use crate::consts::DEFAULT_VOTE_PHASE_DURATION;
use crate::error::RoomError;
use crate::event_log::EventLog;
use crate::player::Player;
use crate::player::expose_to;
use crate::timer;
use crate::timer::TimerKind;
use crate::voting::Voting;

/// Phase-timer durations a Room is configured with.
///
/// The source hard-codes 60 seconds for both lanes; this crate keeps that as the default but
/// makes it a constructor parameter so a (out-of-scope) hosting process's config loader can
/// thread its own values through without this crate knowing the config file format.
#[derive(Copy, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TimingConfig {
    pub vote_phase: Duration,
    pub night_phase: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            vote_phase: DEFAULT_VOTE_PHASE_DURATION,
            night_phase: DEFAULT_NIGHT_PHASE_DURATION,
        }
    }
}

/// A chat line buffered during chat-phase for raw replay.
struct ChatMessage {
    author: Arc<str>,
    text: Arc<str>,
}

/// A handle to a running Room. Cheap to clone; all clones share the same underlying state.
#[derive(Clone)]
pub struct Room(Arc<RwLock<RoomInner>>);

impl Room {
    /// Builds a new room in `waiting-for-players` with a cryptographically-unpredictable room id
    /// drawn from OS entropy.
    pub fn new(rules: GameRules) -> Result<Self, RoomError> {
        Self::new_with(rules, TimingConfig::default(), StdRng::from_os_rng())
    }

    /// Builds a new room with an explicit timing config.
    pub fn new_with_timing(rules: GameRules, timing: TimingConfig) -> Result<Self, RoomError> {
        Self::new_with(rules, timing, StdRng::from_os_rng())
    }

    /// Builds a new room seeded for deterministic tests: role shuffles, color assignment, and the
    /// room id itself all become reproducible given the same seed.
    pub fn new_seeded(rules: GameRules, timing: TimingConfig, seed: u64) -> Result<Self, RoomError> {
        Self::new_with(rules, timing, StdRng::seed_from_u64(seed))
    }

    fn new_with(rules: GameRules, timing: TimingConfig, mut rng: StdRng) -> Result<Self, RoomError> {
        if rules.mafia_number == 0 {
            return Err(RoomError::InvalidGameRules(
                "mafia_number must be at least 1".to_string(),
            ));
        }
        if rules.active_players_number <= 2 * rules.mafia_number {
            return Err(RoomError::InvalidGameRules(format!(
                "active_players_number ({}) must exceed twice mafia_number ({})",
                rules.active_players_number, rules.mafia_number
            )));
        }
        if rules.mafia_number + rules.sheriff_number >= rules.active_players_number {
            return Err(RoomError::InvalidGameRules(
                "mafia_number + sheriff_number must be less than active_players_number".to_string(),
            ));
        }
        if rules.active_players_number as usize > COLOR_PALETTE.len() {
            return Err(RoomError::InvalidGameRules(format!(
                "active_players_number ({}) exceeds the {}-color palette",
                rules.active_players_number,
                COLOR_PALETTE.len()
            )));
        }

        let id: Arc<str> = Arc::from(format!("{:04}", rng.random_range(0..10_000u32)));

        let mut colors: Vec<Arc<str>> = COLOR_PALETTE.iter().map(|c| Arc::from(*c)).collect();
        colors.shuffle(&mut rng);
        colors.truncate(rules.active_players_number as usize);

        tracing::info!(room_id = %id, ?rules, "room created");

        Ok(Room(Arc::new(RwLock::new(RoomInner {
            id,
            rules,
            timing,
            day_number: 0,
            status: RoomStatus::WaitingForPlayers,
            players: HashMap::new(),
            join_order: Vec::new(),
            begin_vote: HashSet::new(),
            voting: None,
            mafia_voting: None,
            sheriff_voting: None,
            chat: None,
            events: EventLog::new(),
            exposed: HashSet::new(),
            color_pool: colors,
            timer_generation: 0,
            rng,
        }))))
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, RoomInner> {
        self.0.write().expect("room lock poisoned")
    }

    fn read(&self) -> RwLockReadGuard<'_, RoomInner> {
        self.0.read().expect("room lock poisoned")
    }

    pub fn id(&self) -> Arc<str> {
        Arc::clone(&self.read().id)
    }

    pub fn status(&self) -> RoomStatus {
        self.read().status
    }

    /// Handles a client's request to join the room.
    #[tracing::instrument(skip(self), fields(room_id = %self.id(), username))]
    pub fn connect(&self, username: &str) -> Result<(), RoomError> {
        self.write().add_player(self, username)
    }

    /// Handles a client's request to leave the room. A mismatched `room_id` is a no-op, per the
    /// transport contract (the caller may be pointed at a stale room).
    #[tracing::instrument(skip(self), fields(room_id = %self.id(), username, given_room_id = room_id))]
    pub fn disconnect(&self, username: &str, room_id: &str) -> Result<(), RoomError> {
        self.write().disconnect(username, room_id)
    }

    /// Handles a client's request to send a chat message.
    #[tracing::instrument(skip(self, text), fields(room_id = %self.id(), author))]
    pub fn send_message(&self, author: &str, text: &str) -> Result<(), RoomError> {
        self.write().send_message(author, text)
    }

    /// Handles a client's request to finish the day's chat phase.
    #[tracing::instrument(skip(self), fields(room_id = %self.id(), username))]
    pub fn begin_vote(&self, username: &str) -> Result<(), RoomError> {
        self.write().begin_vote(self, username)
    }

    /// Handles a public lynch-vote ballot.
    #[tracing::instrument(skip(self), fields(room_id = %self.id(), voter, suspect))]
    pub fn vote(&self, voter: &str, suspect: &str) -> Result<(), RoomError> {
        self.write().vote(self, voter, suspect)
    }

    /// Handles a mafia night-kill ballot.
    #[tracing::instrument(skip(self), fields(room_id = %self.id(), voter, suspect))]
    pub fn mafia_vote(&self, voter: &str, suspect: &str) -> Result<(), RoomError> {
        self.write().mafia_vote(self, voter, suspect)
    }

    /// Handles a sheriff night-investigation ballot.
    #[tracing::instrument(skip(self), fields(room_id = %self.id(), voter, suspect))]
    pub fn sheriff_vote(&self, voter: &str, suspect: &str) -> Result<(), RoomError> {
        self.write().sheriff_vote(self, voter, suspect)
    }

    /// Handles a sheriff's request to publicly reveal a target's role.
    #[tracing::instrument(skip(self), fields(room_id = %self.id(), sheriff, target))]
    pub fn expose(&self, sheriff: &str, target: &str) -> Result<(), RoomError> {
        self.write().expose(sheriff, target)
    }

    /// Returns `username`'s current filtered projection of the room.
    pub fn view(&self, username: &str) -> Result<RoomView, RoomError> {
        self.read().view(username)
    }
}

pub(crate) struct RoomInner {
    id: Arc<str>,
    rules: GameRules,
    timing: TimingConfig,
    day_number: u32,
    status: RoomStatus,
    players: HashMap<Arc<str>, Player>,
    /// Stable join order, used to seed Voting construction order deterministically.
    join_order: Vec<Arc<str>>,
    begin_vote: HashSet<Arc<str>>,
    voting: Option<Voting>,
    mafia_voting: Option<Voting>,
    sheriff_voting: Option<Voting>,
    chat: Option<Vec<ChatMessage>>,
    events: EventLog,
    exposed: HashSet<Arc<str>>,
    color_pool: Vec<Arc<str>>,
    /// Bumped on every phase entry/exit so a timer thread that wakes up after its phase already
    /// ended can recognize it's stale and no-op instead of acting.
    timer_generation: u64,
    rng: StdRng,
}

fn addressed_to(username: Arc<str>) -> Box<dyn Fn(&Player) -> bool + Send + Sync> {
    Box::new(move |p: &Player| *p.username() == username)
}

fn role_only(role: Role) -> Box<dyn Fn(&Player) -> bool + Send + Sync> {
    match role {
        Role::Mafia => Box::new(|p: &Player| p.is_mafia()),
        Role::Sheriff => Box::new(|p: &Player| p.is_sheriff()),
        _ => Box::new(|_: &Player| false),
    }
}

impl RoomInner {
    pub(crate) fn timer_generation(&self) -> u64 {
        self.timer_generation
    }

    fn usernames_where<'a>(
        &'a self,
        pred: impl Fn(&Player) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Arc<str>> + 'a {
        self.join_order
            .iter()
            .filter(move |u| self.players.get(u.as_ref()).is_some_and(&pred))
    }

    fn alive_count(&self) -> usize {
        self.usernames_where(Player::is_alive).count()
    }

    // --- command handlers -------------------------------------------------

    pub(crate) fn add_player(&mut self, room: &Room, username: &str) -> Result<(), RoomError> {
        if self.status != RoomStatus::WaitingForPlayers || self.players.contains_key(username) {
            return Err(RoomError::UsernameTaken(username.to_string()));
        }

        let username: Arc<str> = Arc::from(username);
        let color = self
            .color_pool
            .pop()
            .expect("color pool sized to rules.active_players_number");

        self.players
            .insert(Arc::clone(&username), Player::new(Arc::clone(&username), color));
        self.join_order.push(Arc::clone(&username));

        tracing::info!(%username, "player connected");
        self.events.emit_public(format!(
            "Player `{username}` connected: {}/{}",
            self.players.len(),
            self.rules.active_players_number
        ));

        if self.players.len() as u32 == self.rules.active_players_number {
            self.start_game(room);
        }

        Ok(())
    }

    pub(crate) fn disconnect(&mut self, username: &str, room_id: &str) -> Result<(), RoomError> {
        if room_id != self.id.as_ref() {
            return Ok(());
        }

        let Some(player) = self.players.get(username) else {
            return Err(RoomError::UnknownUser(username.to_string()));
        };

        if self.status.is_terminal() {
            return Ok(());
        }

        if self.status == RoomStatus::WaitingForPlayers {
            let color = Arc::clone(player.color());
            self.players.remove(username);
            self.join_order.retain(|u| u.as_ref() != username);
            self.color_pool.push(color);
        }

        tracing::info!(%username, "player disconnected");
        self.events.emit_public(format!(
            "Player `{username}` disconnected: {}/{}",
            self.players.len(),
            self.rules.active_players_number
        ));

        Ok(())
    }

    pub(crate) fn send_message(&mut self, author: &str, text: &str) -> Result<(), RoomError> {
        let Some(player) = self.players.get(author) else {
            return Err(RoomError::UnknownUser(author.to_string()));
        };
        if !player.is_alive() {
            return Ok(());
        }

        let author_arc = Arc::clone(player.username());
        let text_arc: Arc<str> = Arc::from(text);

        match self.status {
            RoomStatus::ChatPhase => {
                if let Some(chat) = self.chat.as_mut() {
                    chat.push(ChatMessage {
                        author: Arc::clone(&author_arc),
                        text: Arc::clone(&text_arc),
                    });
                }
                self.events.emit_public(format!("`{author_arc}`: {text_arc}"));
            }
            RoomStatus::NightPhase => {
                if player.is_mafia() {
                    self.events
                        .emit(format!("`{author_arc}`: {text_arc}"), role_only(Role::Mafia));
                } else if player.is_sheriff() {
                    self.events
                        .emit(format!("`{author_arc}`: {text_arc}"), role_only(Role::Sheriff));
                }
            }
            _ => {}
        }

        Ok(())
    }

    pub(crate) fn begin_vote(&mut self, room: &Room, username: &str) -> Result<(), RoomError> {
        if self.status != RoomStatus::ChatPhase {
            return Ok(());
        }

        let Some(player) = self.players.get(username) else {
            return Err(RoomError::UnknownUser(username.to_string()));
        };
        if !player.is_alive() || self.begin_vote.contains(username) {
            return Ok(());
        }

        let username_arc = Arc::clone(player.username());
        self.begin_vote.insert(Arc::clone(&username_arc));

        let count = self.begin_vote.len();
        let alive = self.alive_count();
        tracing::info!(username = %username_arc, count, alive, "player requested to finish day phase");

        if self.day_number == 1 {
            self.events
                .emit_public(format!("`{username_arc}` wants to finish day phase: {count}/{alive}"));
        } else {
            self.events.emit_public(format!(
                "`{username_arc}` wants to finish day phase and begin vote: {count}/{alive}"
            ));
        }

        if count == alive {
            if self.day_number == 1 {
                self.start_night_phase(room);
            } else {
                self.start_vote_phase(room);
            }
        }

        Ok(())
    }

    pub(crate) fn vote(&mut self, room: &Room, voter: &str, suspect: &str) -> Result<(), RoomError> {
        if self.status != RoomStatus::VotePhase {
            return Ok(());
        }

        let Some(voter_player) = self.players.get(voter) else {
            return Err(RoomError::UnknownUser(voter.to_string()));
        };
        if !voter_player.is_alive() {
            return Ok(());
        }
        let Some(suspect_player) = self.players.get(suspect) else {
            return Ok(());
        };
        if !suspect_player.is_alive() {
            return Ok(());
        }

        let voter_arc = Arc::clone(voter_player.username());
        let suspect_arc = Arc::clone(suspect_player.username());

        let everyone_voted = {
            let voting = self
                .voting
                .as_mut()
                .expect("voting lane armed during vote-phase");
            if !voting.can_vote(&voter_arc) || !voting.can_be_suspect(&suspect_arc) {
                return Ok(());
            }
            voting.vote(&voter_arc, &suspect_arc);
            voting.everyone_voted()
        };

        let count = self.voting.as_ref().unwrap().count(&suspect_arc);
        tracing::info!(voter = %voter_arc, suspect = %suspect_arc, count, "public vote cast");
        self.events.emit_public(format!("Votes for `{suspect_arc}`: {count}"));

        if everyone_voted {
            self.timer_generation += 1;
            self.finish_vote_phase(room);
        }

        Ok(())
    }

    pub(crate) fn mafia_vote(
        &mut self,
        room: &Room,
        voter: &str,
        suspect: &str,
    ) -> Result<(), RoomError> {
        if self.status != RoomStatus::NightPhase {
            return Ok(());
        }

        let Some(voter_player) = self.players.get(voter) else {
            return Err(RoomError::UnknownUser(voter.to_string()));
        };
        if !voter_player.is_alive() || !voter_player.is_mafia() {
            return Ok(());
        }
        let Some(suspect_player) = self.players.get(suspect) else {
            return Ok(());
        };
        if !suspect_player.is_alive() {
            return Ok(());
        }

        let voter_arc = Arc::clone(voter_player.username());
        let suspect_arc = Arc::clone(suspect_player.username());

        {
            let voting = self
                .mafia_voting
                .as_mut()
                .expect("mafia voting lane armed during night-phase");
            if !voting.can_vote(&voter_arc) || !voting.can_be_suspect(&suspect_arc) {
                return Ok(());
            }
            voting.vote(&voter_arc, &suspect_arc);
        }

        let count = self.mafia_voting.as_ref().unwrap().count(&suspect_arc);
        tracing::info!(voter = %voter_arc, suspect = %suspect_arc, count, "mafia vote cast");
        self.events
            .emit(format!("Votes for `{suspect_arc}`: {count}"), role_only(Role::Mafia));

        self.maybe_finish_night_phase(room);

        Ok(())
    }

    pub(crate) fn sheriff_vote(
        &mut self,
        room: &Room,
        voter: &str,
        suspect: &str,
    ) -> Result<(), RoomError> {
        if self.status != RoomStatus::NightPhase {
            return Ok(());
        }

        let Some(voter_player) = self.players.get(voter) else {
            return Err(RoomError::UnknownUser(voter.to_string()));
        };
        if !voter_player.is_alive() || !voter_player.is_sheriff() {
            return Ok(());
        }
        let Some(suspect_player) = self.players.get(suspect) else {
            return Ok(());
        };
        if !suspect_player.is_alive() {
            return Ok(());
        }

        let voter_arc = Arc::clone(voter_player.username());
        let suspect_arc = Arc::clone(suspect_player.username());

        {
            let voting = self
                .sheriff_voting
                .as_mut()
                .expect("sheriff voting lane armed during night-phase");
            if !voting.can_vote(&voter_arc) || !voting.can_be_suspect(&suspect_arc) {
                return Ok(());
            }
            voting.vote(&voter_arc, &suspect_arc);
        }

        let count = self.sheriff_voting.as_ref().unwrap().count(&suspect_arc);
        tracing::info!(voter = %voter_arc, suspect = %suspect_arc, count, "sheriff vote cast");
        self.events.emit(
            format!("Votes for `{suspect_arc}`: {count}"),
            role_only(Role::Sheriff),
        );

        self.maybe_finish_night_phase(room);

        Ok(())
    }

    pub(crate) fn expose(&mut self, sheriff: &str, target: &str) -> Result<(), RoomError> {
        if self.status.is_terminal() {
            return Ok(());
        }

        let Some(sheriff_player) = self.players.get(sheriff) else {
            return Err(RoomError::UnknownUser(sheriff.to_string()));
        };
        if !sheriff_player.is_alive() || !sheriff_player.is_sheriff() {
            return Ok(());
        }
        let Some(target_player) = self.players.get(target) else {
            return Ok(());
        };
        if !target_player.is_alive() {
            return Ok(());
        }

        let target_arc = Arc::clone(target_player.username());
        if self.exposed.contains(&target_arc) {
            return Ok(());
        }

        self.exposed.insert(Arc::clone(&target_arc));
        if let Some(player) = self.players.get_mut(&target_arc) {
            player.mark_exposed();
        }

        expose_to(
            &target_arc,
            self.players
                .values_mut()
                .filter(|p| p.username() != &target_arc),
        );

        tracing::info!(%sheriff, target = %target_arc, "player publicly exposed");
        self.events.emit_public(format!("Player was exposed: `{target_arc}`"));

        Ok(())
    }

    pub(crate) fn view(&self, username: &str) -> Result<RoomView, RoomError> {
        let Some(viewer) = self.players.get(username) else {
            return Err(RoomError::UnknownUser(username.to_string()));
        };

        let players = self
            .join_order
            .iter()
            .filter_map(|u| self.players.get(u))
            .map(|p| p.project_for(viewer))
            .collect();

        let chat = self.chat.as_ref().map(|messages| {
            messages
                .iter()
                .map(|m| ChatMessageView {
                    author: Arc::clone(&m.author),
                    text: Arc::clone(&m.text),
                })
                .collect()
        });

        let voting = self.voting.as_ref().map(Voting::project);

        Ok(RoomView {
            room_id: Arc::clone(&self.id),
            status: self.status,
            rules: self.rules,
            day_number: self.day_number,
            players,
            chat,
            voting,
            events: self.events.project_for(viewer),
        })
    }

    // --- phase transitions --------------------------------------------------

    fn start_game(&mut self, room: &Room) {
        tracing::info!("starting game");

        let mut pool = self.join_order.clone();
        pool.shuffle(&mut self.rng);

        let mafia_count = self.rules.mafia_number as usize;
        let sheriff_count = self.rules.sheriff_number as usize;

        for username in pool.drain(..mafia_count) {
            self.assign_role(&username, Role::Mafia);
        }
        for username in pool.drain(..sheriff_count) {
            self.assign_role(&username, Role::Sheriff);
        }
        for username in pool.drain(..) {
            self.assign_role(&username, Role::Civilian);
        }

        for username in self.join_order.clone() {
            let role = self.players[&username].role();
            self.events
                .emit(format!("You got role {}", role.label()), addressed_to(username));
        }

        self.enter_day(room, 1);
    }

    fn assign_role(&mut self, username: &Arc<str>, role: Role) {
        self.players
            .get_mut(username)
            .expect("player exists")
            .assign(role);
    }

    fn enter_day(&mut self, room: &Room, day_number: u32) {
        self.day_number = day_number;
        tracing::info!(day_number, "day began");
        self.events.emit_public(format!("DAY {day_number}"));
        self.start_chat_phase(room);
    }

    fn start_chat_phase(&mut self, _room: &Room) {
        self.chat = Some(Vec::new());
        self.begin_vote.clear();
        self.status = RoomStatus::ChatPhase;
        // No timer runs during chat-phase; bump the generation so a stray in-flight timer from
        // the phase we just left can't act on this one.
        self.timer_generation += 1;
        self.events.emit_public("Day phase: chat");
    }

    fn begin_new_day(&mut self, room: &Room) {
        let next = self.day_number + 1;
        self.enter_day(room, next);
    }

    fn start_vote_phase(&mut self, room: &Room) {
        self.begin_vote.clear();
        let alive: Vec<Arc<str>> = self.usernames_where(Player::is_alive).cloned().collect();
        self.voting = Some(Voting::new(alive.iter(), alive.iter()));
        self.status = RoomStatus::VotePhase;

        self.timer_generation += 1;
        let generation = self.timer_generation;
        self.events
            .emit_public("Day phase finished: vote for mafia (60 seconds)");
        timer::arm(room.clone(), self.timing.vote_phase, generation, TimerKind::Vote);
    }

    pub(crate) fn finish_vote_phase(&mut self, room: &Room) {
        let Some(voting) = self.voting.take() else {
            return;
        };

        let victim = voting.winner();
        self.kill_and_announce(&victim);
        self.resolve_win_or_else(room, Self::start_night_phase);
    }

    fn start_night_phase(&mut self, room: &Room) {
        self.chat = None;
        self.voting = None;

        let alive: Vec<Arc<str>> = self.usernames_where(Player::is_alive).cloned().collect();
        let mafia: Vec<Arc<str>> = self
            .usernames_where(|p| p.is_alive() && p.is_mafia())
            .cloned()
            .collect();
        let sheriffs: Vec<Arc<str>> = self
            .usernames_where(|p| p.is_alive() && p.is_sheriff())
            .cloned()
            .collect();

        self.mafia_voting = Some(Voting::new(mafia.iter(), alive.iter()));
        self.sheriff_voting = Some(Voting::new(sheriffs.iter(), alive.iter()));
        self.status = RoomStatus::NightPhase;

        self.timer_generation += 1;
        let generation = self.timer_generation;
        tracing::info!("night phase began");
        self.events
            .emit_public("Night phase: mafia choose victim, sheriffs investigate people (60 seconds)");
        timer::arm(room.clone(), self.timing.night_phase, generation, TimerKind::Night);
    }

    fn maybe_finish_night_phase(&mut self, room: &Room) {
        let mafia_done = self.mafia_voting.as_ref().is_none_or(Voting::everyone_voted);
        let sheriff_done = self.sheriff_voting.as_ref().is_none_or(Voting::everyone_voted);

        if mafia_done && sheriff_done {
            self.timer_generation += 1;
            self.finish_night_phase(room);
        }
    }

    pub(crate) fn finish_night_phase(&mut self, room: &Room) {
        let (Some(mafia_voting), Some(sheriff_voting)) =
            (self.mafia_voting.take(), self.sheriff_voting.take())
        else {
            return;
        };

        let victim = mafia_voting.winner();
        self.kill_and_announce(&victim);

        let investigated = sheriff_voting.winner();
        let investigated_role = self
            .players
            .get(&investigated)
            .map(Player::role)
            .unwrap_or(Role::Unknown);

        let sheriffs: Vec<Arc<str>> = self
            .usernames_where(|p| p.is_alive() && p.is_sheriff())
            .cloned()
            .collect();
        for sheriff in &sheriffs {
            if let Some(player) = self.players.get_mut(sheriff) {
                player.learn(&investigated);
            }
        }

        tracing::info!(target = %investigated, role = ?investigated_role, "sheriffs investigated target");
        self.events.emit(
            format!("Player was exposed to sheriffs: `{investigated}`. Now you expose him publicly"),
            role_only(Role::Sheriff),
        );

        self.resolve_win_or_else(room, Self::begin_new_day);
    }

    fn kill_and_announce(&mut self, username: &Arc<str>) {
        let role = {
            let player = self.players.get_mut(username).expect("suspect exists");
            player.kill();
            player.role()
        };
        tracing::info!(%username, ?role, "player killed");
        self.events
            .emit_public(format!("Player was killed: `{username}` ({})", role.label()));
    }

    /// Evaluates the win/lose predicates after a kill; if neither holds, runs `otherwise`.
    fn resolve_win_or_else(&mut self, room: &Room, otherwise: impl FnOnce(&mut Self, &Room)) {
        let alive = self.alive_count();
        let mafia_alive = self
            .usernames_where(|p| p.is_alive() && p.is_mafia())
            .count();

        if mafia_alive == 0 {
            self.set_mafia_lost();
        } else if mafia_alive * 2 >= alive {
            self.set_mafia_won();
        } else {
            otherwise(self, room);
        }
    }

    fn set_mafia_won(&mut self) {
        self.status = RoomStatus::MafiaWon;
        self.timer_generation += 1;
        self.reveal_everyone();
        tracing::info!("mafia won");
        self.events.emit_public("Mafia WON!");
    }

    fn set_mafia_lost(&mut self) {
        self.status = RoomStatus::MafiaLost;
        self.timer_generation += 1;
        self.reveal_everyone();
        tracing::info!("mafia lost");
        self.events.emit_public("Mafia LOST!");
    }

    /// Every player learns every other player's true role, used for the terminal global reveal.
    fn reveal_everyone(&mut self) {
        let usernames = self.join_order.clone();
        for subject in &usernames {
            expose_to(subject, self.players.values_mut().filter(|p| p.username() != subject));
        }
    }
}
