//! Typed configuration surface for a process that hosts one [`crate::Room`].
//!
//! Nothing in this crate reads `listen_host`/`listen_port`; they ride along purely so an
//! out-of-scope bootstrap process has a single `serde`-deserializable struct to load from
//! file/env instead of assembling the room's config from scattered flags.

use mafia_room_lib::GameRules;

use crate::room::TimingConfig;

/// Everything a coordinator process needs to stand up a single [`crate::Room`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ServerConfig {
    /// Address the (out-of-scope) RPC transport should bind to. Unused by `Room` itself.
    pub listen_host: String,
    /// Port the (out-of-scope) RPC transport should bind to. Unused by `Room` itself.
    pub listen_port: u16,
    pub rules: GameRules,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_host: "127.0.0.1".to_string(),
            listen_port: 50051,
            rules: GameRules {
                active_players_number: 6,
                mafia_number: 2,
                sheriff_number: 1,
            },
            timing: TimingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let config = ServerConfig::default();
        let json = serde_json::to_string(&config).expect("serializable");
        let restored: ServerConfig = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(restored.listen_port, config.listen_port);
        assert_eq!(restored.rules, config.rules);
    }
}
