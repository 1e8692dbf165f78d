use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("user '{0}' is not in the room")]
    UnknownUser(String),
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    #[error("invalid game rules: {0}")]
    InvalidGameRules(String),
}
