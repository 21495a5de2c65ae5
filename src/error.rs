//! Error type shared by the quiz core, persistence and accounts.

use std::fmt;

use crate::quiz::state::Level;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The requested level is above the unlock frontier.
    LevelLocked { requested: Level, playable: Level },
    /// The key-value store refused a write.
    Storage(String),
    /// Stored data under `key` could not be decoded.
    Corrupt { key: String, reason: String },
    PasswordMismatch,
    EmailTaken,
    NameTaken,
    InvalidNameLength,
    InvalidNameChars,
    InvalidCredentials,
    NotLoggedIn,
    EmptyFields,
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::LevelLocked {
                requested,
                playable,
            } => write!(
                f,
                "level {requested} is locked; complete level {playable} first"
            ),
            QuizError::Storage(reason) => write!(f, "storage write failed: {reason}"),
            QuizError::Corrupt { key, reason } => {
                write!(f, "stored data under `{key}` is unreadable: {reason}")
            }
            QuizError::PasswordMismatch => f.write_str("Passwords do not match!"),
            QuizError::EmailTaken => f.write_str("Email already registered!"),
            QuizError::NameTaken => {
                f.write_str("This name is already taken. Please choose a different name.")
            }
            QuizError::InvalidNameLength => f.write_str("Name must be between 2 and 30 characters."),
            QuizError::InvalidNameChars => f.write_str(
                "Name can only contain letters, spaces, hyphens, apostrophes, and periods.",
            ),
            QuizError::InvalidCredentials => f.write_str("Invalid email or password"),
            QuizError::NotLoggedIn => f.write_str("no player is signed in"),
            QuizError::EmptyFields => f.write_str("Please fill in all fields."),
        }
    }
}

impl std::error::Error for QuizError {}

pub type Result<T> = std::result::Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_message_names_both_levels() {
        let err = QuizError::LevelLocked {
            requested: 5,
            playable: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn corrupt_message_names_key() {
        let err = QuizError::Corrupt {
            key: "users".into(),
            reason: "expected value".into(),
        };
        assert!(err.to_string().contains("`users`"));
    }
}
