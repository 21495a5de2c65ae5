//! Local player accounts.
//!
//! Accounts exist so stats and leaderboard entries carry a name. Passwords are
//! stored through [`placeholder_hash`] and compared as stored; this is not a
//! credential system.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::store::KeyValueStore;

use super::save;
use super::stats::UserStats;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 30;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub stats: UserStats,
    #[serde(default)]
    pub join_date_ms: f64,
    #[serde(default)]
    pub last_login_ms: f64,
}

/// Stand-in for a real password hash.
pub fn placeholder_hash(password: &str) -> String {
    password.to_string()
}

fn name_char_allowed(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' ' || c == '-' || c == '\'' || c == '.'
}

/// Account book over the shared key-value store.
pub struct Accounts {
    store: Rc<dyn KeyValueStore>,
}

impl Accounts {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Register a player and sign them in.
    pub fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
        now_ms: f64,
    ) -> Result<UserRecord> {
        let name = name.trim();
        let store = self.store.as_ref();
        let mut users = save::load_users(store);

        if password != confirm {
            return Err(QuizError::PasswordMismatch);
        }
        if users.iter().any(|u| u.email == email) {
            return Err(QuizError::EmailTaken);
        }
        if users
            .iter()
            .any(|u| u.name.to_lowercase() == name.to_lowercase())
        {
            return Err(QuizError::NameTaken);
        }
        let len = name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
            return Err(QuizError::InvalidNameLength);
        }
        if !name.chars().all(name_char_allowed) {
            return Err(QuizError::InvalidNameChars);
        }

        let user = UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password: placeholder_hash(password),
            stats: UserStats::default(),
            join_date_ms: now_ms,
            last_login_ms: now_ms,
        };
        users.push(user.clone());
        save::save_users(store, &users)?;
        save::save_current_user(store, Some(&user))?;
        log::info!("registered player {}", user.name);
        Ok(user)
    }

    pub fn log_in(&self, email: &str, password: &str, now_ms: f64) -> Result<UserRecord> {
        let store = self.store.as_ref();
        let hashed = placeholder_hash(password);
        let mut user = save::load_users(store)
            .into_iter()
            .find(|u| u.email == email && u.password == hashed)
            .ok_or(QuizError::InvalidCredentials)?;
        user.last_login_ms = now_ms;
        save::store_user(store, &user)?;
        log::info!("{} signed in", user.name);
        Ok(user)
    }

    pub fn log_out(&self) {
        if let Err(e) = save::save_current_user(self.store.as_ref(), None) {
            log::warn!("sign out failed: {e}");
        }
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        save::load_current_user(self.store.as_ref())
    }

    /// Edit the signed-in player and persist the change.
    pub fn update_current(&self, edit: impl FnOnce(&mut UserRecord)) -> Result<UserRecord> {
        let store = self.store.as_ref();
        let mut user = save::load_current_user(store).ok_or(QuizError::NotLoggedIn)?;
        edit(&mut user);
        save::store_user(store, &user)?;
        Ok(user)
    }

    /// All registered players, most games played first.
    pub fn players_by_activity(&self) -> Vec<UserRecord> {
        let mut users = save::load_users(self.store.as_ref());
        users.sort_by(|a, b| b.stats.total_games.cmp(&a.stats.total_games));
        users
    }
}
