//! Quiz save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current progress format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format still readable. Only bump on a
//!   breaking change (a field removed or its meaning changed).
//!
//! Saves at or above `MIN_COMPATIBLE_VERSION` load with missing fields filled
//! from defaults. Anything older, newer-than-understood or unparsable is
//! discarded and the player starts from level 1.
//!
//! Before versioned saves existed the unlock frontier lived under the bare key
//! `maxUnlockedLevel` as a decimal string. It is migrated on first load.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{read_json, read_json_or_discard, write_json, KeyValueStore};

use super::accounts::UserRecord;
use super::state::{Level, ProgressState};

const SAVE_VERSION: u32 = 1;
const MIN_COMPATIBLE_VERSION: u32 = 1;

pub const PROGRESS_KEY: &str = "math_quiz_progress";
pub const LEGACY_MAX_LEVEL_KEY: &str = "maxUnlockedLevel";
pub const USERS_KEY: &str = "users";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const GAME_STATS_KEY: &str = "gameStats";
pub const LEADERBOARD_KEY: &str = "leaderboard";

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    progress: ProgressSave,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct ProgressSave {
    current_level: Level,
    max_unlocked_level: Level,
}

impl Default for ProgressSave {
    fn default() -> Self {
        let p = ProgressState::default();
        Self {
            current_level: p.current_level,
            max_unlocked_level: p.max_unlocked_level,
        }
    }
}

fn extract_save(progress: &ProgressState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        progress: ProgressSave {
            current_level: progress.current_level,
            max_unlocked_level: progress.max_unlocked_level,
        },
    }
}

fn apply_save(save: ProgressSave) -> ProgressState {
    ProgressState {
        current_level: save.current_level.max(1),
        max_unlocked_level: save.max_unlocked_level.max(1),
    }
}

pub fn save_progress(store: &dyn KeyValueStore, progress: &ProgressState) -> Result<()> {
    write_json(store, PROGRESS_KEY, &extract_save(progress))
}

/// Load progress, migrating the legacy key if no versioned save exists.
/// Never fails: unusable data yields the default (level 1 only).
pub fn load_progress(store: &dyn KeyValueStore) -> ProgressState {
    match read_json::<SaveData>(store, PROGRESS_KEY) {
        Ok(Some(save)) if save.version >= MIN_COMPATIBLE_VERSION && save.version <= SAVE_VERSION => {
            return apply_save(save.progress);
        }
        Ok(Some(save)) => {
            log::warn!(
                "progress save version {} unsupported (need {}..={}); starting fresh",
                save.version,
                MIN_COMPATIBLE_VERSION,
                SAVE_VERSION
            );
            store.remove(PROGRESS_KEY);
            return ProgressState::default();
        }
        Ok(None) => {}
        Err(e) => {
            log::warn!("{e}; starting fresh");
            store.remove(PROGRESS_KEY);
            return ProgressState::default();
        }
    }

    match migrate_legacy(store) {
        Some(progress) => progress,
        None => ProgressState::default(),
    }
}

fn migrate_legacy(store: &dyn KeyValueStore) -> Option<ProgressState> {
    let raw = store.get(LEGACY_MAX_LEVEL_KEY)?;
    let max_unlocked_level = raw.trim().parse::<Level>().ok().filter(|l| *l >= 1)?;
    let progress = ProgressState {
        current_level: 1,
        max_unlocked_level,
    };
    match save_progress(store, &progress) {
        Ok(()) => {
            store.remove(LEGACY_MAX_LEVEL_KEY);
            log::info!("migrated legacy progress: level {max_unlocked_level} unlocked");
        }
        Err(e) => log::warn!("could not migrate legacy progress: {e}"),
    }
    Some(progress)
}

// ── Accounts ───────────────────────────────────────────────────

pub fn load_users(store: &dyn KeyValueStore) -> Vec<UserRecord> {
    read_json_or_discard(store, USERS_KEY).unwrap_or_default()
}

pub fn save_users(store: &dyn KeyValueStore, users: &[UserRecord]) -> Result<()> {
    write_json(store, USERS_KEY, users)
}

pub fn load_current_user(store: &dyn KeyValueStore) -> Option<UserRecord> {
    read_json_or_discard(store, CURRENT_USER_KEY)
}

/// Store `user` as the signed-in player, or sign out with `None`.
pub fn save_current_user(store: &dyn KeyValueStore, user: Option<&UserRecord>) -> Result<()> {
    match user {
        Some(user) => write_json(store, CURRENT_USER_KEY, user),
        None => {
            store.remove(CURRENT_USER_KEY);
            Ok(())
        }
    }
}

/// Write `user` back to both the signed-in slot and its entry in the user list.
pub fn store_user(store: &dyn KeyValueStore, user: &UserRecord) -> Result<()> {
    let mut users = load_users(store);
    if let Some(slot) = users.iter_mut().find(|u| u.email == user.email) {
        *slot = user.clone();
        save_users(store, &users)?;
    }
    save_current_user(store, Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::stats::UserStats;
    use crate::store::MemoryStore;

    fn user(name: &str, email: &str) -> UserRecord {
        UserRecord {
            name: name.into(),
            email: email.into(),
            password: "pw".into(),
            stats: UserStats::default(),
            join_date_ms: 0.0,
            last_login_ms: 0.0,
        }
    }

    #[test]
    fn progress_roundtrip() {
        let store = MemoryStore::new();
        let p = ProgressState {
            current_level: 4,
            max_unlocked_level: 7,
        };
        save_progress(&store, &p).unwrap();
        assert_eq!(load_progress(&store), p);
    }

    #[test]
    fn empty_store_loads_default() {
        let store = MemoryStore::new();
        assert_eq!(load_progress(&store), ProgressState::default());
    }

    #[test]
    fn save_carries_version() {
        let store = MemoryStore::new();
        save_progress(&store, &ProgressState::default()).unwrap();
        let raw = store.get(PROGRESS_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SAVE_VERSION);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let store = MemoryStore::new();
        store
            .set(PROGRESS_KEY, r#"{"version":1,"progress":{"max_unlocked_level":9}}"#)
            .unwrap();
        let p = load_progress(&store);
        assert_eq!(p.max_unlocked_level, 9);
        assert_eq!(p.current_level, 1);
    }

    #[test]
    fn future_version_is_discarded() {
        let store = MemoryStore::new();
        store
            .set(PROGRESS_KEY, r#"{"version":99,"progress":{"max_unlocked_level":9}}"#)
            .unwrap();
        assert_eq!(load_progress(&store), ProgressState::default());
        assert_eq!(store.get(PROGRESS_KEY), None);
    }

    #[test]
    fn corrupt_save_is_discarded() {
        let store = MemoryStore::new();
        store.set(PROGRESS_KEY, "not json").unwrap();
        assert_eq!(load_progress(&store), ProgressState::default());
        assert_eq!(store.get(PROGRESS_KEY), None);
    }

    #[test]
    fn zero_levels_are_repaired() {
        let store = MemoryStore::new();
        store
            .set(
                PROGRESS_KEY,
                r#"{"version":1,"progress":{"current_level":0,"max_unlocked_level":0}}"#,
            )
            .unwrap();
        assert_eq!(load_progress(&store), ProgressState::default());
    }

    #[test]
    fn legacy_key_is_migrated() {
        let store = MemoryStore::new();
        store.set(LEGACY_MAX_LEVEL_KEY, "12").unwrap();
        let p = load_progress(&store);
        assert_eq!(p.max_unlocked_level, 12);
        assert_eq!(store.get(LEGACY_MAX_LEVEL_KEY), None);
        assert!(store.get(PROGRESS_KEY).is_some());
        // second load reads the versioned save
        assert_eq!(load_progress(&store), p);
    }

    #[test]
    fn garbage_legacy_key_is_ignored() {
        let store = MemoryStore::new();
        store.set(LEGACY_MAX_LEVEL_KEY, "twelve").unwrap();
        assert_eq!(load_progress(&store), ProgressState::default());
    }

    #[test]
    fn versioned_save_wins_over_legacy() {
        let store = MemoryStore::new();
        store.set(LEGACY_MAX_LEVEL_KEY, "50").unwrap();
        save_progress(
            &store,
            &ProgressState {
                current_level: 2,
                max_unlocked_level: 3,
            },
        )
        .unwrap();
        assert_eq!(load_progress(&store).max_unlocked_level, 3);
    }

    #[test]
    fn sign_out_clears_current_user() {
        let store = MemoryStore::new();
        save_current_user(&store, Some(&user("Asha", "a@x.io"))).unwrap();
        save_current_user(&store, None).unwrap();
        assert!(load_current_user(&store).is_none());
    }
}
