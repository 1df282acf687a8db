//! In-memory stores backing the unit tests, with the same conditional
//! update semantics as the Postgres implementations and a few hooks to
//! inject the failures the real store can produce.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    database::{GiveawayStore, SettingsStore},
    giveaway::GiveawayError,
    models::{
        giveaway::{Giveaway, GiveawayFilter, GiveawaySort, SortOrder},
        settings::{BannedUser, GiveawayAccess, GiveawaySettings},
    },
};

pub struct MemoryGiveawayStore {
    records: Mutex<HashMap<i64, Giveaway>>,
    create_failure: AtomicBool,
    participant_conflicts: Mutex<HashSet<i64>>,
    complete_conflicts: Mutex<HashSet<i64>>,
}

impl MemoryGiveawayStore {
    pub fn new() -> Self {
        MemoryGiveawayStore {
            records: Mutex::new(HashMap::new()),
            create_failure: AtomicBool::new(false),
            participant_conflicts: Mutex::new(HashSet::new()),
            complete_conflicts: Mutex::new(HashSet::new()),
        }
    }

    pub async fn insert(&self, giveaway: Giveaway) {
        self.records.lock().unwrap().insert(giveaway.id, giveaway);
    }

    /// Marks a giveaway ended as if another process committed the swap.
    pub async fn end_out_of_band(&self, id: i64) {
        let mut records = self.records.lock().unwrap();
        if let Some(giveaway) = records.get_mut(&id) {
            giveaway.ended = true;
            giveaway.version += 1;
        }
    }

    /// The next `create` call fails as if the store were unreachable.
    pub fn fail_next_create(&self) {
        self.create_failure.store(true, Ordering::SeqCst);
    }

    /// The next participant update for `id` reports a version conflict.
    pub fn conflict_next_participant_updates(&self, id: i64) {
        self.participant_conflicts.lock().unwrap().insert(id);
    }

    /// The next `complete` call for `id` loses the compare-and-swap.
    pub fn conflict_next_complete(&self, id: i64) {
        self.complete_conflicts.lock().unwrap().insert(id);
    }
}

#[async_trait]
impl GiveawayStore for MemoryGiveawayStore {
    async fn create(&self, giveaway: &Giveaway) -> Result<(), GiveawayError> {
        if self.create_failure.swap(false, Ordering::SeqCst) {
            return Err(GiveawayError::Persistence("store unavailable".to_string()));
        }
        self.records
            .lock()
            .unwrap()
            .insert(giveaway.id, giveaway.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Giveaway>, GiveawayError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_message_id(
        &self,
        message_id: &str,
    ) -> Result<Option<Giveaway>, GiveawayError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|giveaway| giveaway.message_id == message_id)
            .cloned())
    }

    async fn update_participants(
        &self,
        id: i64,
        participants: &[String],
        expected_version: i64,
    ) -> Result<bool, GiveawayError> {
        if self.participant_conflicts.lock().unwrap().remove(&id) {
            return Ok(false);
        }
        let mut records = self.records.lock().unwrap();
        let Some(giveaway) = records.get_mut(&id) else {
            return Ok(false);
        };
        if giveaway.ended || giveaway.version != expected_version {
            return Ok(false);
        }
        giveaway.participants = participants.to_vec();
        giveaway.version += 1;
        Ok(true)
    }

    async fn complete(&self, id: i64, winners: &[String]) -> Result<bool, GiveawayError> {
        if self.complete_conflicts.lock().unwrap().remove(&id) {
            return Ok(false);
        }
        let mut records = self.records.lock().unwrap();
        let Some(giveaway) = records.get_mut(&id) else {
            return Ok(false);
        };
        if giveaway.ended {
            return Ok(false);
        }
        giveaway.winners = winners.to_vec();
        giveaway.ended = true;
        giveaway.version += 1;
        Ok(true)
    }

    async fn append_winners(
        &self,
        id: i64,
        new_winners: &[String],
        expected_version: i64,
    ) -> Result<bool, GiveawayError> {
        let mut records = self.records.lock().unwrap();
        let Some(giveaway) = records.get_mut(&id) else {
            return Ok(false);
        };
        if !giveaway.ended || giveaway.version != expected_version {
            return Ok(false);
        }
        giveaway.winners.extend(new_winners.iter().cloned());
        giveaway.version += 1;
        Ok(true)
    }

    async fn find_due(&self, now: i64) -> Result<Vec<Giveaway>, GiveawayError> {
        let mut due: Vec<Giveaway> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|giveaway| !giveaway.ended && giveaway.end_time <= now)
            .cloned()
            .collect();
        due.sort_by_key(|giveaway| giveaway.end_time);
        Ok(due)
    }

    async fn find_by_filter(
        &self,
        filter: &GiveawayFilter,
    ) -> Result<Vec<Giveaway>, GiveawayError> {
        let mut matches: Vec<Giveaway> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|giveaway| match filter.active {
                Some(active) => giveaway.ended != active,
                None => true,
            })
            .cloned()
            .collect();

        let sort_by = filter.sort_by.unwrap_or(GiveawaySort::Id);
        matches.sort_by_key(|giveaway| match sort_by {
            GiveawaySort::Id => giveaway.id,
            GiveawaySort::StartTime => giveaway.start_time,
            GiveawaySort::EndTime => giveaway.end_time,
            GiveawaySort::Participants => giveaway.participants.len() as i64,
        });
        let order = filter.sort_order.unwrap_or(if filter.sort_by.is_none() {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        });
        if order == SortOrder::Descending {
            matches.reverse();
        }

        if let Some(limit) = filter.limit {
            matches.truncate(limit.max(0) as usize);
        }
        Ok(matches)
    }
}

pub struct MemorySettingsStore {
    settings: Mutex<GiveawaySettings>,
    bans: Mutex<Vec<BannedUser>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        MemorySettingsStore {
            settings: Mutex::new(GiveawaySettings::default()),
            bans: Mutex::new(Vec::new()),
        }
    }

    pub fn counter(&self) -> i64 {
        self.settings.lock().unwrap().total_giveaways
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_or_create(&self) -> Result<GiveawaySettings, GiveawayError> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn increment_counter(&self) -> Result<i64, GiveawayError> {
        let mut settings = self.settings.lock().unwrap();
        settings.total_giveaways += 1;
        Ok(settings.total_giveaways)
    }

    async fn is_banned(&self, user_id: &str) -> Result<bool, GiveawayError> {
        Ok(self
            .bans
            .lock()
            .unwrap()
            .iter()
            .any(|ban| ban.user_id == user_id))
    }

    async fn set_access(&self, access: GiveawayAccess) -> Result<(), GiveawayError> {
        self.settings.lock().unwrap().access = access;
        Ok(())
    }

    async fn set_default_duration(&self, seconds: i64) -> Result<(), GiveawayError> {
        self.settings.lock().unwrap().default_duration = seconds;
        Ok(())
    }

    async fn set_default_winner_count(&self, count: i32) -> Result<(), GiveawayError> {
        self.settings.lock().unwrap().default_winner_count = count;
        Ok(())
    }

    async fn toggle_auto_reroll(&self) -> Result<bool, GiveawayError> {
        let mut settings = self.settings.lock().unwrap();
        settings.auto_reroll = !settings.auto_reroll;
        Ok(settings.auto_reroll)
    }

    async fn ban_user(
        &self,
        user_id: &str,
        moderator: &str,
        reason: Option<&str>,
    ) -> Result<bool, GiveawayError> {
        let mut bans = self.bans.lock().unwrap();
        if bans.iter().any(|ban| ban.user_id == user_id) {
            return Ok(false);
        }
        bans.push(BannedUser {
            user_id: user_id.to_string(),
            moderator: moderator.to_string(),
            reason: reason.map(str::to_string),
            banned_at: 0,
        });
        Ok(true)
    }

    async fn unban_user(&self, user_id: &str) -> Result<bool, GiveawayError> {
        let mut bans = self.bans.lock().unwrap();
        let before = bans.len();
        bans.retain(|ban| ban.user_id != user_id);
        Ok(bans.len() < before)
    }

    async fn banned_users(&self) -> Result<Vec<BannedUser>, GiveawayError> {
        Ok(self.bans.lock().unwrap().clone())
    }
}
