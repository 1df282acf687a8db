use async_trait::async_trait;

use crate::{
    giveaway::GiveawayError,
    models::{
        giveaway::{Giveaway, GiveawayFilter},
        settings::{BannedUser, GiveawayAccess, GiveawaySettings},
    },
};

pub mod postgres;

#[cfg(test)]
pub mod memory;

/// Durable storage for giveaway records. The conditional update methods
/// return `false` when the guard did not match (version moved on, or the
/// giveaway was already in the wrong state); callers reload and retry or
/// translate the miss into a business error.
#[async_trait]
pub trait GiveawayStore: Send + Sync {
    async fn create(&self, giveaway: &Giveaway) -> Result<(), GiveawayError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Giveaway>, GiveawayError>;
    async fn get_by_message_id(&self, message_id: &str)
        -> Result<Option<Giveaway>, GiveawayError>;

    /// Replaces the participant set, guarded by the record version and on
    /// the giveaway still being open.
    async fn update_participants(
        &self,
        id: i64,
        participants: &[String],
        expected_version: i64,
    ) -> Result<bool, GiveawayError>;

    /// The one authoritative open-to-ended transition: sets `winners` and
    /// `ended` in a single compare-and-swap keyed on `ended = false`, so two
    /// racing callers can never both succeed.
    async fn complete(&self, id: i64, winners: &[String]) -> Result<bool, GiveawayError>;

    /// Appends rerolled winners, guarded by the record version and on the
    /// giveaway being ended.
    async fn append_winners(
        &self,
        id: i64,
        new_winners: &[String],
        expected_version: i64,
    ) -> Result<bool, GiveawayError>;

    async fn find_due(&self, now: i64) -> Result<Vec<Giveaway>, GiveawayError>;
    async fn find_by_filter(&self, filter: &GiveawayFilter)
        -> Result<Vec<Giveaway>, GiveawayError>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_or_create(&self) -> Result<GiveawaySettings, GiveawayError>;

    /// Atomic increment-and-get of the giveaway counter; the returned value
    /// is the id of the giveaway being created.
    async fn increment_counter(&self) -> Result<i64, GiveawayError>;

    async fn is_banned(&self, user_id: &str) -> Result<bool, GiveawayError>;

    async fn set_access(&self, access: GiveawayAccess) -> Result<(), GiveawayError>;
    async fn set_default_duration(&self, seconds: i64) -> Result<(), GiveawayError>;
    async fn set_default_winner_count(&self, count: i32) -> Result<(), GiveawayError>;

    /// Flips the auto-reroll flag and returns the new state.
    async fn toggle_auto_reroll(&self) -> Result<bool, GiveawayError>;

    /// Returns `false` when the user was already banned.
    async fn ban_user(
        &self,
        user_id: &str,
        moderator: &str,
        reason: Option<&str>,
    ) -> Result<bool, GiveawayError>;

    /// Returns `false` when the user was not banned to begin with.
    async fn unban_user(&self, user_id: &str) -> Result<bool, GiveawayError>;

    async fn banned_users(&self) -> Result<Vec<BannedUser>, GiveawayError>;
}
