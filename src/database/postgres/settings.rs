use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::{
    common::clock,
    database::SettingsStore,
    giveaway::GiveawayError,
    models::settings::{BannedUser, DatabaseGiveawaySettings, GiveawayAccess, GiveawaySettings},
};

/// Settings live in a single-row table; every accessor first makes sure the
/// row exists so a fresh database behaves like one with defaults saved.
pub struct PostgresSettingsStore {
    pool: PgPool,
}

impl PostgresSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresSettingsStore { pool }
    }

    async fn ensure_row(&self) -> Result<(), GiveawayError> {
        sqlx::query("INSERT INTO giveaway_settings (id) VALUES (1) ON CONFLICT (id) DO NOTHING")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for PostgresSettingsStore {
    async fn get_or_create(&self) -> Result<GiveawaySettings, GiveawayError> {
        self.ensure_row().await?;
        let row = sqlx::query_as::<_, DatabaseGiveawaySettings>(
            "SELECT total_giveaways, access, default_duration, default_winner_count, auto_reroll \
             FROM giveaway_settings WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(GiveawaySettings::from(row))
    }

    async fn increment_counter(&self) -> Result<i64, GiveawayError> {
        self.ensure_row().await?;
        let value: i64 = sqlx::query_scalar(
            "UPDATE giveaway_settings SET total_giveaways = total_giveaways + 1 \
             WHERE id = 1 RETURNING total_giveaways",
        )
        .fetch_one(&self.pool)
        .await?;
        debug!("Advanced giveaway counter to {value}");
        Ok(value)
    }

    async fn is_banned(&self, user_id: &str) -> Result<bool, GiveawayError> {
        let ban = sqlx::query_as::<_, BannedUser>(
            "SELECT user_id, moderator, reason, banned_at FROM giveaway_bans WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(ban) = &ban {
            debug!(
                "User {} is banned from giveaways by {}",
                ban.user_id, ban.moderator
            );
        }
        Ok(ban.is_some())
    }

    async fn set_access(&self, access: GiveawayAccess) -> Result<(), GiveawayError> {
        self.ensure_row().await?;
        sqlx::query("UPDATE giveaway_settings SET access = $1 WHERE id = 1")
            .bind(access.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_default_duration(&self, seconds: i64) -> Result<(), GiveawayError> {
        self.ensure_row().await?;
        sqlx::query("UPDATE giveaway_settings SET default_duration = $1 WHERE id = 1")
            .bind(seconds)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_default_winner_count(&self, count: i32) -> Result<(), GiveawayError> {
        self.ensure_row().await?;
        sqlx::query("UPDATE giveaway_settings SET default_winner_count = $1 WHERE id = 1")
            .bind(count)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn toggle_auto_reroll(&self) -> Result<bool, GiveawayError> {
        self.ensure_row().await?;
        let enabled: bool = sqlx::query_scalar(
            "UPDATE giveaway_settings SET auto_reroll = NOT auto_reroll \
             WHERE id = 1 RETURNING auto_reroll",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(enabled)
    }

    async fn ban_user(
        &self,
        user_id: &str,
        moderator: &str,
        reason: Option<&str>,
    ) -> Result<bool, GiveawayError> {
        let result = sqlx::query(
            "INSERT INTO giveaway_bans (user_id, moderator, reason, banned_at) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(moderator)
        .bind(reason)
        .bind(clock::now_ms())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn unban_user(&self, user_id: &str) -> Result<bool, GiveawayError> {
        let result = sqlx::query("DELETE FROM giveaway_bans WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn banned_users(&self) -> Result<Vec<BannedUser>, GiveawayError> {
        let bans = sqlx::query_as::<_, BannedUser>(
            "SELECT user_id, moderator, reason, banned_at FROM giveaway_bans ORDER BY banned_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(bans)
    }
}
