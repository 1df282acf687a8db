use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::{
    database::GiveawayStore,
    giveaway::GiveawayError,
    models::giveaway::{DatabaseGiveaway, Giveaway, GiveawayFilter, GiveawaySort, SortOrder},
};

pub struct PostgresGiveawayStore {
    pool: PgPool,
}

impl PostgresGiveawayStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresGiveawayStore { pool }
    }
}

#[async_trait]
impl GiveawayStore for PostgresGiveawayStore {
    async fn create(&self, giveaway: &Giveaway) -> Result<(), GiveawayError> {
        debug!("Inserting giveaway {} into main database", giveaway.id);
        sqlx::query(
            "INSERT INTO giveaways \
             (id, prize, duration, message_id, channel_id, winner_count, required_role_id, \
              ping_role_id, start_time, end_time, participants, winners, ended, version) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(giveaway.id)
        .bind(&giveaway.prize)
        .bind(giveaway.duration)
        .bind(&giveaway.message_id)
        .bind(&giveaway.channel_id)
        .bind(giveaway.winner_count)
        .bind(&giveaway.required_role_id)
        .bind(&giveaway.ping_role_id)
        .bind(giveaway.start_time)
        .bind(giveaway.end_time)
        .bind(&giveaway.participants)
        .bind(&giveaway.winners)
        .bind(giveaway.ended)
        .bind(giveaway.version)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Giveaway>, GiveawayError> {
        let row = sqlx::query_as::<_, DatabaseGiveaway>("SELECT * FROM giveaways WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Giveaway::from))
    }

    async fn get_by_message_id(
        &self,
        message_id: &str,
    ) -> Result<Option<Giveaway>, GiveawayError> {
        let row = sqlx::query_as::<_, DatabaseGiveaway>(
            "SELECT * FROM giveaways WHERE message_id = $1",
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Giveaway::from))
    }

    async fn update_participants(
        &self,
        id: i64,
        participants: &[String],
        expected_version: i64,
    ) -> Result<bool, GiveawayError> {
        let result = sqlx::query(
            "UPDATE giveaways SET participants = $2, version = version + 1 \
             WHERE id = $1 AND version = $3 AND ended = false",
        )
        .bind(id)
        .bind(participants)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn complete(&self, id: i64, winners: &[String]) -> Result<bool, GiveawayError> {
        let result = sqlx::query(
            "UPDATE giveaways SET winners = $2, ended = true, version = version + 1 \
             WHERE id = $1 AND ended = false",
        )
        .bind(id)
        .bind(winners)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn append_winners(
        &self,
        id: i64,
        new_winners: &[String],
        expected_version: i64,
    ) -> Result<bool, GiveawayError> {
        let result = sqlx::query(
            "UPDATE giveaways SET winners = winners || $2, version = version + 1 \
             WHERE id = $1 AND version = $3 AND ended = true",
        )
        .bind(id)
        .bind(new_winners)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_due(&self, now: i64) -> Result<Vec<Giveaway>, GiveawayError> {
        let rows = sqlx::query_as::<_, DatabaseGiveaway>(
            "SELECT * FROM giveaways WHERE ended = false AND end_time <= $1 ORDER BY end_time",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Giveaway::from).collect())
    }

    async fn find_by_filter(
        &self,
        filter: &GiveawayFilter,
    ) -> Result<Vec<Giveaway>, GiveawayError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM giveaways");
        if let Some(active) = filter.active {
            builder.push(" WHERE ended = ").push_bind(!active);
        }

        let column = match filter.sort_by.unwrap_or(GiveawaySort::Id) {
            GiveawaySort::Id => "id",
            GiveawaySort::StartTime => "start_time",
            GiveawaySort::EndTime => "end_time",
            GiveawaySort::Participants => "cardinality(participants)",
        };
        // Omitting the sort key means newest-first; an explicit key defaults
        // to ascending unless an order is given.
        let order = filter.sort_order.unwrap_or(if filter.sort_by.is_none() {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        });
        builder.push(" ORDER BY ").push(column).push(match order {
            SortOrder::Ascending => " ASC",
            SortOrder::Descending => " DESC",
        });

        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder
            .build_query_as::<DatabaseGiveaway>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Giveaway::from).collect())
    }
}
