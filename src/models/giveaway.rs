use sqlx::FromRow;

/// A single time-bounded giveaway. `participants` only changes while the
/// giveaway is open, `winners` and `ended` only change when it closes or is
/// rerolled. `version` is bumped on every write so concurrent updates can be
/// detected and retried instead of silently lost.
#[derive(Clone, Debug)]
pub struct Giveaway {
    pub id: i64,
    pub prize: String,
    pub duration: i64,
    pub message_id: String,
    pub channel_id: String,
    pub winner_count: i32,
    pub required_role_id: Option<String>,
    pub ping_role_id: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub participants: Vec<String>,
    pub winners: Vec<String>,
    pub ended: bool,
    pub version: i64,
}

#[derive(FromRow)]
pub struct DatabaseGiveaway {
    pub id: i64,
    pub prize: String,
    pub duration: i64,
    pub message_id: String,
    pub channel_id: String,
    pub winner_count: i32,
    pub required_role_id: Option<String>,
    pub ping_role_id: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub participants: Vec<String>,
    pub winners: Vec<String>,
    pub ended: bool,
    pub version: i64,
}

impl From<DatabaseGiveaway> for Giveaway {
    fn from(value: DatabaseGiveaway) -> Self {
        Giveaway {
            id: value.id,
            prize: value.prize,
            duration: value.duration,
            message_id: value.message_id,
            channel_id: value.channel_id,
            winner_count: value.winner_count,
            required_role_id: value.required_role_id,
            ping_role_id: value.ping_role_id,
            start_time: value.start_time,
            end_time: value.end_time,
            participants: value.participants,
            winners: value.winners,
            ended: value.ended,
            version: value.version,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveawaySort {
    Id,
    StartTime,
    EndTime,
    Participants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Filter for listing stored giveaways. `active: Some(true)` selects open
/// giveaways, `Some(false)` ended ones, `None` everything. When `sort_by` is
/// omitted the result is ordered by id descending.
#[derive(Debug, Clone, Default)]
pub struct GiveawayFilter {
    pub active: Option<bool>,
    pub sort_by: Option<GiveawaySort>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<i64>,
}
