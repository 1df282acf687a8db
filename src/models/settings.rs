use sqlx::FromRow;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum GiveawayAccess {
    #[strum(serialize = "ENABLED")]
    Enabled,
    #[strum(serialize = "DISABLED")]
    Disabled,
}

/// Process-wide giveaway settings. `total_giveaways` is the id source and is
/// only ever advanced through an atomic increment-and-get in the store.
#[derive(Clone, Debug)]
pub struct GiveawaySettings {
    pub total_giveaways: i64,
    pub access: GiveawayAccess,
    pub default_duration: i64,
    pub default_winner_count: i32,
    pub auto_reroll: bool,
}

impl Default for GiveawaySettings {
    fn default() -> Self {
        GiveawaySettings {
            total_giveaways: 0,
            access: GiveawayAccess::Enabled,
            default_duration: 86400,
            default_winner_count: 1,
            auto_reroll: false,
        }
    }
}

#[derive(FromRow)]
pub struct DatabaseGiveawaySettings {
    pub total_giveaways: i64,
    pub access: String,
    pub default_duration: i64,
    pub default_winner_count: i32,
    pub auto_reroll: bool,
}

impl From<DatabaseGiveawaySettings> for GiveawaySettings {
    fn from(value: DatabaseGiveawaySettings) -> Self {
        GiveawaySettings {
            total_giveaways: value.total_giveaways,
            access: value.access.parse().unwrap_or(GiveawayAccess::Enabled),
            default_duration: value.default_duration,
            default_winner_count: value.default_winner_count,
            auto_reroll: value.auto_reroll,
        }
    }
}

/// A user barred from entering giveaways, kept in its own table.
#[derive(Clone, Debug, FromRow)]
pub struct BannedUser {
    pub user_id: String,
    pub moderator: String,
    pub reason: Option<String>,
    pub banned_at: i64,
}
