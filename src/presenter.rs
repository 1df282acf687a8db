use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::{ButtonStyle, ChannelId, Message, MessageId, RoleId},
    builder::{
        CreateActionRow, CreateAllowedMentions, CreateButton, CreateEmbed, CreateMessage,
        EditMessage,
    },
    http::Http,
};
use tracing::error;

use crate::{giveaway::GiveawayPresenter, models::giveaway::Giveaway};

/// Custom id of the entry button under every giveaway announcement. The
/// giveaway itself is resolved from the message the button sits on.
pub const PARTICIPATE_BUTTON_ID: &str = "giveaway-participate";
const ENTRY_COUNT_BUTTON_ID: &str = "giveaway-entry-count";

const GIVEAWAY_COLOR: u32 = 0xed4245;

/// Renders giveaway lifecycle events to Discord: the announcement message,
/// entry-count refreshes, the closing edit and winner announcements. Owns
/// its own `Http` so it works from background tasks without a gateway
/// context.
pub struct DiscordPresenter {
    http: Arc<Http>,
}

fn parse_snowflake(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|id| *id != 0)
}

fn mention_list(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("<@{id}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn entry_row(entry_count: usize) -> Vec<CreateActionRow> {
    vec![CreateActionRow::Buttons(vec![
        CreateButton::new(PARTICIPATE_BUTTON_ID)
            .label("Participate")
            .style(ButtonStyle::Primary),
        CreateButton::new(ENTRY_COUNT_BUTTON_ID)
            .label(entry_count.to_string())
            .style(ButtonStyle::Secondary)
            .disabled(true),
    ])]
}

fn announcement_embed(
    prize: &str,
    end_time_ms: i64,
    entry_count: usize,
    required_role_id: Option<&str>,
) -> CreateEmbed {
    CreateEmbed::new()
        .title("New Giveaway 🎉")
        .description("A new giveaway has been started!")
        .color(GIVEAWAY_COLOR)
        .field("Prize", prize, false)
        .field(
            "Duration",
            format!("The giveaway will end <t:{}:R>", end_time_ms / 1000),
            false,
        )
        .field("Entries", entry_count.to_string(), false)
        .field(
            "Required Role",
            match required_role_id {
                Some(role) => format!("<@&{role}>"),
                None => "None".to_string(),
            },
            false,
        )
}

impl DiscordPresenter {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordPresenter { http }
    }

    /// Posts the announcement message with its entry button. Runs before
    /// the giveaway record exists, so it takes the draft fields directly
    /// and hands the resulting message back to the caller.
    pub async fn announce(
        &self,
        channel: ChannelId,
        prize: &str,
        end_time_ms: i64,
        required_role_id: Option<&str>,
        ping_role_id: Option<&str>,
    ) -> Result<Message, serenity::Error> {
        let mut message = CreateMessage::new()
            .embed(announcement_embed(prize, end_time_ms, 0, required_role_id))
            .components(entry_row(0));
        if let Some(role) = ping_role_id.and_then(parse_snowflake) {
            message = message
                .content(format!("<@&{role}>"))
                .allowed_mentions(CreateAllowedMentions::new().roles(vec![RoleId::new(role)]));
        }
        channel.send_message(&self.http, message).await
    }

    fn message_location(&self, giveaway: &Giveaway) -> Option<(ChannelId, MessageId)> {
        let channel = parse_snowflake(&giveaway.channel_id)?;
        let message = parse_snowflake(&giveaway.message_id)?;
        Some((ChannelId::new(channel), MessageId::new(message)))
    }
}

#[async_trait]
impl GiveawayPresenter for DiscordPresenter {
    async fn render_participation_update(&self, giveaway: &Giveaway) {
        let Some((channel, message)) = self.message_location(giveaway) else {
            error!(
                "Giveaway {} has an unusable message reference, skipping entry count refresh",
                giveaway.id
            );
            return;
        };

        let entry_count = giveaway.participants.len();
        let edit = EditMessage::new()
            .embed(announcement_embed(
                &giveaway.prize,
                giveaway.end_time,
                entry_count,
                giveaway.required_role_id.as_deref(),
            ))
            .components(entry_row(entry_count));
        if let Err(err) = channel.edit_message(&self.http, message, edit).await {
            error!(
                "Attempted to refresh the entry count for giveaway {}, failed with error: {err}",
                giveaway.id
            );
        }
    }

    async fn render_ended(&self, giveaway: &Giveaway, winners: &[String]) {
        let Some((channel, message)) = self.message_location(giveaway) else {
            error!(
                "Giveaway {} has an unusable message reference, skipping end announcement",
                giveaway.id
            );
            return;
        };

        let winner_mentions = if winners.is_empty() {
            "No winners".to_string()
        } else {
            mention_list(winners)
        };

        let edit = EditMessage::new()
            .embed(
                CreateEmbed::new()
                    .title("Giveaway Ended 🎉")
                    .color(GIVEAWAY_COLOR)
                    .field("Prize", giveaway.prize.clone(), false)
                    .field("Winners", winner_mentions.clone(), false)
                    .field("Entries", giveaway.participants.len().to_string(), false),
            )
            .components(vec![]);
        if let Err(err) = channel.edit_message(&self.http, message, edit).await {
            error!(
                "Attempted to close the announcement for giveaway {}, failed with error: {err}",
                giveaway.id
            );
        }

        let announcement = if winners.is_empty() {
            CreateMessage::new().content("No winners for this giveaway.")
        } else {
            CreateMessage::new()
                .content(format!(
                    "Congratulations {winner_mentions}! You won: **{}**",
                    giveaway.prize
                ))
                .allowed_mentions(CreateAllowedMentions::new().all_users(true))
        };
        if let Err(err) = channel.send_message(&self.http, announcement).await {
            error!(
                "Attempted to announce the winners of giveaway {}, failed with error: {err}",
                giveaway.id
            );
        }
    }

    async fn render_reroll(&self, giveaway: &Giveaway, new_winners: &[String]) {
        let Some((channel, _)) = self.message_location(giveaway) else {
            error!(
                "Giveaway {} has an unusable message reference, skipping reroll announcement",
                giveaway.id
            );
            return;
        };

        let announcement = CreateMessage::new()
            .content(format!(
                "🎉 **GIVEAWAY REROLL** 🎉\n\nNew winner(s) for **{}**: {}\nCongratulations!",
                giveaway.prize,
                mention_list(new_winners)
            ))
            .allowed_mentions(CreateAllowedMentions::new().all_users(true));
        if let Err(err) = channel.send_message(&self.http, announcement).await {
            error!(
                "Attempted to announce the reroll of giveaway {}, failed with error: {err}",
                giveaway.id
            );
        }
    }
}
