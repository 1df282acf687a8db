use pretty_duration::pretty_duration;
use serenity::{all::CommandInteraction, builder::CreateEmbed};

use crate::{
    common::{options::Options, reply::CommandContextReply},
    models::{
        command::CommandContext,
        giveaway::{Giveaway, GiveawayFilter},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

fn format_line(giveaway: &Giveaway) -> String {
    let duration = pretty_duration(
        &std::time::Duration::from_secs(giveaway.duration.max(0) as u64),
        None,
    );
    if giveaway.ended {
        format!(
            "`#{}` **{}** — {} entries, {} winner(s) drawn",
            giveaway.id,
            giveaway.prize,
            giveaway.participants.len(),
            giveaway.winners.len()
        )
    } else {
        format!(
            "`#{}` **{}** — {} entries, runs {}, ends <t:{}:R>",
            giveaway.id,
            giveaway.prize,
            giveaway.participants.len(),
            duration,
            giveaway.end_time / 1000
        )
    }
}

pub async fn list(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let status = options
        .get_string("status")
        .into_owned()
        .unwrap_or_else(|| "active".to_string());
    let limit = options.get_integer("limit").unwrap_or(5).clamp(1, 25);

    let filter = GiveawayFilter {
        active: match status.as_str() {
            "active" => Some(true),
            "ended" => Some(false),
            _ => None,
        },
        limit: Some(limit),
        ..GiveawayFilter::default()
    };

    match handler.lister.query(&filter).await {
        Ok(giveaways) => {
            let description = if giveaways.is_empty() {
                "No giveaways found.".to_string()
            } else {
                giveaways
                    .iter()
                    .map(format_line)
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            ctx.reply(
                cmd,
                Response::new()
                    .embed(
                        CreateEmbed::new()
                            .title(format!("Giveaways ({status})"))
                            .description(description)
                            .color(0x4752c4),
                    )
                    .ephemeral(true),
            )
            .await
        }
        Err(err) => Err(ResponseError::Execution(err.user_message(), None)),
    }
}
