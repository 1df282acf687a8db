use serenity::{
    all::{CommandInteraction, CommandOptionType, Permissions},
    builder::{CreateCommand, CreateCommandOption},
};

use crate::models::{
    command::{Command, CommandContext},
    handler::Handler,
    response::{ResponseError, ResponseResult},
};

pub mod create;
pub mod end;
pub mod list;
pub mod reroll;
pub mod settings;

pub struct GiveawayCommand;

#[async_trait::async_trait]
impl Command for GiveawayCommand {
    fn name(&self) -> &'static str {
        "giveaway"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("giveaway")
            .description("Manage giveaways in the server")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "create",
                    "Create a new giveaway",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "prize",
                        "The prize for the giveaway",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "duration",
                        "Duration in minutes (default: 24 hours)",
                    )
                    .required(false)
                    .min_int_value(1)
                    .max_int_value(20160),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "winners",
                        "Number of winners (default: 1)",
                    )
                    .required(false)
                    .min_int_value(1)
                    .max_int_value(10),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Channel,
                        "channel",
                        "Channel to post the giveaway in (default: current channel)",
                    )
                    .required(false),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Role,
                        "required_role",
                        "Role required to participate in the giveaway",
                    )
                    .required(false),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Role,
                        "ping_role",
                        "Role to ping when the giveaway starts",
                    )
                    .required(false),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "end",
                    "End a giveaway early",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "giveaway_id",
                        "The ID of the giveaway to end",
                    )
                    .required(true)
                    .min_int_value(1),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "reroll",
                    "Reroll the winners for a giveaway",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "giveaway_id",
                        "The ID of the giveaway to reroll",
                    )
                    .required(true)
                    .min_int_value(1),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "count",
                        "Number of new winners to select (default: 1)",
                    )
                    .required(false)
                    .min_int_value(1)
                    .max_int_value(10),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "list",
                    "List giveaways",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "status",
                        "Filter giveaways by status (default: active)",
                    )
                    .required(false)
                    .add_string_choice("Active", "active")
                    .add_string_choice("Ended", "ended")
                    .add_string_choice("All", "all"),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "limit",
                        "Number of giveaways to list (default: 5)",
                    )
                    .required(false)
                    .min_int_value(1)
                    .max_int_value(25),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommandGroup,
                    "settings",
                    "Manage giveaway settings",
                )
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "view",
                    "View the current giveaway settings",
                ))
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::SubCommand,
                        "access",
                        "Enable or disable giveaways",
                    )
                    .add_sub_option(
                        CreateCommandOption::new(
                            CommandOptionType::String,
                            "status",
                            "Whether giveaways can be created",
                        )
                        .required(true)
                        .add_string_choice("Enabled", "ENABLED")
                        .add_string_choice("Disabled", "DISABLED"),
                    ),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::SubCommand,
                        "defaults",
                        "Change the default duration or winner count",
                    )
                    .add_sub_option(
                        CreateCommandOption::new(
                            CommandOptionType::String,
                            "setting",
                            "The default to change",
                        )
                        .required(true)
                        .add_string_choice("Duration (minutes)", "duration")
                        .add_string_choice("Winner count", "winners"),
                    )
                    .add_sub_option(
                        CreateCommandOption::new(
                            CommandOptionType::Integer,
                            "value",
                            "The new value",
                        )
                        .required(true)
                        .min_int_value(1)
                        .max_int_value(20160),
                    ),
                )
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "autoreroll",
                    "Toggle automatic rerolls",
                ))
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::SubCommand,
                        "banlist",
                        "Manage the giveaway ban list",
                    )
                    .add_sub_option(
                        CreateCommandOption::new(
                            CommandOptionType::String,
                            "action",
                            "What to do with the ban list",
                        )
                        .required(true)
                        .add_string_choice("View", "view")
                        .add_string_choice("Add", "add")
                        .add_string_choice("Remove", "remove"),
                    )
                    .add_sub_option(CreateCommandOption::new(
                        CommandOptionType::User,
                        "user",
                        "User to add or remove from the ban list",
                    ))
                    .add_sub_option(CreateCommandOption::new(
                        CommandOptionType::String,
                        "reason",
                        "Reason for the ban (if adding)",
                    )),
                ),
            )
            .default_member_permissions(Permissions::MANAGE_EVENTS)
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        for option in &cmd.data.options {
            match option.name.as_str() {
                "create" => return create::create(handler, ctx, cmd).await,
                "end" => return end::end(handler, ctx, cmd).await,
                "reroll" => return reroll::reroll(handler, ctx, cmd).await,
                "list" => return list::list(handler, ctx, cmd).await,
                "settings" => return settings::settings(handler, ctx, cmd).await,
                _ => continue,
            }
        }

        Err(ResponseError::Execution(
            "Invalid command",
            Some("You must specify a subcommand to use this command!".to_string()),
        ))
    }
}
