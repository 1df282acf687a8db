use serenity::{
    all::ComponentInteraction,
    builder::CreateEmbed,
    prelude::Context as IncomingContext,
};
use tracing::error;

use crate::{
    giveaway::participation::ToggleAction,
    models::{command::InteractionContext, handler::Handler, response::Response},
    presenter::PARTICIPATE_BUTTON_ID,
};

impl Handler {
    /// A press on the participate button under a giveaway announcement. The
    /// giveaway is resolved from the message the button is attached to.
    pub async fn on_component(&self, ctx: IncomingContext, component: ComponentInteraction) {
        if component.data.custom_id != PARTICIPATE_BUTTON_ID {
            return;
        }

        let interaction_context = InteractionContext::new(ctx, &component);

        let user_id = component.user.id.get().to_string();
        let user_roles: Vec<String> = component
            .member
            .as_ref()
            .map(|member| {
                member
                    .roles
                    .iter()
                    .map(|role| role.get().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let message_id = component.message.id.get().to_string();
        match self
            .participation
            .toggle_by_message(&message_id, &user_id, &user_roles)
            .await
        {
            Ok(outcome) => {
                let (title, description) = match outcome.action {
                    ToggleAction::Added => (
                        "You're in the running!",
                        "You've entered this giveaway. Good luck!",
                    ),
                    ToggleAction::Removed => (
                        "Entry withdrawn",
                        "You've left this giveaway. Press the button again to re-enter.",
                    ),
                };
                if let Err(err) = interaction_context
                    .reply(
                        Response::new()
                            .embed(
                                CreateEmbed::new()
                                    .title(title)
                                    .description(description)
                                    .color(0x00ff00),
                            )
                            .ephemeral(true),
                    )
                    .await
                {
                    error!(
                        "Could not acknowledge giveaway entry. Failed with error: {:?}",
                        err
                    );
                }
            }
            Err(err) => {
                if let Err(reply_err) = interaction_context.error_message(err.user_message()).await
                {
                    error!(
                        "Could not notify user of failed giveaway entry. Failed with error: {:?}",
                        reply_err
                    );
                }
            }
        }
    }
}
