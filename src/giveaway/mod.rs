use async_trait::async_trait;

use crate::models::giveaway::Giveaway;

pub mod lifecycle;
pub mod list;
pub mod participation;
pub mod scheduler;
pub mod selector;

#[cfg(test)]
pub mod test_utils;

/// Everything that can go wrong while operating a giveaway. Business-rule
/// violations are their own variants so the command layer can translate each
/// one into a single user-facing sentence; `Persistence` carries the
/// underlying store error for the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiveawayError {
    NotFound,
    AlreadyEnded,
    NotEnded,
    RoleRequired,
    NoEligibleParticipants,
    Banned,
    Disabled,
    Persistence(String),
}

impl GiveawayError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GiveawayError::NotFound => "That giveaway does not exist.",
            GiveawayError::AlreadyEnded => "That giveaway has already ended.",
            GiveawayError::NotEnded => "That giveaway is still running.",
            GiveawayError::RoleRequired => {
                "You do not have the required role to participate in this giveaway."
            }
            GiveawayError::NoEligibleParticipants => {
                "There are no more eligible participants to select as winners."
            }
            GiveawayError::Banned => "You are banned from participating in giveaways.",
            GiveawayError::Disabled => "Giveaways are currently disabled.",
            GiveawayError::Persistence(_) => {
                "Something went wrong while accessing the giveaway records."
            }
        }
    }
}

impl std::fmt::Display for GiveawayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GiveawayError::Persistence(err) => write!(f, "persistence failure: {err}"),
            other => write!(f, "{}", other.user_message()),
        }
    }
}

impl From<sqlx::Error> for GiveawayError {
    fn from(err: sqlx::Error) -> Self {
        GiveawayError::Persistence(err.to_string())
    }
}

/// Rendering seam towards the chat surface. Implementations own all embed
/// building and message editing; the core only reports what happened. A
/// failed render never rolls back the state change it describes, so these
/// methods log their own errors instead of returning them.
#[async_trait]
pub trait GiveawayPresenter: Send + Sync {
    async fn render_participation_update(&self, giveaway: &Giveaway);
    async fn render_ended(&self, giveaway: &Giveaway, winners: &[String]);
    async fn render_reroll(&self, giveaway: &Giveaway, new_winners: &[String]);
}
