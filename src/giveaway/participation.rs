use std::sync::Arc;

use strum::Display;
use tracing::debug;

use crate::{
    database::{GiveawayStore, SettingsStore},
    giveaway::{lifecycle::MAX_WRITE_ATTEMPTS, GiveawayError, GiveawayPresenter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ToggleAction {
    #[strum(serialize = "added")]
    Added,
    #[strum(serialize = "removed")]
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    pub participant_count: usize,
}

/// Flips a user's membership in a giveaway's participant set. The write is
/// guarded by the record version and retried on conflict, so two users
/// pressing the button at the same moment both land.
#[derive(Clone)]
pub struct ParticipationManager {
    store: Arc<dyn GiveawayStore>,
    settings: Arc<dyn SettingsStore>,
    presenter: Arc<dyn GiveawayPresenter>,
}

impl ParticipationManager {
    pub fn new(
        store: Arc<dyn GiveawayStore>,
        settings: Arc<dyn SettingsStore>,
        presenter: Arc<dyn GiveawayPresenter>,
    ) -> Self {
        ParticipationManager {
            store,
            settings,
            presenter,
        }
    }

    /// Resolves the giveaway behind a button press by the message it sits
    /// on, then toggles.
    pub async fn toggle_by_message(
        &self,
        message_id: &str,
        user_id: &str,
        user_roles: &[String],
    ) -> Result<ToggleOutcome, GiveawayError> {
        let Some(giveaway) = self.store.get_by_message_id(message_id).await? else {
            return Err(GiveawayError::NotFound);
        };
        self.toggle(giveaway.id, user_id, user_roles).await
    }

    pub async fn toggle(
        &self,
        giveaway_id: i64,
        user_id: &str,
        user_roles: &[String],
    ) -> Result<ToggleOutcome, GiveawayError> {
        if self.settings.is_banned(user_id).await? {
            return Err(GiveawayError::Banned);
        }

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let Some(giveaway) = self.store.get_by_id(giveaway_id).await? else {
                return Err(GiveawayError::NotFound);
            };
            if giveaway.ended {
                return Err(GiveawayError::AlreadyEnded);
            }
            if let Some(required) = &giveaway.required_role_id {
                if !user_roles.contains(required) {
                    return Err(GiveawayError::RoleRequired);
                }
            }

            let mut participants = giveaway.participants.clone();
            let action = if let Some(position) =
                participants.iter().position(|entry| entry == user_id)
            {
                participants.remove(position);
                ToggleAction::Removed
            } else {
                participants.push(user_id.to_string());
                ToggleAction::Added
            };

            if self
                .store
                .update_participants(giveaway_id, &participants, giveaway.version)
                .await?
            {
                debug!("User {user_id} {action} on giveaway {giveaway_id}");

                let mut updated = giveaway;
                updated.participants = participants;
                updated.version += 1;
                let participant_count = updated.participants.len();
                self.presenter.render_participation_update(&updated).await;

                return Ok(ToggleOutcome {
                    action,
                    participant_count,
                });
            }
            // Someone else toggled in the meantime; reload and reapply.
            debug!("Participant update on giveaway {giveaway_id} hit a version conflict, retrying");
        }

        Err(GiveawayError::Persistence(format!(
            "participant update on giveaway {giveaway_id} kept conflicting after {MAX_WRITE_ATTEMPTS} attempts"
        )))
    }
}
