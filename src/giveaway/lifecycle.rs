use std::sync::{Arc, Mutex};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    common::clock,
    database::{GiveawayStore, SettingsStore},
    giveaway::{selector, GiveawayError, GiveawayPresenter},
    models::{giveaway::Giveaway, settings::GiveawayAccess},
};

/// How often a version-guarded write is retried before the operation gives
/// up and reports a write conflict.
pub(crate) const MAX_WRITE_ATTEMPTS: usize = 3;

/// Everything needed to create a giveaway. The announcement message must
/// already exist; its ids come in with the draft.
#[derive(Clone, Debug)]
pub struct GiveawayDraft {
    pub prize: String,
    pub duration_seconds: i64,
    pub winner_count: i32,
    pub required_role_id: Option<String>,
    pub ping_role_id: Option<String>,
    pub message_id: String,
    pub channel_id: String,
}

/// The only component allowed to flip `ended` and write `winners`. Ending is
/// a compare-and-swap in the store, so a giveaway closes exactly once no
/// matter how many schedulers and moderators race for it.
#[derive(Clone)]
pub struct LifecycleController {
    store: Arc<dyn GiveawayStore>,
    settings: Arc<dyn SettingsStore>,
    presenter: Arc<dyn GiveawayPresenter>,
    rng: Arc<Mutex<StdRng>>,
}

impl LifecycleController {
    pub fn new(
        store: Arc<dyn GiveawayStore>,
        settings: Arc<dyn SettingsStore>,
        presenter: Arc<dyn GiveawayPresenter>,
    ) -> Self {
        Self::with_rng(store, settings, presenter, StdRng::from_entropy())
    }

    /// Same controller, caller-supplied random source. Tests seed this to
    /// make draws deterministic.
    pub fn with_rng(
        store: Arc<dyn GiveawayStore>,
        settings: Arc<dyn SettingsStore>,
        presenter: Arc<dyn GiveawayPresenter>,
        rng: StdRng,
    ) -> Self {
        LifecycleController {
            store,
            settings,
            presenter,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn draw(&self, pool: &[String], exclude: &[String], count: usize) -> Vec<String> {
        let mut rng = self.rng.lock().unwrap();
        selector::pick(pool, exclude, count, &mut *rng)
    }

    /// Creates a new giveaway and returns its id. The counter advance is the
    /// id allocation; if the insert afterwards fails the id stays burned and
    /// the gap is accepted, never reused.
    pub async fn start(&self, draft: GiveawayDraft) -> Result<i64, GiveawayError> {
        let settings = self.settings.get_or_create().await?;
        if settings.access == GiveawayAccess::Disabled {
            return Err(GiveawayError::Disabled);
        }

        let id = self.settings.increment_counter().await?;
        let now = clock::now_ms();
        let giveaway = Giveaway {
            id,
            prize: draft.prize,
            duration: draft.duration_seconds,
            message_id: draft.message_id,
            channel_id: draft.channel_id,
            winner_count: draft.winner_count,
            required_role_id: draft.required_role_id,
            ping_role_id: draft.ping_role_id,
            start_time: now,
            end_time: now + draft.duration_seconds * 1000,
            participants: Vec::new(),
            winners: Vec::new(),
            ended: false,
            version: 0,
        };

        if let Err(err) = self.store.create(&giveaway).await {
            warn!("Giveaway id {id} is burned, the record could not be stored: {err}");
            return Err(err);
        }

        info!(
            "Started giveaway {id} for {:?}, ending at {}",
            giveaway.prize, giveaway.end_time
        );
        Ok(id)
    }

    /// Closes a giveaway and draws its winners. The first caller to commit
    /// the ended flag wins; everyone else gets `AlreadyEnded`, whether they
    /// lost by reading a closed record or by losing the store-level swap.
    pub async fn end(&self, id: i64) -> Result<Vec<String>, GiveawayError> {
        let Some(giveaway) = self.store.get_by_id(id).await? else {
            return Err(GiveawayError::NotFound);
        };
        if giveaway.ended {
            return Err(GiveawayError::AlreadyEnded);
        }

        let target = (giveaway.winner_count.max(0) as usize).min(giveaway.participants.len());
        let winners = self.draw(&giveaway.participants, &[], target);

        if !self.store.complete(id, &winners).await? {
            debug!("Giveaway {id} was ended by a concurrent caller");
            return Err(GiveawayError::AlreadyEnded);
        }

        info!(
            "Ended giveaway {id} with {} winners out of {} participants",
            winners.len(),
            giveaway.participants.len()
        );

        let mut ended = giveaway;
        ended.winners = winners.clone();
        ended.ended = true;
        self.presenter.render_ended(&ended, &winners).await;

        Ok(winners)
    }

    /// Draws `count` additional winners from the participants who have not
    /// won yet and appends them to the winner sequence. Only ended giveaways
    /// can be rerolled, and prior winners are always excluded.
    pub async fn reroll(&self, id: i64, count: usize) -> Result<Vec<String>, GiveawayError> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let Some(giveaway) = self.store.get_by_id(id).await? else {
                return Err(GiveawayError::NotFound);
            };
            if !giveaway.ended {
                return Err(GiveawayError::NotEnded);
            }
            if giveaway.participants.len() <= giveaway.winners.len() {
                return Err(GiveawayError::NoEligibleParticipants);
            }

            let remaining = giveaway.participants.len() - giveaway.winners.len();
            let new_winners =
                self.draw(&giveaway.participants, &giveaway.winners, count.min(remaining));
            if new_winners.is_empty() {
                return Err(GiveawayError::NoEligibleParticipants);
            }

            if self
                .store
                .append_winners(id, &new_winners, giveaway.version)
                .await?
            {
                info!("Rerolled giveaway {id}, drew {} new winners", new_winners.len());

                let mut rerolled = giveaway;
                rerolled.winners.extend(new_winners.iter().cloned());
                rerolled.version += 1;
                self.presenter.render_reroll(&rerolled, &new_winners).await;

                return Ok(new_winners);
            }
            // The record moved underneath us, likely another reroll. Reload
            // so the exclusion set is current and draw again.
            debug!("Reroll of giveaway {id} hit a version conflict, retrying");
        }

        Err(GiveawayError::Persistence(format!(
            "reroll of giveaway {id} kept conflicting after {MAX_WRITE_ATTEMPTS} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{rngs::StdRng, SeedableRng};

    use super::{GiveawayDraft, LifecycleController};
    use crate::{
        common::clock,
        database::{GiveawayStore, SettingsStore},
        giveaway::{
            test_utils::{open_giveaway, MemoryGiveawayStore, MemorySettingsStore, RecordingPresenter},
            GiveawayError,
        },
        models::settings::GiveawayAccess,
    };

    fn fixture() -> (
        LifecycleController,
        Arc<MemoryGiveawayStore>,
        Arc<MemorySettingsStore>,
        Arc<RecordingPresenter>,
    ) {
        let store = Arc::new(MemoryGiveawayStore::new());
        let settings = Arc::new(MemorySettingsStore::new());
        let presenter = Arc::new(RecordingPresenter::new());
        let controller = LifecycleController::with_rng(
            store.clone(),
            settings.clone(),
            presenter.clone(),
            StdRng::seed_from_u64(42),
        );
        (controller, store, settings, presenter)
    }

    fn draft(prize: &str, duration_seconds: i64, winner_count: i32) -> GiveawayDraft {
        GiveawayDraft {
            prize: prize.to_string(),
            duration_seconds,
            winner_count,
            required_role_id: None,
            ping_role_id: None,
            message_id: "9000".to_string(),
            channel_id: "100".to_string(),
        }
    }

    #[tokio::test]
    async fn start_persists_record_with_computed_end_time() {
        let (controller, store, _, _) = fixture();

        let id = controller.start(draft("Gift Card", 3600, 2)).await.unwrap();

        let stored = store.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.prize, "Gift Card");
        assert_eq!(stored.end_time, stored.start_time + 3600 * 1000);
        assert!(!stored.ended);
        assert!(stored.participants.is_empty());
        assert!(stored.winners.is_empty());
    }

    #[tokio::test]
    async fn start_assigns_monotonic_ids() {
        let (controller, _, _, _) = fixture();

        let first = controller.start(draft("A", 60, 1)).await.unwrap();
        let second = controller.start(draft("B", 60, 1)).await.unwrap();

        assert_eq!(second, first + 1);
    }

    #[tokio::test]
    async fn start_is_rejected_while_disabled() {
        let (controller, _, settings, _) = fixture();
        settings.set_access(GiveawayAccess::Disabled).await.unwrap();

        let result = controller.start(draft("A", 60, 1)).await;

        assert_eq!(result.unwrap_err(), GiveawayError::Disabled);
    }

    #[tokio::test]
    async fn failed_insert_burns_the_id() {
        let (controller, store, settings, _) = fixture();
        store.fail_next_create();

        assert!(matches!(
            controller.start(draft("A", 60, 1)).await,
            Err(GiveawayError::Persistence(_))
        ));

        // The counter moved, so the next giveaway skips the burned id.
        let id = controller.start(draft("B", 60, 1)).await.unwrap();
        assert_eq!(id, 2);
        assert_eq!(settings.counter(), 2);
    }

    #[tokio::test]
    async fn end_with_no_participants_yields_no_winners() {
        let (controller, store, _, _) = fixture();
        store.insert(open_giveaway(1, &[], 1)).await;

        let winners = controller.end(1).await.unwrap();

        assert!(winners.is_empty());
        assert!(store.get_by_id(1).await.unwrap().unwrap().ended);
    }

    #[tokio::test]
    async fn end_draws_min_of_winner_count_and_pool() {
        let (controller, store, _, _) = fixture();
        store.insert(open_giveaway(1, &["a", "b", "c"], 2)).await;

        let winners = controller.end(1).await.unwrap();

        assert_eq!(winners.len(), 2);
        assert_eq!(
            winners.iter().collect::<std::collections::HashSet<_>>().len(),
            2
        );
        for winner in &winners {
            assert!(["a", "b", "c"].contains(&winner.as_str()));
        }
    }

    #[tokio::test]
    async fn end_is_idempotent() {
        let (controller, store, _, _) = fixture();
        store.insert(open_giveaway(1, &["a", "b"], 1)).await;

        let winners = controller.end(1).await.unwrap();
        let again = controller.end(1).await;

        assert_eq!(again.unwrap_err(), GiveawayError::AlreadyEnded);
        let stored = store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.winners, winners);
    }

    #[tokio::test]
    async fn end_of_missing_giveaway_is_not_found() {
        let (controller, _, _, _) = fixture();
        assert_eq!(controller.end(7).await.unwrap_err(), GiveawayError::NotFound);
    }

    #[tokio::test]
    async fn losing_the_commit_race_reports_already_ended() {
        let (controller, store, _, _) = fixture();
        store.insert(open_giveaway(1, &["a"], 1)).await;
        // Another caller commits between our read and our swap.
        store.end_out_of_band(1).await;

        assert_eq!(controller.end(1).await.unwrap_err(), GiveawayError::AlreadyEnded);
    }

    #[tokio::test]
    async fn end_notifies_the_presenter() {
        let (controller, store, _, presenter) = fixture();
        store.insert(open_giveaway(1, &["a"], 1)).await;

        controller.end(1).await.unwrap();

        let ended = presenter.ended.lock().unwrap();
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].0, 1);
        assert_eq!(ended[0].1, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn reroll_excludes_prior_winners_and_appends() {
        let (controller, store, _, presenter) = fixture();
        store.insert(open_giveaway(1, &["a", "b", "c"], 1)).await;
        let first = controller.end(1).await.unwrap();

        let new_winners = controller.reroll(1, 1).await.unwrap();

        assert_eq!(new_winners.len(), 1);
        assert!(!first.contains(&new_winners[0]));
        let stored = store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.winners.len(), 2);
        assert_eq!(stored.winners[0], first[0]);
        assert_eq!(stored.winners[1], new_winners[0]);

        let rerolls = presenter.rerolls.lock().unwrap();
        assert_eq!(rerolls.as_slice(), &[(1, new_winners)]);
    }

    #[tokio::test]
    async fn reroll_of_open_giveaway_is_rejected() {
        let (controller, store, _, _) = fixture();
        store.insert(open_giveaway(1, &["a", "b"], 1)).await;

        assert_eq!(
            controller.reroll(1, 1).await.unwrap_err(),
            GiveawayError::NotEnded
        );
    }

    #[tokio::test]
    async fn reroll_with_exhausted_pool_is_rejected() {
        let (controller, store, _, _) = fixture();
        store.insert(open_giveaway(1, &["a", "b"], 2)).await;
        controller.end(1).await.unwrap();

        assert_eq!(
            controller.reroll(1, 1).await.unwrap_err(),
            GiveawayError::NoEligibleParticipants
        );
    }

    #[tokio::test]
    async fn reroll_caps_at_remaining_eligible_participants() {
        let (controller, store, _, _) = fixture();
        store.insert(open_giveaway(1, &["a", "b", "c", "d"], 1)).await;
        controller.end(1).await.unwrap();

        let new_winners = controller.reroll(1, 10).await.unwrap();

        assert_eq!(new_winners.len(), 3);
        let stored = store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.winners.len(), 4);
        let distinct: std::collections::HashSet<_> = stored.winners.iter().collect();
        assert_eq!(distinct.len(), 4);
    }

    #[tokio::test]
    async fn repeated_rerolls_never_repeat_a_winner() {
        let (controller, store, _, _) = fixture();
        store
            .insert(open_giveaway(1, &["a", "b", "c", "d", "e"], 1))
            .await;
        controller.end(1).await.unwrap();

        controller.reroll(1, 2).await.unwrap();
        controller.reroll(1, 2).await.unwrap();

        let stored = store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.winners.len(), 5);
        let distinct: std::collections::HashSet<_> = stored.winners.iter().collect();
        assert_eq!(distinct.len(), 5);
        assert_eq!(
            controller.reroll(1, 1).await.unwrap_err(),
            GiveawayError::NoEligibleParticipants
        );
    }

    #[tokio::test]
    async fn end_time_matches_duration_at_creation() {
        let (controller, store, _, _) = fixture();

        let before = clock::now_ms();
        let id = controller.start(draft("A", 60, 1)).await.unwrap();
        let after = clock::now_ms();

        let stored = store.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.end_time - stored.start_time, 60 * 1000);
        assert!(stored.start_time >= before && stored.start_time <= after);
    }
}
