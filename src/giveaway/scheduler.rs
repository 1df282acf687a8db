use std::{sync::Arc, time::Duration};

use tracing::{debug, error, info};

use crate::{
    common::clock,
    database::GiveawayStore,
    giveaway::lifecycle::LifecycleController,
};

const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Background poll that closes giveaways whose timer has elapsed. It holds
/// no state of its own: a restarted process simply sweeps again and catches
/// up on anything it missed.
pub struct ExpirationScheduler {
    store: Arc<dyn GiveawayStore>,
    controller: LifecycleController,
}

impl ExpirationScheduler {
    pub fn new(store: Arc<dyn GiveawayStore>, controller: LifecycleController) -> Self {
        ExpirationScheduler { store, controller }
    }

    /// Sweeps immediately, then every `SWEEP_INTERVAL`. Never returns.
    pub async fn run(self) {
        loop {
            let ended = self.tick(clock::now_ms()).await;
            if ended > 0 {
                info!("Expiration sweep ended {ended} giveaways");
            }
            tokio::time::sleep(SWEEP_INTERVAL).await;
        }
    }

    /// Ends every giveaway that is open and due at `now`. Each attempt is
    /// independent; a failure (or losing the race to a manual end) is logged
    /// and left for the next sweep, never aborting the rest of the batch.
    pub async fn tick(&self, now: i64) -> usize {
        let due = match self.store.find_due(now).await {
            Ok(due) => due,
            Err(err) => {
                error!("Failed to fetch due giveaways: {err}");
                return 0;
            }
        };

        let mut ended = 0;
        for giveaway in due {
            match self.controller.end(giveaway.id).await {
                Ok(winners) => {
                    ended += 1;
                    debug!(
                        "Sweep ended giveaway {} with {} winners",
                        giveaway.id,
                        winners.len()
                    );
                }
                Err(err) => {
                    error!(
                        "Failed to end giveaway {}, leaving it for the next sweep: {err}",
                        giveaway.id
                    );
                }
            }
        }
        ended
    }
}
