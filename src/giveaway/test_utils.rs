use std::sync::Mutex;

use async_trait::async_trait;

use crate::{giveaway::GiveawayPresenter, models::giveaway::Giveaway};

pub use crate::database::memory::{MemoryGiveawayStore, MemorySettingsStore};

/// Presenter that records what it was asked to render so tests can assert
/// on the notifications without any chat surface.
pub struct RecordingPresenter {
    pub participation_updates: Mutex<Vec<(i64, usize)>>,
    pub ended: Mutex<Vec<(i64, Vec<String>)>>,
    pub rerolls: Mutex<Vec<(i64, Vec<String>)>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        RecordingPresenter {
            participation_updates: Mutex::new(Vec::new()),
            ended: Mutex::new(Vec::new()),
            rerolls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GiveawayPresenter for RecordingPresenter {
    async fn render_participation_update(&self, giveaway: &Giveaway) {
        self.participation_updates
            .lock()
            .unwrap()
            .push((giveaway.id, giveaway.participants.len()));
    }

    async fn render_ended(&self, giveaway: &Giveaway, winners: &[String]) {
        self.ended
            .lock()
            .unwrap()
            .push((giveaway.id, winners.to_vec()));
    }

    async fn render_reroll(&self, giveaway: &Giveaway, new_winners: &[String]) {
        self.rerolls
            .lock()
            .unwrap()
            .push((giveaway.id, new_winners.to_vec()));
    }
}

/// An open giveaway ready to be inserted into a memory store.
pub fn open_giveaway(id: i64, participants: &[&str], winner_count: i32) -> Giveaway {
    Giveaway {
        id,
        prize: format!("Prize {id}"),
        duration: 600,
        message_id: (9000 + id).to_string(),
        channel_id: "100".to_string(),
        winner_count,
        required_role_id: None,
        ping_role_id: None,
        start_time: 0,
        end_time: 600_000,
        participants: participants.iter().map(ToString::to_string).collect(),
        winners: Vec::new(),
        ended: false,
        version: 0,
    }
}
