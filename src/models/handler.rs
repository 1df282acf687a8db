use std::sync::Arc;

use crate::{
    database::SettingsStore,
    giveaway::{
        lifecycle::LifecycleController, list::Lister, participation::ParticipationManager,
    },
    presenter::DiscordPresenter,
};

pub struct Handler {
    pub settings: Arc<dyn SettingsStore>,
    pub controller: LifecycleController,
    pub participation: ParticipationManager,
    pub lister: Lister,
    pub presenter: Arc<DiscordPresenter>,
}
