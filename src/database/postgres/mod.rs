pub mod giveaway;
pub mod settings;
