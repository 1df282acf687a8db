pub mod command;
pub mod giveaway;
pub mod handler;
pub mod response;
pub mod settings;
