pub mod clock;
pub mod options;
pub mod reply;
