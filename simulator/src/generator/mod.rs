pub mod messages;
pub mod profile;
