pub mod listing;
pub mod record;
pub mod resource;
pub mod submission;
