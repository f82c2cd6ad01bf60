pub mod action_service;
pub mod import_service;
pub mod list_controller;
pub mod listing_service;
pub mod record_service;
pub mod submission_service;
