//! User-facing text. Every notification and validation message goes through here
//! so the wording stays consistent between pages.

use crate::domain::entities::resource::Resource;

pub fn required(label: &str) -> String {
    format!("{label} is required")
}

pub fn min_length(label: &str, min: usize) -> String {
    format!("{label} must be at least {min} characters")
}

pub fn max_length(label: &str, max: usize) -> String {
    format!("{label} must be at most {max} characters")
}

pub fn out_of_range(label: &str, min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{label} must be between {min} and {max}"),
        (Some(min), None) => format!("{label} must be at least {min}"),
        (None, Some(max)) => format!("{label} must be at most {max}"),
        (None, None) => format!("{label} is out of range"),
    }
}

pub fn invalid_date(label: &str) -> String {
    format!("{label} must be a date (YYYY-MM-DD)")
}

pub fn invalid_datetime(label: &str) -> String {
    format!("{label} must be a date and time (YYYY-MM-DDTHH:MM)")
}

pub fn invalid_format(label: &str) -> String {
    format!("{label} has an invalid format")
}

pub fn load_failed(resource: Resource, reason: &str) -> String {
    format!("Could not load {}: {reason}", resource.title().to_lowercase())
}

pub fn loaded(resource: Resource, total: u64) -> String {
    format!("{} loaded ({total})", resource.title())
}

pub fn saved(resource: Resource) -> String {
    format!("Saved {}", resource.singular())
}

pub fn save_failed(resource: Resource, reason: &str) -> String {
    format!("Could not save {}: {reason}", resource.singular())
}

pub fn deleted(resource: Resource) -> String {
    format!("Deleted {}", resource.singular())
}

pub fn bulk_deleted(resource: Resource, count: usize) -> String {
    format!("Deleted {count} {}", resource.title().to_lowercase())
}

pub fn delete_failed(resource: Resource, reason: &str) -> String {
    format!("Could not delete {}: {reason}", resource.singular())
}

pub fn status_changed(resource: Resource) -> String {
    format!("Updated {} status", resource.singular())
}

pub fn status_change_failed(resource: Resource, reason: &str) -> String {
    format!("Could not update {} status: {reason}", resource.singular())
}

pub fn confirm_delete(resource: Resource) -> String {
    format!("Delete this {}? This cannot be undone.", resource.singular())
}

pub fn confirm_bulk_delete(resource: Resource, count: usize) -> String {
    format!(
        "Delete {count} selected {}? This cannot be undone.",
        resource.title().to_lowercase()
    )
}

pub fn confirm_toggle(resource: Resource) -> String {
    format!("Change the status of this {}?", resource.singular())
}

pub fn form_has_errors() -> String {
    "Please fix the highlighted fields".to_string()
}

pub fn imported(created: usize, failed: usize) -> String {
    format!("Imported {created} questions ({failed} failed)")
}

pub fn import_failed(reason: &str) -> String {
    format!("Import failed: {reason}")
}

pub fn import_cancelled() -> String {
    "Import cancelled".to_string()
}

pub fn submitted() -> String {
    "Submission sent".to_string()
}

pub fn graded(score: f64) -> String {
    format!("Feedback saved (score {score})")
}
