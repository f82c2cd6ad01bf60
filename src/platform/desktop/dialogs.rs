use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::usecase::ports::confirm::{Confirmation, Confirmer};

/// Native yes/no dialog.
pub struct DialogConfirmer;

impl Confirmer for DialogConfirmer {
    fn confirm(&self, confirmation: &Confirmation) -> bool {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(confirmation.title.as_str())
            .set_description(confirmation.description.as_str())
            .set_buttons(MessageButtons::YesNo)
            .show()
            == MessageDialogResult::Yes
    }
}

pub fn pick_question_file() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("Question files", &["csv", "xlsx", "xls", "ods"])
        .pick_file()
}

pub fn show_error(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
