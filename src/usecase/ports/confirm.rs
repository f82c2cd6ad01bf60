#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub description: String,
}

impl Confirmation {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

pub trait Confirmer {
    fn confirm(&self, confirmation: &Confirmation) -> bool;
}
