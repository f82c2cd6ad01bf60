/// Browser-style history of list-page query strings (without the leading `?`).
pub trait History: Send + Sync {
    fn current_query(&self) -> String;
    /// Adds an entry without navigating; a no-op when the query is unchanged.
    fn push_query(&self, query: &str);
    fn replace_query(&self, query: &str);
    fn back(&self) -> Option<String>;
    fn forward(&self) -> Option<String>;
}
