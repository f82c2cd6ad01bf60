pub mod history;
pub mod http;
pub mod import;
pub mod sqlite;
