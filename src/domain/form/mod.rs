pub mod dual_list;
pub mod schema;
pub mod state;
pub mod validate;
