pub mod dual_list;
pub mod form;
pub mod import;
pub mod management;
pub mod pagination;
pub mod submission;
