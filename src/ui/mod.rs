pub mod components;
pub mod pages;
pub mod route;
pub mod state;
pub mod styles;
