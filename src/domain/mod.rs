pub mod entities;
pub mod form;
pub mod plantuml;
pub mod url_state;
