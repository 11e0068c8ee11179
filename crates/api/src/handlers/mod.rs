pub mod alert;
pub mod comment;
pub mod project;
