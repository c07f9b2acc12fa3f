pub mod document;
pub mod resource;
pub mod root;
