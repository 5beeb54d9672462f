pub mod constants;
pub mod layout;
pub mod render;
pub mod terminal;
