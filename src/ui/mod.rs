pub mod actions;
pub mod app;
pub mod filter_popup;
pub mod table;
pub mod toolbar;
