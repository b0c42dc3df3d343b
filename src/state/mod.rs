pub mod columns;
pub mod data_model;
pub mod drag;
pub mod filter;
pub mod geometry;
pub mod pipeline;
pub mod popup;
pub mod sort;
pub mod table_state;
pub mod view_config;
