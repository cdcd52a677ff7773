pub mod actors;
pub mod cli;
pub mod error;
pub mod filter;
pub mod github;
pub mod models;
pub mod pagination;
pub mod query_form;
pub mod render;
pub mod store;
pub mod types;
