pub mod bot;
pub mod broadcast;
pub mod commands;
pub mod config;
pub mod error;
pub mod membership;
pub mod mention;
pub mod pagination;
pub mod store;
pub mod types;

pub use bot::run;
