pub mod models;
pub mod error;
pub mod minimax;
pub mod bot_strategy;
pub mod session;
pub mod scheduler;
pub mod driver;
pub mod config;
pub mod arena;
