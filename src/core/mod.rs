pub mod config;
pub mod emotion;
pub mod state;
pub mod stats;
