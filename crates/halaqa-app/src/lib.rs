pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod runner;
