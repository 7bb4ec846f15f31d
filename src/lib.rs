pub mod admin;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod output;
pub mod ranking;
pub mod season;
pub mod stderr_buffer;
pub mod store;
pub mod tui;
