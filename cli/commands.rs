pub mod config;
pub mod generate;
pub mod purge;
pub mod push;
pub mod setup;
