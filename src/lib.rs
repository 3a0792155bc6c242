pub mod cli;
pub mod config;
pub mod core;
pub mod credits;
pub mod search;
pub mod site;
