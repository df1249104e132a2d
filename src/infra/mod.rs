pub mod config;
pub mod hosted;
pub mod smtp;
