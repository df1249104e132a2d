pub mod client;

pub use client::SmtpMailer;
