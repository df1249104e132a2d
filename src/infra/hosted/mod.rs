pub mod client;

pub use client::HostedChannel;
