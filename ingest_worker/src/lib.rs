//! The worker binary's plumbing: trigger-record parsing, environment configuration, the Shopify-backed order
//! fetcher, channel-backed topic publishers, and the dispatch loop that plays external scheduler for continuation
//! signals.
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod fetcher;
pub mod publishers;
pub mod records;
