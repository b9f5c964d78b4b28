//! Rail Concierge - Conversational Travel Assistant
//!
//! This crate turns free-text chat messages into calls against the Indian
//! Railways data API through a slot-filling dialogue engine.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
