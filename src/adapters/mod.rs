//! Adapters - Implementations of the ports against real infrastructure.

pub mod http;
pub mod llm;
pub mod memory;
pub mod rail;
pub mod redis;
