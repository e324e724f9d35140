//! Infrastructure adapters. Implement outbound ports.
//!
//! HTTP gateway and interactive UI. Map errors to DomainError.

pub mod http;
pub mod ui;
