//! HTTP gateway adapters: REST client for the live backend, in-memory mock
//! for tests and offline runs.

pub mod mock_adapter;
pub mod rest_adapter;

pub use mock_adapter::{FailureKind, MockGateway};
pub use rest_adapter::RestGateway;
