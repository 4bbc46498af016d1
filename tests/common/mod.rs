//! Shared test doubles for the integration tests.

pub mod mock_bot;
pub mod mock_completion;
