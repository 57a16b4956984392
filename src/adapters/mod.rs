//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Generation backends (OpenAI-compatible, scripted mock)
//! - `postgres` - PostgreSQL message log and assignment store
//! - `storage` - In-memory message log for tests and database-less runs

pub mod ai;
pub mod postgres;
pub mod storage;

pub use ai::{MockBackend, OpenAIBackend, OpenAIConfig};
pub use postgres::{PostgresAssignmentRepository, PostgresMessageLog};
pub use storage::InMemoryMessageLog;
