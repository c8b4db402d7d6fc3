//! Automation engine: webhook ingest, the delay scheduler, and the
//! action executor.
//!
//! Ingest runs synchronously inside the request that delivered the
//! event and ends with pending execution rows in the database. The
//! scheduler claims those rows once due and hands them to the executor
//! on bounded worker tasks. Replay re-feeds a stored delivery through
//! ingest.

mod error;
pub mod executor;
pub mod ingest;
pub mod replay;
pub mod scheduler;

pub use error::EngineError;
