//! Domain layer for the Ghost → listmonk automation bridge.
//!
//! This crate has no internal dependencies so it can be used by the
//! persistence layer, the execution engine, and the API server alike.
//! It holds the shared primitive types, the error taxonomy, and the pure
//! domain logic: duration tokens, webhook signatures, trigger detection,
//! and the Son (automation rule) model with its validation rules.

pub mod duration;
pub mod error;
pub mod event;
pub mod pagination;
pub mod signature;
pub mod son;
pub mod types;
