//! Core types for an in-process document store that mimics a subset of a document
//! database's query, update and aggregation interface.
//!
//! This crate provides:
//!
//! - **Documents** ([`document`]) - Raw and typed document helpers, `_id` handling, dotted paths
//! - **Queries** ([`query`]) - The query mini-language parsed into typed clauses
//! - **Updates** ([`update`]) - The `$push`/`$pull` operators parsed into typed operations
//! - **Aggregation** ([`pipeline`]) - Recognition of the supported pipeline shapes
//! - **Backends** ([`backend`]) - The async collection interface and operation results
//! - **Typed collections** ([`collection`]) - Serde-typed access over any backend
//! - **Errors** ([`error`]) - Error and result types
//!
//! Evaluation lives in the storage crates; this crate only describes what to evaluate.

#[allow(unused_extern_crates)]
extern crate self as docshim_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod update;
