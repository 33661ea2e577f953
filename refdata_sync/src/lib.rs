//! Migration engine for bond/ISIN security reference data.
//!
//! Reads heterogeneous per-ISIN documents from a document store (via the
//! `docstore` crate), normalizes the messy free-text fields into typed
//! values, and reconciles them into a relational schema with a
//! coalesce-preserve merge: a later run with partial data never erases a
//! previously captured value.

#![deny(missing_docs)]

pub mod clean;
pub mod content_hash;
pub mod coupon;
pub mod db;
pub mod errors;
pub mod failures;
pub mod frequency;
pub mod mapping;
pub mod orchestrate;
pub mod ratings;
pub mod reconcile;
pub mod record;
pub mod resolve;
pub mod schema;
