//! Derive the static shape of the data a JSON Schema describes.
//!
//! ```text
//! schema (serde_json::Value)
//!   → schema::classify      which recognized shape?
//!   → derive::Deriver       resolve shapes recursively → ty::Ty
//!   → combinator            allOf members folded by intersection
//!   → codegen               TypeScript declarations
//! ```
//!
//! The derivation is total: anything it cannot narrow is the universal
//! `Value` type, and nothing in it returns an error.
pub mod cli;
pub mod codegen;
pub mod combinator;
pub mod config;
pub mod derive;
pub mod error;
pub mod jq_exec;
pub mod path_de;
pub mod schema;
pub mod ty;

pub use config::DeriveOptions;
pub use derive::{type_of_schema, Deriver};
pub use ty::{Field, ObjectTy, Ty};
