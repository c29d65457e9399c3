//! refcheck - Referential integrity checker for masked SQLite datasets
//!
//! Verifies that every non-null foreign-key value in a child table still
//! resolves to a key in the referenced parent table after data masking.

pub mod checker;
pub mod error;
pub mod identifier;
pub mod value;

pub use checker::{ForeignKeyRelation, IntegrityChecker, IntegrityReport};
pub use error::{CheckError, Result};
pub use value::KeyValue;
