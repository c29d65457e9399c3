//! Integrity checker core
//!
//! Opens the two databases read-only, projects the parent key set and the
//! child foreign-key set, and reports the set difference as orphans.

use crate::error::{CheckError, Result};
use crate::identifier;
use crate::value::KeyValue;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A single declared foreign-key relationship between two tables.
#[derive(Debug, Clone)]
pub struct ForeignKeyRelation {
    /// Child table holding the foreign key.
    pub table_name: String,
    /// Foreign-key column in the child table.
    pub foreign_key_column: String,
    /// Parent table referenced by the foreign key.
    pub parent_table: String,
    /// Key column in the parent table.
    pub parent_key_column: String,
}

impl ForeignKeyRelation {
    fn validate(&self) -> Result<()> {
        identifier::validate(&self.table_name)?;
        identifier::validate(&self.foreign_key_column)?;
        identifier::validate(&self.parent_table)?;
        identifier::validate(&self.parent_key_column)?;
        Ok(())
    }
}

/// Result of one integrity check.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    /// Distinct keys present in the parent table.
    pub parent_key_count: usize,
    /// Distinct non-null foreign-key values present in the child table.
    pub child_key_count: usize,
    /// Foreign-key values with no matching parent key, in sorted order.
    pub orphans: BTreeSet<KeyValue>,
}

impl IntegrityReport {
    /// True iff every non-null foreign-key value resolved to a parent key.
    pub fn is_valid(&self) -> bool {
        self.orphans.is_empty()
    }
}

/// Checks referential integrity of one foreign-key relationship across two
/// SQLite database files: parent keys are read from the first database,
/// foreign-key values from the second.
pub struct IntegrityChecker {
    db_path1: PathBuf,
    db_path2: PathBuf,
    relation: ForeignKeyRelation,
}

impl IntegrityChecker {
    /// Validate paths and identifiers up front; fails before any query runs.
    pub fn new(
        db_path1: impl Into<PathBuf>,
        db_path2: impl Into<PathBuf>,
        relation: ForeignKeyRelation,
    ) -> Result<Self> {
        let db_path1 = db_path1.into();
        let db_path2 = db_path2.into();
        if !db_path1.exists() {
            return Err(CheckError::DatabaseNotFound(db_path1));
        }
        if !db_path2.exists() {
            return Err(CheckError::DatabaseNotFound(db_path2));
        }
        relation.validate()?;
        Ok(Self {
            db_path1,
            db_path2,
            relation,
        })
    }

    /// Run the check. Read-only; both connections are scoped to this call.
    pub fn check(&self) -> Result<IntegrityReport> {
        info!(
            "Checking {}.{} -> {}.{}",
            self.relation.table_name,
            self.relation.foreign_key_column,
            self.relation.parent_table,
            self.relation.parent_key_column
        );

        let parent_keys = load_key_set(
            &self.db_path1,
            &self.relation.parent_table,
            &self.relation.parent_key_column,
        )?;
        debug!(
            "Loaded {} distinct parent keys from {}",
            parent_keys.len(),
            self.db_path1.display()
        );

        let child_keys = load_key_set(
            &self.db_path2,
            &self.relation.table_name,
            &self.relation.foreign_key_column,
        )?;
        debug!(
            "Loaded {} distinct foreign-key values from {}",
            child_keys.len(),
            self.db_path2.display()
        );

        let orphans: BTreeSet<KeyValue> =
            child_keys.difference(&parent_keys).cloned().collect();

        if orphans.is_empty() {
            info!("Referential integrity check passed");
        } else {
            let examples: Vec<String> =
                orphans.iter().take(5).map(|v| v.to_string()).collect();
            warn!(
                "Referential integrity check failed: {} orphaned foreign keys (examples: {})",
                orphans.len(),
                examples.join(", ")
            );
        }

        Ok(IntegrityReport {
            parent_key_count: parent_keys.len(),
            child_key_count: child_keys.len(),
            orphans,
        })
    }
}

/// Distinct non-null values of one column, as a sorted set.
fn load_key_set(db_path: &Path, table: &str, column: &str) -> Result<BTreeSet<KeyValue>> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let col = identifier::quoted(column)?;
    let sql = format!(
        "SELECT DISTINCT {col} FROM {table} WHERE {col} IS NOT NULL",
        col = col,
        table = identifier::quoted(table)?,
    );
    debug!("Query on {}: {}", db_path.display(), sql);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, rusqlite::types::Value>(0))?;

    let mut keys = BTreeSet::new();
    for row in rows {
        if let Some(value) = KeyValue::from_sql(row?) {
            keys.insert(value);
        }
    }
    Ok(keys)
}
