//! Owned projection of a SQLite key value
//!
//! Key sets are held in `BTreeSet`s, so values need a total order. Ordering
//! follows SQLite: numerics sort before text, text before blobs, and integers
//! compare numerically against reals so that a key stored as INTEGER 4 in one
//! database matches REAL 4.0 in the other, exactly as a join would.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A single key or foreign-key value read from a database.
///
/// NULLs never become a `KeyValue`; they are filtered out before extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl KeyValue {
    /// Convert a value fetched through rusqlite. Returns `None` for NULL.
    pub fn from_sql(value: rusqlite::types::Value) -> Option<KeyValue> {
        use rusqlite::types::Value;
        match value {
            Value::Null => None,
            Value::Integer(i) => Some(KeyValue::Integer(i)),
            Value::Real(r) => Some(KeyValue::Real(r)),
            Value::Text(s) => Some(KeyValue::Text(s)),
            Value::Blob(b) => Some(KeyValue::Blob(b)),
        }
    }

    // Storage-class rank: numerics < text < blob, as in SQLite.
    fn rank(&self) -> u8 {
        match self {
            KeyValue::Integer(_) | KeyValue::Real(_) => 0,
            KeyValue::Text(_) => 1,
            KeyValue::Blob(_) => 2,
        }
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use KeyValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Integer(a), Real(b)) => cmp_int_real(*a, *b),
            (Real(a), Integer(b)) => cmp_int_real(*b, *a).reverse(),
            (Real(a), Real(b)) => cmp_real_real(*a, *b),
            (Text(a), Text(b)) => a.cmp(b),
            (Blob(a), Blob(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Exact INTEGER/REAL comparison, as SQLite does it. Going through
/// `i as f64` would collapse integers above 2^53 onto nearby reals and
/// break the total order the key sets rely on.
fn cmp_int_real(i: i64, r: f64) -> Ordering {
    // NaN sorts above every number so the numeric order stays total.
    if r.is_nan() {
        return Ordering::Less;
    }
    // 2^63: every finite f64 at or beyond this exceeds any i64, and every
    // one below the negated bound is smaller than any i64.
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    if r >= I64_BOUND {
        return Ordering::Less;
    }
    if r < -I64_BOUND {
        return Ordering::Greater;
    }
    // |r| < 2^63, so the truncated part converts to i64 exactly.
    let trunc = r.trunc();
    match i.cmp(&(trunc as i64)) {
        Ordering::Equal if r > trunc => Ordering::Less,
        Ordering::Equal if r < trunc => Ordering::Greater,
        ord => ord,
    }
}

// Numeric comparison with -0.0 == 0.0 and all NaNs collapsed to a single
// value above +inf, keeping Eq and Ord consistent across Integer/Real.
fn cmp_real_real(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Integer(i) => write!(f, "{}", i),
            KeyValue::Real(r) => write!(f, "{}", r),
            KeyValue::Text(s) => write!(f, "'{}'", s),
            KeyValue::Blob(b) => {
                write!(f, "x'")?;
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                write!(f, "'")
            }
        }
    }
}
