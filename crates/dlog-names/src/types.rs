//! Registry record types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dlog_types::ContentRef;
use serde::{Deserialize, Serialize};

use crate::error::{NameError, NameResult};
use crate::names::validate_name;

/// What a registered name currently points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Reference to the published head pointer object.
    pub target: ContentRef,
    /// When `target` was last set.
    pub published_at: DateTime<Utc>,
}

impl NameRecord {
    /// A record pointing at `target`, stamped now.
    pub fn now(target: ContentRef) -> Self {
        Self {
            target,
            published_at: Utc::now(),
        }
    }
}

/// Sorted name table shared by the registry backends.
pub(crate) type NameTable = BTreeMap<String, NameRecord>;

/// Insert a new registration, refusing names that already exist.
pub(crate) fn claim(table: &mut NameTable, name: &str, target: ContentRef) -> NameResult<NameRecord> {
    validate_name(name)?;
    if table.contains_key(name) {
        return Err(NameError::AlreadyTaken {
            name: name.to_string(),
        });
    }
    let record = NameRecord::now(target);
    table.insert(name.to_string(), record);
    Ok(record)
}

/// Move an existing registration to a new target.
pub(crate) fn repoint(table: &mut NameTable, name: &str, target: ContentRef) -> NameResult<NameRecord> {
    validate_name(name)?;
    let slot = table.get_mut(name).ok_or_else(|| NameError::NotRegistered {
        name: name.to_string(),
    })?;
    *slot = NameRecord::now(target);
    Ok(*slot)
}
