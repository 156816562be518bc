// crates/approval-gate-core/src/core/path.rs
// ============================================================================
// Module: Approval Gate Field Paths
// Description: Dot-separated paths and nested get/set over JSON documents.
// Purpose: Address monitored subtrees and status fields at arbitrary depth.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`FieldPath`] is a non-empty sequence of object keys parsed from a
//! dot-separated string. Empty segments are dropped, so `"spec..resources."`
//! parses the same as `"spec.resources"`.
//!
//! [`get_path`] never fails: absent keys and non-object intermediates simply
//! report `None`. [`set_path`] creates missing intermediate objects and fails
//! only when an existing intermediate is not an object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by path parsing and nested writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path contained no non-empty segments.
    #[error("invalid key: path has no segments")]
    Empty,
    /// An intermediate segment exists but is not an object.
    #[error("key \"{segment}\" exists but is not a map")]
    NotAMapping {
        /// Offending segment.
        segment: String,
    },
}

// ============================================================================
// SECTION: Field Path
// ============================================================================

/// Parsed dot-separated document path.
///
/// # Invariants
/// - Holds at least one segment.
/// - Segments are non-empty and contain no `.` characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    /// Ordered object keys from the root.
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dot-separated path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] when no non-empty segment is present.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let segments: Vec<String> =
            raw.split('.').filter(|part| !part.is_empty()).map(str::to_string).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self {
            segments,
        })
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Splits the path into its leading section key and the remaining field path.
    ///
    /// Returns `None` for single-segment paths.
    #[must_use]
    pub fn split_section(&self) -> Option<(&str, Self)> {
        let (section, rest) = self.segments.split_first()?;
        if rest.is_empty() {
            return None;
        }
        Some((
            section.as_str(),
            Self {
                segments: rest.to_vec(),
            },
        ))
    }

    /// Drops a leading `root` segment so the path is relative to that section.
    ///
    /// `status.approved` relative to `status` becomes `approved`. Paths that do
    /// not start with `root`, or consist only of `root`, are returned unchanged.
    #[must_use]
    pub fn relative_to(&self, root: &str) -> Self {
        match self.segments.split_first() {
            Some((first, rest)) if first == root && !rest.is_empty() => Self {
                segments: rest.to_vec(),
            },
            _ => self.clone(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

// ============================================================================
// SECTION: Nested Access
// ============================================================================

/// Returns the value at `path` inside `root`, or `None` when any segment is
/// missing or an intermediate value is not an object.
#[must_use]
pub fn get_path<'a>(root: &'a Map<String, Value>, path: &FieldPath) -> Option<&'a Value> {
    let (first, rest) = path.segments.split_first()?;
    let mut current = root.get(first)?;
    for segment in rest {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Writes `value` at `path` inside `root`, creating empty objects for missing
/// intermediate segments.
///
/// # Errors
///
/// Returns [`PathError::NotAMapping`] when an existing intermediate value is
/// not an object. Objects created for earlier missing segments are kept.
pub fn set_path(
    root: &mut Map<String, Value>,
    path: &FieldPath,
    value: Value,
) -> Result<(), PathError> {
    let (last, parents) = path.segments.split_last().ok_or(PathError::Empty)?;
    let mut current = root;
    for segment in parents {
        let entry = current.entry(segment.clone()).or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => {
                return Err(PathError::NotAMapping {
                    segment: segment.clone(),
                });
            }
        };
    }
    current.insert(last.clone(), value);
    Ok(())
}
