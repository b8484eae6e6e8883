//! Core identifier types for the gatewave signal kernel.
//!
//! This module defines the two names everything else hangs off: signals
//! ("nodes") and batch entries. Both are thin string newtypes so that maps
//! keyed by them stay readable in diagnostics while still answering plain
//! `&str` lookups.
//!
//! # Key Types
//!
//! - [`NodeId`]: names a boolean signal produced by exactly one module
//! - [`EntryId`]: keys one record of the externally supplied data batch
//!
//! # Examples
//!
//! ```rust
//! use gatewave::types::{EntryId, NodeId};
//!
//! let node = NodeId::from("line_of_sight");
//! let entry = EntryId::from("contact-7");
//!
//! assert_eq!(node.as_str(), "line_of_sight");
//! assert_eq!(format!("{node}@{entry}"), "line_of_sight@contact-7");
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of a boolean signal propagated through the graph.
///
/// A node is not a materialized object: it exists as a key in the kernel's
/// node registry and, per tick, as a lane of per-entry boolean values. The
/// kernel guarantees at construction time that every `NodeId` has at most
/// one producing module.
///
/// # Examples
///
/// ```rust
/// use gatewave::types::NodeId;
///
/// let a = NodeId::from("in_envelope");
/// let b: NodeId = String::from("in_envelope").into();
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node name from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The node name as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

// Developer Experience: allow string literals wherever a NodeId is expected.
impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `FxHashMap<NodeId, _>` and `BTreeSet<NodeId>` answer `&str` lookups.
impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Key of one entry in the raw data batch.
///
/// Entry keys are chosen by the external batch supplier; the kernel treats
/// them as opaque. Every signal value computed during a tick is indexed by
/// the entry key it was computed for.
///
/// # Examples
///
/// ```rust
/// use gatewave::types::EntryId;
///
/// let entry = EntryId::from("track-042");
/// assert_eq!(entry.as_str(), "track-042");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Create an entry key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The entry key as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
