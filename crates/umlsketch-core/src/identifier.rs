//! Node identifiers backed by a global string interner.
//!
//! Nodes are referenced from edges, layout results, history snapshots and
//! the selection state, so ids are copied around a lot. [`NodeId`] is a
//! `Copy` handle into a process-wide interner; the string form is only
//! materialized for display and persistence.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Process-wide interner shared by every [`NodeId`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// Identifier of a diagram node.
///
/// # Examples
///
/// ```
/// use umlsketch_core::identifier::NodeId;
///
/// let id = NodeId::new("node-3");
/// assert_eq!(id, "node-3");
/// assert_eq!(NodeId::from_counter(3), id);
/// assert_eq!(id.to_string(), "node-3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(DefaultSymbol);

impl NodeId {
    /// Interns `name` and returns its id.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Id handed out to the node created with the given counter value.
    ///
    /// Newly added nodes are named `node-0`, `node-1`, ... in creation order.
    pub fn from_counter(counter: usize) -> Self {
        Self::new(&format!("node-{counter}"))
    }

    /// Returns the string form of the id.
    pub fn as_string(&self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .map(str::to_owned)
                .unwrap_or_default()
        })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::str::FromStr for NodeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_id() {
        assert_eq!(NodeId::new("alpha"), NodeId::new("alpha"));
        assert_ne!(NodeId::new("alpha"), NodeId::new("beta"));
    }

    #[test]
    fn test_from_counter() {
        assert_eq!(NodeId::from_counter(0), "node-0");
        assert_eq!(NodeId::from_counter(12).to_string(), "node-12");
    }

    #[test]
    fn test_parse_and_compare() {
        let id: NodeId = "node-7".parse().unwrap();
        assert!(id == "node-7");
        assert!(id != "node-8");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = NodeId::new("node-4");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"node-4\"");

        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
