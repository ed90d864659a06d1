// Copyright 2025 Gitgraph Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Object Model
//!
//! Identifiers, object kinds, decoded records and the recursive graph node
//! produced by resolution. All values are immutable once constructed.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Object ID - SHA-1 hash (20 bytes) addressing one loose object.
///
/// Serializes as the 40-character lowercase hex string so it can key the
/// output JSON mapping directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub [u8; 20]);

impl ObjectId {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Display as short hex string (like git short hash, 7 chars)
    pub fn short(&self) -> String {
        let hex = self.to_hex();
        hex[..7].to_string()
    }

    /// Full hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self, ParseIdError> {
        let bytes = hex::decode(hex_str).map_err(|_| ParseIdError::InvalidHex)?;
        if bytes.len() != 20 {
            return Err(ParseIdError::InvalidLength);
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(D::Error::custom)
    }
}

/// Parse errors for ObjectId
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    InvalidHex,
    InvalidLength,
}

impl std::fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseIdError::InvalidHex => write!(f, "Invalid hex string"),
            ParseIdError::InvalidLength => write!(f, "Invalid length (expected 20 bytes)"),
        }
    }
}

impl std::error::Error for ParseIdError {}

/// Object kind as stored in the loose-object header.
///
/// Only the three kinds the walker models; annotated tags are rejected at
/// the store boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    /// Parse the type tag of a loose-object header.
    pub fn from_header_tag(tag: &str) -> Option<Self> {
        match tag {
            "blob" => Some(ObjectKind::Blob),
            "tree" => Some(ObjectKind::Tree),
            "commit" => Some(ObjectKind::Commit),
            _ => None,
        }
    }

    /// The tag used in headers and pretty-printed tree listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Undecoded textual body of one object, split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub lines: Vec<String>,
}

impl RawObject {
    /// Build from the decoded text: trailing whitespace is trimmed, then the
    /// body is split on newlines. An empty body yields a single empty line,
    /// mirroring the `cat-file -p` text contract the decoder expects.
    pub fn from_text(id: ObjectId, kind: ObjectKind, text: &str) -> Self {
        let lines = text.trim_end().split('\n').map(str::to_string).collect();
        Self { id, kind, lines }
    }
}

/// One decoded line of a tree listing.
///
/// The entry's kind is not part of the listing record; the resolver looks it
/// up through the store when it expands the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub id: ObjectId,
}

/// The fields extracted from a commit body: the pointed-to tree and the
/// message, taken as the last content line only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub tree_id: ObjectId,
    pub message: String,
}

/// Fully resolved node of the object graph, tagged by kind in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GraphNode {
    /// Terminal node carrying the blob's content lines.
    Blob { id: ObjectId, content: Vec<String> },
    /// Directory-like node with one child per listing entry, in listing order.
    Tree { id: ObjectId, children: Vec<TreeChild> },
    /// A commit labelled with its message, wrapping the resolved tree.
    Commit {
        id: ObjectId,
        label: String,
        children: Box<GraphNode>,
    },
}

impl GraphNode {
    /// The id of the object this node was resolved from.
    pub fn id(&self) -> &ObjectId {
        match self {
            GraphNode::Blob { id, .. } => id,
            GraphNode::Tree { id, .. } => id,
            GraphNode::Commit { id, .. } => id,
        }
    }

    /// The node's object kind.
    pub fn kind(&self) -> ObjectKind {
        match self {
            GraphNode::Blob { .. } => ObjectKind::Blob,
            GraphNode::Tree { .. } => ObjectKind::Tree,
            GraphNode::Commit { .. } => ObjectKind::Commit,
        }
    }
}

/// One resolved tree entry. Blob entries keep only id/kind/label; non-blob
/// entries carry the fully expanded node (blob content is never inlined at
/// tree-entry level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeChild {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Box<GraphNode>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(hex: &str) -> ObjectId {
        ObjectId::from_hex(hex).unwrap()
    }

    const BLOB_ID: &str = "aa5c8683327cbe20c7d8d2f6f4b9bb50e9b1a355";

    #[test]
    fn test_object_id_hex_roundtrip() {
        let oid = id(BLOB_ID);
        assert_eq!(oid.to_hex(), BLOB_ID);
        assert_eq!(ObjectId::from_hex(&oid.to_hex()).unwrap(), oid);
    }

    #[test]
    fn test_object_id_rejects_bad_input() {
        assert_eq!(ObjectId::from_hex("zz"), Err(ParseIdError::InvalidHex));
        assert_eq!(ObjectId::from_hex("aabb"), Err(ParseIdError::InvalidLength));
    }

    #[test]
    fn test_object_id_short() {
        let oid = id(BLOB_ID);
        assert_eq!(oid.short(), "aa5c868");
        assert!(oid.to_hex().starts_with(&oid.short()));
    }

    #[test]
    fn test_object_id_serializes_as_hex_string() {
        let oid = id(BLOB_ID);
        let json = serde_json::to_string(&oid).unwrap();
        assert_eq!(json, format!("\"{BLOB_ID}\""));
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, oid);
    }

    #[test]
    fn test_object_id_orders_lexicographically() {
        let a = id("00aa8683327cbe20c7d8d2f6f4b9bb50e9b1a355");
        let b = id("ff5c8683327cbe20c7d8d2f6f4b9bb50e9b1a355");
        assert!(a < b);
    }

    #[test]
    fn test_kind_header_tags() {
        assert_eq!(ObjectKind::from_header_tag("blob"), Some(ObjectKind::Blob));
        assert_eq!(ObjectKind::from_header_tag("tree"), Some(ObjectKind::Tree));
        assert_eq!(
            ObjectKind::from_header_tag("commit"),
            Some(ObjectKind::Commit)
        );
        assert_eq!(ObjectKind::from_header_tag("tag"), None);
    }

    #[test]
    fn test_raw_object_line_splitting() {
        let raw = RawObject::from_text(id(BLOB_ID), ObjectKind::Blob, "hi\n");
        assert_eq!(raw.lines, vec!["hi"]);

        let raw = RawObject::from_text(id(BLOB_ID), ObjectKind::Blob, "a\nb\n\n");
        assert_eq!(raw.lines, vec!["a", "b"]);

        let raw = RawObject::from_text(id(BLOB_ID), ObjectKind::Blob, "");
        assert_eq!(raw.lines, vec![""]);
    }

    #[test]
    fn test_blob_node_json_shape() {
        let node = GraphNode::Blob {
            id: id(BLOB_ID),
            content: vec!["hi".to_string()],
        };
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["kind"], "blob");
        assert_eq!(value["id"], BLOB_ID);
        assert_eq!(value["content"][0], "hi");
    }

    #[test]
    fn test_tree_child_omits_absent_children() {
        let child = TreeChild {
            id: id(BLOB_ID),
            kind: ObjectKind::Blob,
            label: "hello.txt".to_string(),
            children: None,
        };
        let value = serde_json::to_value(&child).unwrap();
        assert!(value.get("children").is_none());
        assert_eq!(value["label"], "hello.txt");
        assert_eq!(value["kind"], "blob");
    }

    #[test]
    fn test_graph_node_json_roundtrip() {
        let node = GraphNode::Commit {
            id: id(BLOB_ID),
            label: "initial".to_string(),
            children: Box::new(GraphNode::Tree {
                id: id("bb5c8683327cbe20c7d8d2f6f4b9bb50e9b1a355"),
                children: vec![],
            }),
        };
        let json = serde_json::to_string(&node).unwrap();
        let back: GraphNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
