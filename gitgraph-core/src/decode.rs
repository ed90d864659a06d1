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

//! Object Decoder
//!
//! Parses the kind-specific textual bodies handed out by the store. Blobs
//! need no decoding; trees and commits are picked apart line by line. The
//! first malformed line aborts the decode, there is no partial-record
//! recovery.

use crate::object::{CommitInfo, ObjectId, RawObject, TreeEntry};
use thiserror::Error;

/// Decode errors
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed tree entry in {id}: {line:?}")]
    MalformedTreeEntry { id: ObjectId, line: String },

    #[error("malformed commit {id}: {reason}")]
    MalformedCommit { id: ObjectId, reason: String },
}

/// Decode a tree listing into its ordered entries.
///
/// Each line carries a trailing `<hex-id>\t<name>` segment after the last
/// space; the id sits before the tab and the name after it. A name containing
/// further tabs is kept whole, a name containing a space is not recoverable
/// from this listing form and fails as malformed.
pub fn decode_tree(raw: &RawObject) -> Result<Vec<TreeEntry>, DecodeError> {
    // An empty tree pretty-prints to an empty body, which lines up as one
    // empty line.
    if raw.lines.len() == 1 && raw.lines[0].is_empty() {
        return Ok(Vec::new());
    }

    raw.lines
        .iter()
        .map(|line| {
            let malformed = || DecodeError::MalformedTreeEntry {
                id: raw.id,
                line: line.clone(),
            };
            let segment = line.split(' ').next_back().unwrap_or(line);
            let (hex, name) = segment.split_once('\t').ok_or_else(|| malformed())?;
            let id = ObjectId::from_hex(hex).map_err(|_| malformed())?;
            Ok(TreeEntry {
                name: name.to_string(),
                id,
            })
        })
        .collect()
}

/// Decode a commit body into its tree reference and message.
///
/// The tree id is the second space-separated token of the first line. The
/// message is the last content line only; multi-paragraph commit bodies are
/// deliberately not reassembled.
pub fn decode_commit(raw: &RawObject) -> Result<CommitInfo, DecodeError> {
    let first = raw.lines.first().ok_or_else(|| DecodeError::MalformedCommit {
        id: raw.id,
        reason: "empty content".to_string(),
    })?;
    let token = first
        .split(' ')
        .nth(1)
        .ok_or_else(|| DecodeError::MalformedCommit {
            id: raw.id,
            reason: "first line carries no tree id".to_string(),
        })?;
    let tree_id = ObjectId::from_hex(token).map_err(|_| DecodeError::MalformedCommit {
        id: raw.id,
        reason: format!("invalid tree id `{token}`"),
    })?;
    let message = raw.lines.last().cloned().unwrap_or_default();
    Ok(CommitInfo { tree_id, message })
}
