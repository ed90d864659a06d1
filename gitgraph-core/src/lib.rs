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

//! Gitgraph Core
//!
//! Walks a repository's loose-object database and reconstructs every stored
//! object (commit, tree, blob) and its references as one JSON-serializable
//! graph.
//!
//! ## Architecture
//!
//! ```text
//! RepositoryScanner          enumerates the objects/ two-level fan-out
//!        │
//!        ▼
//! GraphResolver              expands each id into a GraphNode, with a
//!        │                   cycle guard and a shared node cache
//!        ▼
//! ObjectDecoder              parses tree listings and commit bodies
//!        │
//!        ▼
//! ObjectStore                inflates loose objects, classifies them and
//!                            hands out their textual content
//! ```
//!
//! The scan is strictly sequential and read-only: all nodes are built in one
//! pass and never mutated afterwards. Any error aborts the whole scan; there
//! is no partial-output mode.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gitgraph_core::{LooseObjectStore, RepositoryScanner};
//!
//! let store = LooseObjectStore::open("path/to/repo")?;
//! let graph = RepositoryScanner::new(&store).scan()?;
//! let json = serde_json::to_string(&graph)?;
//! ```

pub mod decode;
pub mod object;
pub mod resolve;
pub mod scan;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use decode::{decode_commit, decode_tree, DecodeError};
pub use object::{
    CommitInfo, GraphNode, ObjectId, ObjectKind, ParseIdError, RawObject, TreeChild, TreeEntry,
};
pub use resolve::{GraphResolver, ResolveError};
pub use scan::{RepositoryGraph, RepositoryScanner, ScanError};
pub use store::{LooseObjectStore, MemoryObjectStore, ObjectStore, StoreError};
