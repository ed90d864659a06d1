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

//! Repository Scanner
//!
//! Enumerates every loose object and resolves each into the top-level
//! mapping. One resolver is shared across the whole scan so its node cache
//! spans all entries. The first failed resolution aborts the scan; there is
//! no partial-result mode.

use crate::object::{GraphNode, ObjectId};
use crate::resolve::{GraphResolver, ResolveError};
use crate::store::{LooseObjectStore, StoreError};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

/// The output mapping: one entry per object id found in the store, keys in
/// lexicographic hex order. An id reachable as a nested child elsewhere is
/// still fully re-expanded here; there is no back-referencing.
pub type RepositoryGraph = BTreeMap<ObjectId, GraphNode>;

/// Scan errors
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Walks the object database of one repository.
pub struct RepositoryScanner<'a> {
    store: &'a LooseObjectStore,
}

impl<'a> RepositoryScanner<'a> {
    pub fn new(store: &'a LooseObjectStore) -> Self {
        Self { store }
    }

    /// Resolve every stored object into the identifier-keyed graph.
    pub fn scan(&self) -> Result<RepositoryGraph, ScanError> {
        let ids = self.store.list_ids()?;
        info!(objects = ids.len(), "scanning object database");

        let mut resolver = GraphResolver::new(self.store);
        let mut graph = RepositoryGraph::new();
        for id in ids {
            debug!(id = %id.short(), "resolving top-level object");
            let node = resolver.resolve(&id)?;
            graph.insert(id, node);
        }

        info!(nodes = graph.len(), "scan complete");
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{fixture_repo, write_loose};

    #[test]
    fn test_empty_store_yields_empty_graph() {
        let repo = fixture_repo();
        let store = LooseObjectStore::open(repo.path()).unwrap();
        let graph = RepositoryScanner::new(&store).scan().unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_scan_aborts_on_unresolvable_object() {
        let repo = fixture_repo();
        // A tree whose single entry does not exist in the store.
        let tree_id = "bb1784a313e3ac02c0e2d2f0e9c4e4c60b0f36a2";
        let missing = crate::object::ObjectId::from_hex(
            "aa5c8683327cbe20c7d8d2f6f4b9bb50e9b1a355",
        )
        .unwrap();
        let mut body = Vec::new();
        body.extend_from_slice(b"100644 gone.txt\0");
        body.extend_from_slice(missing.as_bytes());
        write_loose(repo.path(), tree_id, "tree", &body);

        let store = LooseObjectStore::open(repo.path()).unwrap();
        let result = RepositoryScanner::new(&store).scan();
        assert!(matches!(
            result,
            Err(ScanError::Resolve(ResolveError::Store(
                StoreError::NotFound(_)
            )))
        ));
    }
}
