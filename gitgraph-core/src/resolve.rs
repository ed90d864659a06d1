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

//! Graph Resolver
//!
//! Expands an object id into a fully materialized [`GraphNode`], recursing
//! through commit -> tree -> entry references. Two guards harden the
//! recursion against corrupted stores:
//!
//! - a per-resolution visited set fails fast with `CycleDetected` on
//!   self- or mutually-referential id chains, and
//! - a resolved-node cache shared across the resolver's lifetime avoids
//!   re-reading subtrees reachable through multiple paths. Content is
//!   immutable per id, so caching never changes observable output.

use crate::decode::{decode_commit, decode_tree, DecodeError};
use crate::object::{GraphNode, ObjectId, ObjectKind, TreeChild};
use crate::store::{ObjectStore, StoreError};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::trace;

/// Resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("cycle detected while resolving {0}")]
    CycleDetected(ObjectId),
}

/// Recursive expander over one [`ObjectStore`].
pub struct GraphResolver<'a, S: ObjectStore> {
    store: &'a S,
    cache: HashMap<ObjectId, GraphNode>,
}

impl<'a, S: ObjectStore> GraphResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    /// Materialize the node for `id`, recursively expanding its children.
    ///
    /// Any store or decode failure propagates unchanged; there is no retry
    /// and no partial node.
    pub fn resolve(&mut self, id: &ObjectId) -> Result<GraphNode, ResolveError> {
        let mut path = HashSet::new();
        self.resolve_inner(id, &mut path)
    }

    fn resolve_inner(
        &mut self,
        id: &ObjectId,
        path: &mut HashSet<ObjectId>,
    ) -> Result<GraphNode, ResolveError> {
        if let Some(node) = self.cache.get(id) {
            trace!(id = %id.short(), "resolve cache hit");
            return Ok(node.clone());
        }
        if !path.insert(*id) {
            return Err(ResolveError::CycleDetected(*id));
        }

        let kind = self.store.kind_of(id)?;
        trace!(id = %id.short(), %kind, "resolving object");

        let node = match kind {
            ObjectKind::Blob => {
                let raw = self.store.content_of(id)?;
                GraphNode::Blob {
                    id: *id,
                    content: raw.lines,
                }
            }
            ObjectKind::Commit => {
                let raw = self.store.content_of(id)?;
                let info = decode_commit(&raw)?;
                let tree = self.resolve_inner(&info.tree_id, path)?;
                GraphNode::Commit {
                    id: *id,
                    label: info.message,
                    children: Box::new(tree),
                }
            }
            ObjectKind::Tree => {
                let raw = self.store.content_of(id)?;
                let entries = decode_tree(&raw)?;
                let mut children = Vec::with_capacity(entries.len());
                for entry in entries {
                    let entry_kind = self.store.kind_of(&entry.id)?;
                    let nested = if entry_kind == ObjectKind::Blob {
                        None
                    } else {
                        Some(Box::new(self.resolve_inner(&entry.id, path)?))
                    };
                    children.push(TreeChild {
                        id: entry.id,
                        kind: entry_kind,
                        label: entry.name,
                        children: nested,
                    });
                }
                GraphNode::Tree {
                    id: *id,
                    children,
                }
            }
        };

        path.remove(id);
        self.cache.insert(*id, node.clone());
        Ok(node)
    }
}
