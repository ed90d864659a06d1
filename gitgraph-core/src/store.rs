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

//! Object Store - Loose-Object Database Access
//!
//! Read-only access to a repository's `.git/objects` directory. Objects are
//! inflated from their zlib-compressed loose encoding, classified by the
//! `<type> <size>\0` header and handed out as text: blobs and commits as
//! their body verbatim, trees rendered to the `cat-file -p` listing form
//! `<mode> <type> <hex>\t<name>` so the decoder sees one uniform text
//! contract regardless of the on-disk encoding.

use crate::object::{ObjectId, ObjectKind, RawObject};
use flate2::read::ZlibDecoder;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("failed to decode object {id}: {reason}")]
    Decode { id: ObjectId, reason: String },

    #[error("object database unavailable at {}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    fn decode(id: ObjectId, reason: impl Into<String>) -> Self {
        StoreError::Decode {
            id,
            reason: reason.into(),
        }
    }
}

/// Read access to a content-addressed object database.
///
/// The resolver only depends on this seam, so tests exercise it against
/// [`MemoryObjectStore`] while the CLI binds a [`LooseObjectStore`].
pub trait ObjectStore {
    /// Classify an object without interpreting its body.
    fn kind_of(&self, id: &ObjectId) -> Result<ObjectKind, StoreError>;

    /// Fetch the decoded textual body, split into trimmed lines.
    fn content_of(&self, id: &ObjectId) -> Result<RawObject, StoreError>;
}

/// On-disk store over a repository's loose objects, bound to an explicit
/// repository root.
#[derive(Debug)]
pub struct LooseObjectStore {
    objects_dir: PathBuf,
}

impl LooseObjectStore {
    /// Open the object database under `<repo_root>/.git/objects`.
    pub fn open(repo_root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let objects_dir = repo_root.as_ref().join(".git").join("objects");
        match std::fs::metadata(&objects_dir) {
            Ok(meta) if meta.is_dir() => {
                debug!(path = %objects_dir.display(), "opened object database");
                Ok(Self { objects_dir })
            }
            Ok(_) => Err(StoreError::Unavailable {
                source: std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
                path: objects_dir,
            }),
            Err(source) => Err(StoreError::Unavailable {
                path: objects_dir,
                source,
            }),
        }
    }

    /// Directory holding the two-level object fan-out.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Enumerate every loose object id, sorted lexicographically.
    ///
    /// Only 2-hex-character first-level directories are scanned, which skips
    /// `info/` and `pack/`. Second-level entries that do not complete a valid
    /// id (e.g. temporary files) are skipped as well.
    pub fn list_ids(&self) -> Result<Vec<ObjectId>, StoreError> {
        let entries =
            std::fs::read_dir(&self.objects_dir).map_err(|source| StoreError::Unavailable {
                path: self.objects_dir.clone(),
                source,
            })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let dir_name = entry.file_name();
            let Some(prefix) = dir_name.to_str() else {
                continue;
            };
            if prefix.len() != 2 || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
                continue;
            }
            if !entry.file_type()?.is_dir() {
                continue;
            }
            for child in std::fs::read_dir(entry.path())? {
                let child = child?;
                let file_name = child.file_name();
                let Some(suffix) = file_name.to_str() else {
                    continue;
                };
                match ObjectId::from_hex(&format!("{prefix}{suffix}")) {
                    Ok(id) => ids.push(id),
                    Err(_) => {
                        debug!(prefix, suffix, "skipping non-object entry");
                    }
                }
            }
        }
        ids.sort_unstable();
        debug!(count = ids.len(), "enumerated loose objects");
        Ok(ids)
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.objects_dir.join(&hex[..2]).join(&hex[2..])
    }

    /// Inflate one loose object and split off its header.
    fn read_raw(&self, id: &ObjectId) -> Result<(ObjectKind, Vec<u8>), StoreError> {
        let path = self.object_path(id);
        let compressed = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*id));
            }
            Err(err) => return Err(StoreError::Io(err)),
        };

        let mut bytes = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut bytes)
            .map_err(|err| StoreError::decode(*id, format!("zlib inflate failed: {err}")))?;

        let nul = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| StoreError::decode(*id, "missing header terminator"))?;
        let header = std::str::from_utf8(&bytes[..nul])
            .map_err(|_| StoreError::decode(*id, "header is not valid UTF-8"))?;
        let (tag, size) = header
            .split_once(' ')
            .ok_or_else(|| StoreError::decode(*id, format!("malformed header `{header}`")))?;
        let kind = ObjectKind::from_header_tag(tag)
            .ok_or_else(|| StoreError::decode(*id, format!("unsupported object type `{tag}`")))?;
        let size: usize = size
            .parse()
            .map_err(|_| StoreError::decode(*id, format!("invalid size `{size}` in header")))?;

        let body = bytes[nul + 1..].to_vec();
        if body.len() != size {
            return Err(StoreError::decode(
                *id,
                format!("header size {size} does not match body length {}", body.len()),
            ));
        }
        Ok((kind, body))
    }
}

impl ObjectStore for LooseObjectStore {
    fn kind_of(&self, id: &ObjectId) -> Result<ObjectKind, StoreError> {
        let (kind, _) = self.read_raw(id)?;
        Ok(kind)
    }

    fn content_of(&self, id: &ObjectId) -> Result<RawObject, StoreError> {
        let (kind, body) = self.read_raw(id)?;
        let text = match kind {
            ObjectKind::Blob | ObjectKind::Commit => std::str::from_utf8(&body)
                .map_err(|_| StoreError::decode(*id, "body is not valid UTF-8"))?
                .to_string(),
            ObjectKind::Tree => render_tree_listing(id, &body)?,
        };
        Ok(RawObject::from_text(*id, kind, &text))
    }
}

/// Render a tree's binary entries (`<mode> <name>\0<20-byte id>` repeated) to
/// the textual listing form consumed downstream.
fn render_tree_listing(id: &ObjectId, body: &[u8]) -> Result<String, StoreError> {
    let mut out = String::new();
    let mut rest = body;
    while !rest.is_empty() {
        let sp = rest
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| StoreError::decode(*id, "tree entry missing mode separator"))?;
        let mode = std::str::from_utf8(&rest[..sp])
            .map_err(|_| StoreError::decode(*id, "tree entry mode is not valid UTF-8"))?;
        let mode = u32::from_str_radix(mode, 8)
            .map_err(|_| StoreError::decode(*id, format!("invalid tree entry mode `{mode}`")))?;

        let nul = rest[sp + 1..]
            .iter()
            .position(|&b| b == 0)
            .map(|pos| pos + sp + 1)
            .ok_or_else(|| StoreError::decode(*id, "tree entry missing name terminator"))?;
        let name = std::str::from_utf8(&rest[sp + 1..nul])
            .map_err(|_| StoreError::decode(*id, "tree entry name is not valid UTF-8"))?;

        let hash_end = nul + 1 + 20;
        if rest.len() < hash_end {
            return Err(StoreError::decode(*id, "truncated tree entry hash"));
        }
        let mut raw = [0u8; 20];
        raw.copy_from_slice(&rest[nul + 1..hash_end]);
        let entry_id = ObjectId::from_bytes(raw);

        let entry_kind = match mode {
            0o040000 => ObjectKind::Tree,
            // Gitlinks (submodules) reference a commit in another repository.
            0o160000 => ObjectKind::Commit,
            _ => ObjectKind::Blob,
        };

        out.push_str(&format!(
            "{:06o} {} {}\t{}\n",
            mode,
            entry_kind.as_str(),
            entry_id.to_hex(),
            name
        ));
        rest = &rest[hash_end..];
    }
    Ok(out)
}

/// In-memory object store (for testing and lightweight use).
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: HashMap<ObjectId, (ObjectKind, String)>,
}

impl MemoryObjectStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object under the given id.
    pub fn insert(&mut self, id: ObjectId, kind: ObjectKind, text: impl Into<String>) {
        self.objects.insert(id, (kind, text.into()));
    }
}

impl ObjectStore for MemoryObjectStore {
    fn kind_of(&self, id: &ObjectId) -> Result<ObjectKind, StoreError> {
        self.objects
            .get(id)
            .map(|(kind, _)| *kind)
            .ok_or(StoreError::NotFound(*id))
    }

    fn content_of(&self, id: &ObjectId) -> Result<RawObject, StoreError> {
        let (kind, text) = self
            .objects
            .get(id)
            .ok_or(StoreError::NotFound(*id))?;
        Ok(RawObject::from_text(*id, *kind, text))
    }
}
