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

//! Test fixtures: building loose-object databases in temporary directories.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

pub const TREE_MODE_FILE: &str = "100644";

/// A temporary repository root with an empty `.git/objects` database.
pub fn fixture_repo() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
    dir
}

/// Write one loose object with a well-formed `<tag> <size>\0` header.
pub fn write_loose(repo_root: &Path, hex_id: &str, tag: &str, body: &[u8]) {
    let mut payload = Vec::new();
    payload.extend_from_slice(tag.as_bytes());
    payload.push(b' ');
    payload.extend_from_slice(body.len().to_string().as_bytes());
    payload.push(0);
    payload.extend_from_slice(body);
    write_loose_bytes(repo_root, hex_id, &payload);
}

/// Write one loose object from a raw payload (header included), compressed.
pub fn write_loose_bytes(repo_root: &Path, hex_id: &str, payload: &[u8]) {
    let dir = repo_root.join(".git/objects").join(&hex_id[..2]);
    std::fs::create_dir_all(&dir).unwrap();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).unwrap();
    let compressed = encoder.finish().unwrap();
    std::fs::write(dir.join(&hex_id[2..]), compressed).unwrap();
}
