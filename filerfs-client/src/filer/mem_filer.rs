// Copyright 2025 OPPO.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::filer::{CreateEntryRequest, FilerClient, FilerConnector, UpdateEntryRequest};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use filerfs_common::error::FsError;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use filerfs_common::{err_ext, FsResult};
use log::debug;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct StoredEntry {
    entry: Entry,
    signatures: Vec<i32>,
}

/// An authoritative entry store living in the current process.
/// Serves local mounts without a filer server and is the backing store of tests.
///
/// The names of a hardlink group share one record keyed by the hardlink id: a
/// write through any name replaces it, and every name reads it back.
///
/// Cloning is cheap, all clones share one namespace.
#[derive(Clone)]
pub struct MemFiler {
    entries: Arc<DashMap<String, StoredEntry>>,
    hard_links: Arc<DashMap<Vec<u8>, Entry>>,
}

impl MemFiler {
    pub fn new() -> Self {
        let filer = Self {
            entries: Arc::new(DashMap::new()),
            hard_links: Arc::new(DashMap::new()),
        };
        filer.entries.insert(
            Path::root().full_path().to_string(),
            StoredEntry {
                entry: Entry::default_dir(""),
                signatures: vec![],
            },
        );
        filer
    }

    // Stores an entry directly, creating missing parent directories.
    pub fn put(&self, directory: &Path, entry: Entry) -> FsResult<Path> {
        let mut dir = Path::root();
        for name in directory.full_path().split('/').filter(|x| !x.is_empty()) {
            dir = dir.join(name)?;
            self.entries
                .entry(dir.full_path().to_string())
                .or_insert_with(|| StoredEntry {
                    entry: Entry::default_dir(name),
                    signatures: vec![],
                });
        }

        let path = directory.join(&entry.name)?;
        self.save_hard_link(&entry);
        self.entries.insert(
            path.full_path().to_string(),
            StoredEntry {
                entry,
                signatures: vec![],
            },
        );
        Ok(path)
    }

    pub fn get(&self, path: &Path) -> Option<Entry> {
        self.entries
            .get(path.full_path())
            .map(|x| self.read_hard_link(&x.entry))
    }

    fn save_hard_link(&self, entry: &Entry) {
        if entry.is_hard_link() {
            self.hard_links
                .insert(entry.hard_link_id.clone(), entry.clone());
        }
    }

    fn read_hard_link(&self, entry: &Entry) -> Entry {
        if !entry.is_hard_link() {
            return entry.clone();
        }
        match self.hard_links.get(&entry.hard_link_id) {
            Some(group) => Entry::hard_link_member(&entry.name, &group),
            None => entry.clone(),
        }
    }

    // Signatures carried by the last mutation of `path`.
    pub fn signatures(&self, path: &Path) -> Option<Vec<i32>> {
        self.entries
            .get(path.full_path())
            .map(|x| x.signatures.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_parent(&self, directory: &Path) -> FsResult<()> {
        match self.entries.get(directory.full_path()) {
            Some(v) if v.entry.is_directory => Ok(()),
            Some(_) => err_ext!(FsError::invalid_path(directory, "parent is not a directory")),
            None => err_ext!(FsError::file_not_found(directory)),
        }
    }
}

impl Default for MemFiler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FilerClient for MemFiler {
    async fn create_entry(&self, req: &CreateEntryRequest) -> FsResult<()> {
        self.check_parent(&req.directory)?;
        let path = req.full_path()?;

        match self.entries.entry(path.full_path().to_string()) {
            MapEntry::Occupied(_) => Err(FsError::file_exists(&path)),
            MapEntry::Vacant(v) => {
                debug!("create entry {}", path);
                self.save_hard_link(&req.entry);
                v.insert(StoredEntry {
                    entry: req.entry.clone(),
                    signatures: req.signatures.clone(),
                });
                Ok(())
            }
        }
    }

    async fn update_entry(&self, req: &UpdateEntryRequest) -> FsResult<()> {
        let path = req.full_path()?;

        match self.entries.get_mut(path.full_path()) {
            None => Err(FsError::file_not_found(&path)),
            Some(mut v) => {
                debug!("update entry {}", path);
                self.save_hard_link(&req.entry);
                v.entry = req.entry.clone();
                v.signatures = req.signatures.clone();
                Ok(())
            }
        }
    }

    async fn lookup_entry(&self, directory: &Path, name: &str) -> FsResult<Entry> {
        let path = directory.join(name)?;
        self.get(&path).ok_or_else(|| FsError::file_not_found(&path))
    }
}

#[async_trait]
impl FilerConnector for MemFiler {
    async fn connect(&self) -> FsResult<Box<dyn FilerClient>> {
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_update_lookup() {
        let filer = MemFiler::new();
        let dir = Path::from_str("/d").unwrap();

        let req = CreateEntryRequest::new(dir.clone(), Entry::default_file("a.txt"), 7);
        let err = filer.create_entry(&req).await.unwrap_err();
        assert!(err.is_not_found());

        filer.put(&Path::root(), Entry::default_dir("d")).unwrap();
        filer.create_entry(&req).await.unwrap();
        let err = filer.create_entry(&req).await.unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists(_)));

        let path = dir.join("a.txt").unwrap();
        assert_eq!(filer.signatures(&path), Some(vec![7]));

        let mut entry = filer.lookup_entry(&dir, "a.txt").await.unwrap();
        entry.attributes.uid = 1000;
        let req = UpdateEntryRequest::new(dir.clone(), entry, 8);
        filer.update_entry(&req).await.unwrap();
        assert_eq!(filer.get(&path).unwrap().attributes.uid, 1000);
        assert_eq!(filer.signatures(&path), Some(vec![8]));

        let req = UpdateEntryRequest::new(dir.clone(), Entry::default_file("b.txt"), 8);
        assert!(filer.update_entry(&req).await.unwrap_err().is_not_found());
        assert!(filer.lookup_entry(&dir, "b.txt").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn hard_link_names_share_group() {
        let filer = MemFiler::new();
        let dir = Path::from_str("/d").unwrap();

        let mut a = Entry::default_file("a.txt");
        a.hard_link_id = vec![1; 17];
        a.hard_link_counter = 2;
        filer.put(&dir, a.clone()).unwrap();
        filer.put(&dir, Entry::hard_link_member("b.txt", &a)).unwrap();

        // Written through b, seen through a.
        let mut b = filer.lookup_entry(&dir, "b.txt").await.unwrap();
        b.hard_link_counter = 3;
        b.attributes.file_size = 42;
        filer
            .update_entry(&UpdateEntryRequest::new(dir.clone(), b, 1))
            .await
            .unwrap();

        let a = filer.lookup_entry(&dir, "a.txt").await.unwrap();
        assert_eq!(a.name, "a.txt");
        assert_eq!(a.hard_link_counter, 3);
        assert_eq!(a.attributes.file_size, 42);
    }

    #[test]
    fn put_creates_parents() {
        let filer = MemFiler::new();
        let path = filer
            .put(&Path::from_str("/a/b").unwrap(), Entry::default_file("c"))
            .unwrap();
        assert_eq!(path.full_path(), "/a/b/c");
        assert!(filer.get(&Path::from_str("/a").unwrap()).unwrap().is_directory);
        assert!(filer.get(&Path::from_str("/a/b").unwrap()).unwrap().is_directory);
        assert_eq!(filer.len(), 4);
    }
}
