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

use filerfs_client::meta_cache::{LocalMetaCache, MetaCache};
use filerfs_common::conf::ClientConf;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use std::sync::atomic::{AtomicUsize, Ordering};

// LocalMetaCache that counts the writes it receives.
pub struct CountingMetaCache {
    inner: LocalMetaCache,
    inserts: AtomicUsize,
    updates: AtomicUsize,
}

impl CountingMetaCache {
    pub fn with_conf(conf: &ClientConf) -> Self {
        Self {
            inner: LocalMetaCache::with_conf(conf),
            inserts: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.inserts() + self.updates()
    }

    pub fn get(&self, path: &Path) -> Option<Entry> {
        self.inner.find_entry(path)
    }
}

impl MetaCache for CountingMetaCache {
    fn insert_entry(&self, path: &Path, entry: Entry) {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_entry(path, entry)
    }

    fn update_entry(&self, path: &Path, entry: Entry) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_entry(path, entry)
    }

    fn find_entry(&self, path: &Path) -> Option<Entry> {
        self.inner.find_entry(path)
    }

    fn invalidate(&self, path: &Path) {
        self.inner.invalidate(path)
    }
}
