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

use crate::meta_cache::MetaCache;
use filerfs_common::conf::ClientConf;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use fxhash::FxHasher;
use log::debug;
use moka::policy::EvictionPolicy;
use moka::sync::{Cache, CacheBuilder};
use std::hash::BuildHasherDefault;
use std::time::Duration;

type FxCache<K> = Cache<K, Entry, BuildHasherDefault<FxHasher>>;

/// In-memory metadata cache bounded by capacity and time to live.
/// An evicted entry is simply a miss: the caller re-reads it from the filer.
///
/// Hardlink group state is kept once per hardlink id, so a link made through
/// one name is seen by every cached name of the group. A name whose group
/// record was evicted is a miss as well.
pub struct LocalMetaCache {
    entries: FxCache<String>,
    hard_links: FxCache<Vec<u8>>,
}

impl LocalMetaCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            entries: Self::build(capacity, ttl),
            hard_links: Self::build(capacity, ttl),
        }
    }

    fn build<K>(capacity: u64, ttl: Duration) -> FxCache<K>
    where
        K: std::hash::Hash + Eq + Send + Sync + 'static,
    {
        CacheBuilder::default()
            .max_capacity(capacity.max(1))
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build_with_hasher(BuildHasherDefault::<FxHasher>::default())
    }

    fn save_hard_link(&self, entry: &Entry) {
        if entry.is_hard_link() {
            self.hard_links
                .insert(entry.hard_link_id.clone(), entry.clone());
        }
    }

    pub fn with_conf(conf: &ClientConf) -> Self {
        Self::new(conf.meta_cache_capacity, conf.meta_cache_ttl)
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl MetaCache for LocalMetaCache {
    fn insert_entry(&self, path: &Path, entry: Entry) {
        debug!("meta cache insert {}", path);
        self.save_hard_link(&entry);
        self.entries.insert(path.full_path().to_string(), entry);
    }

    fn update_entry(&self, path: &Path, entry: Entry) {
        debug!("meta cache update {}", path);
        self.save_hard_link(&entry);
        self.entries.insert(path.full_path().to_string(), entry);
    }

    fn find_entry(&self, path: &Path) -> Option<Entry> {
        let entry = self.entries.get(path.full_path())?;
        if !entry.is_hard_link() {
            return Some(entry);
        }
        self.hard_links
            .get(&entry.hard_link_id)
            .map(|group| Entry::hard_link_member(&entry.name, &group))
    }

    fn invalidate(&self, path: &Path) {
        self.entries.invalidate(path.full_path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_update_find() {
        let cache = LocalMetaCache::new(16, Duration::from_secs(60));
        let path = Path::from_str("/d/a.txt").unwrap();
        assert!(cache.find_entry(&path).is_none());

        let mut entry = Entry::default_file("a.txt");
        cache.insert_entry(&path, entry.clone());
        assert_eq!(cache.find_entry(&path), Some(entry.clone()));

        entry.hard_link_counter = 2;
        cache.update_entry(&path, entry.clone());
        assert_eq!(cache.find_entry(&path).unwrap().hard_link_counter, 2);
        assert_eq!(cache.entry_count(), 1);

        cache.invalidate(&path);
        assert!(cache.find_entry(&path).is_none());
    }

    #[test]
    fn hard_link_names_share_group() {
        let cache = LocalMetaCache::new(16, Duration::from_secs(60));
        let a_path = Path::from_str("/d/a.txt").unwrap();
        let b_path = Path::from_str("/d/b.txt").unwrap();

        let mut a = Entry::default_file("a.txt");
        a.hard_link_id = vec![1; 17];
        a.hard_link_counter = 2;
        cache.insert_entry(&a_path, a.clone());
        cache.insert_entry(&b_path, Entry::hard_link_member("b.txt", &a));

        let mut b = cache.find_entry(&b_path).unwrap();
        b.hard_link_counter = 3;
        cache.update_entry(&b_path, b);

        let a = cache.find_entry(&a_path).unwrap();
        assert_eq!(a.name, "a.txt");
        assert_eq!(a.hard_link_counter, 3);

        cache.hard_links.invalidate(&a.hard_link_id);
        assert!(cache.find_entry(&a_path).is_none());
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = LocalMetaCache::new(16, Duration::from_millis(20));
        let path = Path::from_str("/a.txt").unwrap();
        cache.insert_entry(&path, Entry::default_file("a.txt"));
        std::thread::sleep(Duration::from_millis(50));
        assert!(cache.find_entry(&path).is_none());
    }
}
