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

use crate::fs::{Dir, FilerIdScope};
use crate::FuseResult;
use filerfs_client::filer::{EntryRequest, FilerClientHandle, FilerClientPool, FilerConnector};
use filerfs_client::meta_cache::{LocalMetaCache, MetaCache};
use filerfs_common::conf::{ClusterConf, FuseConf};
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use filerfs_common::utils::UidGidMapper;
use filerfs_common::error::FsError;
use filerfs_common::{err_ext, FsResult};
use log::{debug, info};
use std::future::Future;
use std::sync::Arc;

// Per mount state shared by every node.
// 1. The filer client pool, the only way to reach the filer.
// 2. The local metadata cache, written only after the filer acknowledged a mutation.
// 3. The uid/gid mapper and the signature stamped on every mutation.
pub struct FilerFs {
    conf: FuseConf,
    root: Path,
    pool: Arc<FilerClientPool>,
    meta_cache: Arc<dyn MetaCache>,
    mapper: UidGidMapper,
    signature: i32,
}

impl FilerFs {
    pub fn new(
        conf: &ClusterConf,
        connector: Arc<dyn FilerConnector>,
        meta_cache: Arc<dyn MetaCache>,
    ) -> FsResult<Self> {
        let fuse_conf = conf.fuse.clone();
        let root = fuse_conf.root_path()?;
        let mapper = fuse_conf.id_mapper()?;
        let signature = fuse_conf.signature.unwrap_or_else(rand::random);
        let pool = Arc::new(FilerClientPool::new(connector, &conf.client));

        conf.print();
        info!(
            "filer fs root {}, read_only {}, signature {}",
            root, fuse_conf.read_only, signature
        );

        Ok(Self {
            conf: fuse_conf,
            root,
            pool,
            meta_cache,
            mapper,
            signature,
        })
    }

    pub fn with_conf(conf: &ClusterConf, connector: Arc<dyn FilerConnector>) -> FsResult<Self> {
        let meta_cache = Arc::new(LocalMetaCache::with_conf(&conf.client));
        Self::new(conf, connector, meta_cache)
    }

    pub fn conf(&self) -> &FuseConf {
        &self.conf
    }

    pub fn signature(&self) -> i32 {
        self.signature
    }

    pub fn meta_cache(&self) -> &dyn MetaCache {
        self.meta_cache.as_ref()
    }

    pub fn pool(&self) -> &Arc<FilerClientPool> {
        &self.pool
    }

    pub fn root_dir(self: &Arc<Self>) -> Arc<Dir> {
        Arc::new(Dir::new(self.clone(), self.root.clone()))
    }

    pub fn check_writable(&self) -> FuseResult<()> {
        if self.conf.read_only {
            err_ext!(FsError::permission_denied("filesystem is mounted read only"))
        } else {
            Ok(())
        }
    }

    /// Runs `f` with a pooled filer client, see FilerClientPool::with_client.
    pub async fn with_filer_client<F, Fut, R>(&self, f: F) -> FsResult<R>
    where
        F: FnOnce(FilerClientHandle) -> Fut,
        Fut: Future<Output = FsResult<R>>,
    {
        self.pool.with_client(f).await
    }

    // Owner and group of the request entry are in filer id space until the scope is dropped.
    pub fn map_to_filer<'a, R: EntryRequest>(&'a self, req: &'a mut R) -> FilerIdScope<'a, R> {
        FilerIdScope::new(&self.mapper, req)
    }

    /// Entry at `path` with owner and group in local id space.
    /// Served from the metadata cache; a miss reads the filer and fills the cache.
    pub async fn lookup_entry(&self, path: &Path) -> FsResult<Entry> {
        if let Some(entry) = self.meta_cache.find_entry(path) {
            return Ok(entry);
        }

        let (directory, name) = match path.parent() {
            Some(v) => (v, path.name().to_string()),
            // The filer root has no stored entry of its own.
            None => return Ok(Entry::default_dir("")),
        };

        debug!("meta cache miss {}, read from filer", path);
        let mut entry = self
            .with_filer_client(|mut client| async move {
                client.lookup_entry(&directory, &name).await
            })
            .await?;

        self.mapper.map_to_local(&mut entry);
        self.meta_cache.insert_entry(path, entry.clone());
        Ok(entry)
    }
}
