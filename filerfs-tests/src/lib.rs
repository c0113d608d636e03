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

mod test_filer;
pub use self::test_filer::{CallGate, TestFiler};

mod counting_cache;
pub use self::counting_cache::CountingMetaCache;

use filerfs_common::common::Logger;
use filerfs_common::conf::ClusterConf;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use filerfs_fuse::fs::{Dir, FilerFs};
use std::sync::Arc;

pub const TEST_SIGNATURE: i32 = 20250101;

/// One mounted filesystem over a scripted filer, with an observable cache.
pub struct Testing {
    pub filer: TestFiler,
    pub cache: Arc<CountingMetaCache>,
    pub fs: Arc<FilerFs>,
}

impl Testing {
    pub fn conf() -> ClusterConf {
        let mut conf = ClusterConf::default();
        conf.fuse.signature = Some(TEST_SIGNATURE);
        conf.init().unwrap();
        conf
    }

    pub fn with_conf(conf: ClusterConf) -> Self {
        Logger::default();

        let filer = TestFiler::new();
        let cache = Arc::new(CountingMetaCache::with_conf(&conf.client));
        let fs = FilerFs::new(&conf, Arc::new(filer.clone()), cache.clone()).unwrap();

        Self {
            filer,
            cache,
            fs: Arc::new(fs),
        }
    }

    pub fn read_only() -> Self {
        let mut conf = Self::conf();
        conf.fuse.read_only = true;
        Self::with_conf(conf)
    }

    pub fn root(&self) -> Arc<Dir> {
        self.fs.root_dir()
    }

    pub async fn dir(&self, path: &str) -> Arc<Dir> {
        let path = Path::from_str(path).unwrap();
        let mut dir = self.root();
        for name in path.full_path().split('/').filter(|x| !x.is_empty()) {
            let node = dir.lookup(name).await.unwrap();
            dir = node.as_directory().unwrap().clone();
        }
        dir
    }

    // Stores an entry on the filer only, the cache learns about it on first lookup.
    pub fn put(&self, dir: &str, entry: Entry) -> Path {
        self.filer
            .inner()
            .put(&Path::from_str(dir).unwrap(), entry)
            .unwrap()
    }

    pub fn path(s: &str) -> Path {
        Path::from_str(s).unwrap()
    }
}

impl Default for Testing {
    fn default() -> Self {
        Self::with_conf(Self::conf())
    }
}
