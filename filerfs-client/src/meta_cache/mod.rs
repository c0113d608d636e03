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

use filerfs_common::fs::Path;
use filerfs_common::state::Entry;

mod local_meta_cache;
pub use self::local_meta_cache::LocalMetaCache;

/// Local mirror of filer entries keyed by full path.
///
/// Writes are issued only after the filer acknowledged the matching mutation,
/// so the cache never runs ahead of the filer for writes made by this process.
/// Implementations synchronize internally and never block on the network.
pub trait MetaCache: Send + Sync {
    fn insert_entry(&self, path: &Path, entry: Entry);

    fn update_entry(&self, path: &Path, entry: Entry);

    fn find_entry(&self, path: &Path) -> Option<Entry>;

    fn invalidate(&self, path: &Path);
}
