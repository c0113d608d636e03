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

use filerfs_common::error::FsError;
use filerfs_common::state::Entry;
use filerfs_tests::Testing;

#[tokio::test]
async fn read_only_rejects_mutations() {
    let testing = Testing::read_only();
    testing.put("/d", Entry::default_file("a.txt"));
    let dir = testing.dir("/d").await;
    let old = dir.lookup("a.txt").await.unwrap();

    // Lookups above filled the cache, count only what the mutations do.
    let writes = testing.cache.writes();
    let lookups = testing.filer.lookup_calls();

    let err = dir.link(&old, "b.txt").await.unwrap_err();
    assert_eq!(err.errno(), libc::EPERM);
    assert!(matches!(err.error(), FsError::PermissionDenied(_)));

    let err = dir.symlink("l", "/t", 0, 0).await.unwrap_err();
    assert_eq!(err.errno(), libc::EPERM);

    assert_eq!(testing.filer.mutation_calls(), 0);
    assert_eq!(testing.filer.lookup_calls(), lookups);
    assert_eq!(testing.cache.writes(), writes);

    // Reads still work.
    let attr = old.attr().await.unwrap();
    assert_eq!(attr.nlink, 1);
}
