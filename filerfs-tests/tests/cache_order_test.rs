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

use filerfs_common::state::Entry;
use filerfs_tests::Testing;

#[tokio::test]
async fn symlink_cache_waits_for_filer() {
    let testing = Testing::default();
    let path = Testing::path("/link1");

    let mut gate = testing.filer.gate_create();
    let root = testing.root();
    let task = tokio::spawn(async move { root.symlink("link1", "/target/path", 0, 0).await });

    gate.entered().await;
    assert!(testing.filer.get(&path).is_some());
    assert!(testing.cache.get(&path).is_none());
    assert_eq!(testing.cache.writes(), 0);

    gate.release();
    task.await.unwrap().unwrap();
    assert!(testing.cache.get(&path).is_some());
}

#[tokio::test]
async fn link_cache_waits_for_filer() {
    let testing = Testing::default();
    testing.put("/d", Entry::default_file("a.txt"));
    let dir = testing.dir("/d").await;
    let old = dir.lookup("a.txt").await.unwrap();
    let a_path = Testing::path("/d/a.txt");
    let b_path = Testing::path("/d/b.txt");

    let mut update_gate = testing.filer.gate_update();
    let mut create_gate = testing.filer.gate_create();
    let task_dir = dir.clone();
    let task = tokio::spawn(async move { task_dir.link(&old, "b.txt").await });

    update_gate.entered().await;
    assert_eq!(testing.filer.get(&a_path).unwrap().hard_link_counter, 2);
    assert_eq!(testing.cache.get(&a_path).unwrap().hard_link_counter, 0);
    update_gate.release();

    create_gate.entered().await;
    assert_eq!(testing.cache.get(&a_path).unwrap().hard_link_counter, 2);
    assert!(testing.filer.get(&b_path).is_some());
    assert!(testing.cache.get(&b_path).is_none());
    create_gate.release();

    let file = task.await.unwrap().unwrap();
    assert_eq!(testing.cache.get(&b_path), file.get_entry());
    assert_eq!(testing.fs.pool().active_count(), 0);
}

#[tokio::test]
async fn cancelled_link_releases_client() {
    let testing = Testing::default();
    testing.put("/d", Entry::default_file("a.txt"));
    let dir = testing.dir("/d").await;
    let old = dir.lookup("a.txt").await.unwrap();

    let mut gate = testing.filer.gate_update();
    let task_dir = dir.clone();
    let task = tokio::spawn(async move { task_dir.link(&old, "b.txt").await });

    gate.entered().await;
    assert_eq!(testing.fs.pool().active_count(), 1);
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert_eq!(testing.fs.pool().active_count(), 0);
    assert!(testing.cache.get(&Testing::path("/d/b.txt")).is_none());
    assert_eq!(testing.filer.create_calls(), 0);
}
