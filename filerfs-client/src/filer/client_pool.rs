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
use crossbeam::queue::ArrayQueue;
use filerfs_common::conf::ClientConf;
use filerfs_common::error::FsError;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use filerfs_common::{err_box, FsResult};
use log::{debug, warn};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Pool of filer connections.
// 1. Idle connections are reused, up to `conn_pool_size` are kept.
// 2. A connection that saw a transport error is closed instead of being reused.
// 3. Every call is bounded by the rpc timeout.
pub struct FilerClientPool {
    connector: Arc<dyn FilerConnector>,
    idle: ArrayQueue<Box<dyn FilerClient>>,
    active: AtomicUsize,
    rpc_timeout: Duration,
}

impl FilerClientPool {
    pub fn new(connector: Arc<dyn FilerConnector>, conf: &ClientConf) -> Self {
        Self {
            connector,
            idle: ArrayQueue::new(conf.conn_pool_size.max(1)),
            active: AtomicUsize::new(0),
            rpc_timeout: conf.rpc_timeout,
        }
    }

    pub async fn acquire(self: &Arc<Self>) -> FsResult<FilerClientHandle> {
        let client = match self.idle.pop() {
            Some(v) => v,
            None => self.connector.connect().await?,
        };

        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(FilerClientHandle {
            client: Some(client),
            pool: self.clone(),
            broken: false,
        })
    }

    /// Runs `f` with a client handle. The handle is returned to the pool when the
    /// future returned by `f` completes, fails, panics or is dropped.
    pub async fn with_client<F, Fut, R>(self: &Arc<Self>, f: F) -> FsResult<R>
    where
        F: FnOnce(FilerClientHandle) -> Fut,
        Fut: Future<Output = FsResult<R>>,
    {
        let client = self.acquire().await?;
        f(client).await
    }

    // Handles currently held by callers.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    fn release(&self, client: Box<dyn FilerClient>, reuse: bool) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        if !reuse {
            debug!("close filer client");
            return;
        }
        if self.idle.push(client).is_err() {
            debug!("filer client pool is full, close client");
        }
    }
}

pub struct FilerClientHandle {
    client: Option<Box<dyn FilerClient>>,
    pool: Arc<FilerClientPool>,
    broken: bool,
}

impl FilerClientHandle {
    fn client(&self) -> FsResult<&dyn FilerClient> {
        match &self.client {
            Some(v) => Ok(v.as_ref()),
            None => err_box!("filer client has been released"),
        }
    }

    async fn timeout_call<T>(
        rpc_timeout: Duration,
        fut: impl Future<Output = FsResult<T>>,
    ) -> FsResult<T> {
        match tokio::time::timeout(rpc_timeout, fut).await {
            Ok(v) => v,
            Err(_) => Err(FsError::Timeout(format!("no response after {:?}", rpc_timeout))),
        }
    }

    fn check_result<T>(&mut self, res: FsResult<T>) -> FsResult<T> {
        if let Err(e) = &res {
            if e.is_retryable() {
                warn!("filer call failed, connection will not be reused: {}", e);
                self.broken = true;
            }
        }
        res
    }

    pub async fn create_entry(&mut self, req: &CreateEntryRequest) -> FsResult<()> {
        let res = {
            let client = self.client()?;
            Self::timeout_call(self.pool.rpc_timeout, client.create_entry(req)).await
        };
        self.check_result(res)
    }

    pub async fn update_entry(&mut self, req: &UpdateEntryRequest) -> FsResult<()> {
        let res = {
            let client = self.client()?;
            Self::timeout_call(self.pool.rpc_timeout, client.update_entry(req)).await
        };
        self.check_result(res)
    }

    pub async fn lookup_entry(&mut self, directory: &Path, name: &str) -> FsResult<Entry> {
        let res = {
            let client = self.client()?;
            Self::timeout_call(self.pool.rpc_timeout, client.lookup_entry(directory, name)).await
        };
        self.check_result(res)
    }
}

impl Drop for FilerClientHandle {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            // A call interrupted by a panic may have left the connection mid-request.
            let reuse = !self.broken && !std::thread::panicking();
            self.pool.release(client, reuse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filer::MemFiler;

    fn new_pool(filer: &MemFiler) -> Arc<FilerClientPool> {
        let mut conf = ClientConf::default();
        conf.init().unwrap();
        Arc::new(FilerClientPool::new(Arc::new(filer.clone()), &conf))
    }

    #[tokio::test]
    async fn reuse_released_client() {
        let filer = MemFiler::new();
        let pool = new_pool(&filer);

        let dir = Path::root();
        pool.with_client(|mut client| async move {
            let req = CreateEntryRequest::new(dir, Entry::default_file("a.txt"), 1);
            client.create_entry(&req).await
        })
        .await
        .unwrap();

        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.idle_count(), 1);

        let handle = pool.acquire().await.unwrap();
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.idle_count(), 0);
        drop(handle);
        assert_eq!(pool.idle_count(), 1);
    }

    #[tokio::test]
    async fn release_on_error() {
        let filer = MemFiler::new();
        let pool = new_pool(&filer);

        let res = pool
            .with_client(|mut client| async move {
                let req = UpdateEntryRequest::new(Path::root(), Entry::default_file("x"), 1);
                client.update_entry(&req).await
            })
            .await;

        assert!(matches!(res, Err(FsError::NotFound(_))));
        assert_eq!(pool.active_count(), 0);
        // NotFound is an answer from the filer, the connection is still good.
        assert_eq!(pool.idle_count(), 1);
    }

    #[tokio::test]
    #[allow(unreachable_code)]
    async fn release_on_panic_and_cancel() {
        let filer = MemFiler::new();
        let pool = new_pool(&filer);

        let task_pool = pool.clone();
        let res = tokio::spawn(async move {
            task_pool
                .with_client(|client| async move {
                    let _held = client;
                    panic!("callback panicked");
                    Ok::<(), FsError>(())
                })
                .await
        })
        .await;
        assert!(res.is_err());
        assert_eq!(pool.active_count(), 0);

        let fut = pool.with_client(|client| async move {
            let _held = client;
            std::future::pending::<()>().await;
            Ok(())
        });
        let res = tokio::time::timeout(Duration::from_millis(10), fut).await;
        assert!(res.is_err());
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.idle_count(), 1);
    }
}
