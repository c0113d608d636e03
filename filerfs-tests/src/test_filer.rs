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

use async_trait::async_trait;
use filerfs_client::filer::{
    CreateEntryRequest, FilerClient, FilerConnector, MemFiler, UpdateEntryRequest,
};
use filerfs_common::error::FsError;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use filerfs_common::FsResult;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

// Held by the filer double while a gated call is in flight.
struct GateInner {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Test side of a gated call: wait until the filer applied the call,
/// inspect state, then let the response go back to the caller.
pub struct CallGate {
    entered: oneshot::Receiver<()>,
    release: oneshot::Sender<()>,
}

impl CallGate {
    fn new() -> (Self, GateInner) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let gate = Self {
            entered: entered_rx,
            release: release_tx,
        };
        let inner = GateInner {
            entered: entered_tx,
            release: release_rx,
        };
        (gate, inner)
    }

    pub async fn entered(&mut self) {
        (&mut self.entered).await.unwrap();
    }

    pub fn release(self) {
        let _ = self.release.send(());
    }
}

#[derive(Default)]
struct TestState {
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
    connects: AtomicUsize,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    create_gate: Mutex<Option<GateInner>>,
    update_gate: Mutex<Option<GateInner>>,
}

/// A scripted filer: a MemFiler that counts calls, injects failures and can
/// hold a response back until the test releases it.
#[derive(Clone, Default)]
pub struct TestFiler {
    inner: MemFiler,
    state: Arc<TestState>,
}

impl TestFiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemFiler {
        &self.inner
    }

    pub fn get(&self, path: &Path) -> Option<Entry> {
        self.inner.get(path)
    }

    pub fn create_calls(&self) -> usize {
        self.state.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.state.update_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.state.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.create_calls() + self.update_calls()
    }

    pub fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_update(&self, fail: bool) {
        self.state.fail_update.store(fail, Ordering::SeqCst);
    }

    // The next create is applied, then its response is held until the gate is released.
    pub fn gate_create(&self) -> CallGate {
        let (gate, inner) = CallGate::new();
        *self.state.create_gate.lock().unwrap() = Some(inner);
        gate
    }

    pub fn gate_update(&self) -> CallGate {
        let (gate, inner) = CallGate::new();
        *self.state.update_gate.lock().unwrap() = Some(inner);
        gate
    }

    async fn hold(gate: Option<GateInner>) {
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.await;
        }
    }
}

#[async_trait]
impl FilerClient for TestFiler {
    async fn create_entry(&self, req: &CreateEntryRequest) -> FsResult<()> {
        self.state.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_create.load(Ordering::SeqCst) {
            return Err(FsError::unavailable("injected create failure"));
        }

        let res = self.inner.create_entry(req).await;
        let gate = self.state.create_gate.lock().unwrap().take();
        Self::hold(gate).await;
        res
    }

    async fn update_entry(&self, req: &UpdateEntryRequest) -> FsResult<()> {
        self.state.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_update.load(Ordering::SeqCst) {
            return Err(FsError::unavailable("injected update failure"));
        }

        let res = self.inner.update_entry(req).await;
        let gate = self.state.update_gate.lock().unwrap().take();
        Self::hold(gate).await;
        res
    }

    async fn lookup_entry(&self, directory: &Path, name: &str) -> FsResult<Entry> {
        self.state.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_entry(directory, name).await
    }
}

#[async_trait]
impl FilerConnector for TestFiler {
    async fn connect(&self) -> FsResult<Box<dyn FilerClient>> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.clone()))
    }
}
