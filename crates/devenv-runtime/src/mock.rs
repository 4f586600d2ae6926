use crate::backend::{AttachTarget, CloneSpec, RuntimeBackend, RuntimeSpec};
use crate::RuntimeError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    CreateVolume(String),
    RemoveVolume(String),
    Clone(CloneSpec),
    Start(RuntimeSpec),
    Stop(String),
    Attach(AttachTarget),
}

impl Invocation {
    pub fn op(&self) -> &'static str {
        match self {
            Invocation::CreateVolume(_) => "create_volume",
            Invocation::RemoveVolume(_) => "remove_volume",
            Invocation::Clone(_) => "clone_repo",
            Invocation::Start(_) => "start",
            Invocation::Stop(_) => "stop",
            Invocation::Attach(_) => "attach",
        }
    }
}

#[derive(Default)]
struct MockState {
    calls: Vec<Invocation>,
    failing: HashSet<&'static str>,
}

/// In-memory backend that records every call instead of running anything.
///
/// Clones share state, so a test can hand one clone to the engine and inspect
/// the calls through another.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call to `op` (see [`Invocation::op`]) fail after being recorded.
    #[must_use]
    pub fn failing(self, op: &'static str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(op);
        }
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.state
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    pub fn invocation_count(&self) -> usize {
        self.state.lock().map(|s| s.calls.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockState>, RuntimeError> {
        self.state.lock().map_err(|e| RuntimeError::ExecFailed {
            action: "mock backend",
            detail: format!("mutex poisoned: {e}"),
        })
    }

    fn record(&self, call: Invocation) -> Result<(), RuntimeError> {
        let mut state = self.lock()?;
        let op = call.op();
        state.calls.push(call);
        if state.failing.contains(op) {
            return Err(RuntimeError::ExecFailed {
                action: failure_action(op),
                detail: "mock failure".to_owned(),
            });
        }
        Ok(())
    }
}

fn failure_action(op: &str) -> &'static str {
    match op {
        "create_volume" => "failed to create volume",
        "remove_volume" => "failed to remove volume",
        "clone_repo" => "failed to clone repo",
        "start" => "failed to start env",
        "stop" => "failed to stop env",
        _ => "failed to open editor",
    }
}

impl RuntimeBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn create_volume(&self, volume: &str) -> Result<(), RuntimeError> {
        self.record(Invocation::CreateVolume(volume.to_owned()))
    }

    fn remove_volume(&self, volume: &str) -> Result<(), RuntimeError> {
        self.record(Invocation::RemoveVolume(volume.to_owned()))
    }

    fn clone_repo(&self, spec: &CloneSpec) -> Result<(), RuntimeError> {
        self.record(Invocation::Clone(spec.clone()))
    }

    fn start(&self, spec: &RuntimeSpec) -> Result<(), RuntimeError> {
        self.record(Invocation::Start(spec.clone()))
    }

    fn stop(&self, name: &str) -> Result<(), RuntimeError> {
        self.record(Invocation::Stop(name.to_owned()))
    }

    fn attach(&self, target: &AttachTarget) -> Result<(), RuntimeError> {
        self.record(Invocation::Attach(target.clone()))
    }
}
