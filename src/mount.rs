//! Where rendered output goes once a source is ready.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::render::Output;
use crate::sampler::GridDimensions;

/// Host-side attachment point for rendered output
pub trait MountPoint: Send {
    /// Drop whatever was attached before and attach `output`
    fn replace(&mut self, output: Output);
}

/// Notification sent when a source finishes loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyEvent {
    pub source: String,
    /// Natural size of the decoded image
    pub natural_size: (u32, u32),
    pub grid: GridDimensions,
}

pub type ReadyCallback = Box<dyn FnMut(&ReadyEvent) + Send>;

/// What a pixel-art instance reports to
#[derive(Default)]
pub enum Target {
    /// Rendering only happens on request
    #[default]
    Detached,
    /// Called once per completed source
    Callback(ReadyCallback),
    /// Re-rendered into on every ready or option change
    Mount(Box<dyn MountPoint>),
}

impl Target {
    pub fn callback(f: impl FnMut(&ReadyEvent) + Send + 'static) -> Self {
        Target::Callback(Box::new(f))
    }

    pub fn mount(mount: impl MountPoint + 'static) -> Self {
        Target::Mount(Box::new(mount))
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Detached => f.write_str("Detached"),
            Target::Callback(_) => f.write_str("Callback(..)"),
            Target::Mount(_) => f.write_str("Mount(..)"),
        }
    }
}

#[derive(Debug, Default)]
struct MountState {
    current: Option<Output>,
    replacements: usize,
}

/// In-memory mount point; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryMount {
    state: Arc<Mutex<MountState>>,
}

impl MemoryMount {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MountState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inspect the attached output
    pub fn with_current<R>(&self, f: impl FnOnce(Option<&Output>) -> R) -> R {
        f(self.lock().current.as_ref())
    }

    /// Detach and return the attached output
    pub fn take(&self) -> Option<Output> {
        self.lock().current.take()
    }

    /// How many times output has been attached
    pub fn replacements(&self) -> usize {
        self.lock().replacements
    }
}

impl MountPoint for MemoryMount {
    fn replace(&mut self, output: Output) {
        let mut state = self.lock();
        state.current = Some(output);
        state.replacements += 1;
    }
}
