//! # Engine Capability Interface
//!
//! Abstract interface for the precompiled capture engine. The harness never
//! touches wasmtime directly; it codes against these traits so the concrete
//! binding (WASI module, test double) is pluggable.

use anyhow::Result;
use async_trait::async_trait;

pub mod wasi;

/// Exit status reported by a foreign module's entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    pub fn success(&self) -> bool {
        self.0 == 0
    }

    pub fn code(&self) -> i32 {
        self.0
    }
}

/// Obtains a live instance of a foreign module.
///
/// `load` is the only suspension point in the harness: compilation and
/// linking must finish before any staging is attempted.
#[async_trait]
pub trait EngineLoader: Send + Sync {
    type Instance: EngineInstance;

    async fn load(&self) -> Result<Self::Instance>;
}

/// A loaded module with its private sandbox filesystem.
///
/// The instance is a scoped resource: acquired, staged into, run, dropped.
/// Nothing is persisted or reused across invocations.
pub trait EngineInstance {
    /// Create a directory inside the sandbox filesystem.
    /// Not idempotent: fails if the directory already exists.
    fn create_dir(&mut self, path: &str) -> Result<()>;

    /// Write `bytes` into the sandbox filesystem at `path`.
    fn mount_file(&mut self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Transfer control to the module's entry point with the given argv
    /// (argv[0] is the program name). Runs the engine to completion.
    fn run(&mut self, argv: &[String]) -> Result<ExitStatus>;
}
