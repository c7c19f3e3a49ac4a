//! WASI binding for the capture engine.
//!
//! Embeds wasmtime to execute the precompiled sysdig/csysdig modules. The
//! sandbox filesystem is a per-instance staging directory on the host,
//! preopened as the guest's working directory, so everything the harness
//! mounts is visible to the module and nothing else is.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wasmtime::{Engine, Linker, Module, Store};
use wasmtime_wasi::preview1::{self, WasiP1Ctx};
use wasmtime_wasi::{DirPerms, FilePerms, I32Exit, WasiCtxBuilder};

use super::{EngineInstance, EngineLoader, ExitStatus};

/// Loader for a precompiled WASI module on the host filesystem.
pub struct WasiModuleLoader {
    module_path: PathBuf,
}

impl WasiModuleLoader {
    pub fn new(module_path: impl Into<PathBuf>) -> Self {
        Self {
            module_path: module_path.into(),
        }
    }
}

#[async_trait]
impl EngineLoader for WasiModuleLoader {
    type Instance = WasiModuleInstance;

    async fn load(&self) -> Result<WasiModuleInstance> {
        let path = self.module_path.clone();
        // Compilation is CPU-bound; keep it off the async runtime.
        let (engine, module) = tokio::task::spawn_blocking(move || -> Result<(Engine, Module)> {
            let engine = Engine::default();
            let module = Module::from_file(&engine, &path)
                .with_context(|| format!("Failed to load module {}", path.display()))?;
            Ok((engine, module))
        })
        .await
        .context("Module compilation task panicked")??;

        let staging_root = TempDir::new().context("Failed to create sandbox staging root")?;
        tracing::debug!(
            module = %self.module_path.display(),
            sandbox = %staging_root.path().display(),
            "module loaded"
        );

        Ok(WasiModuleInstance {
            engine,
            module,
            staging_root,
        })
    }
}

/// A compiled module plus the staging directory backing its sandbox
/// filesystem. The staging directory lives as long as the instance and is
/// reclaimed when it drops.
pub struct WasiModuleInstance {
    engine: Engine,
    module: Module,
    staging_root: TempDir,
}

impl WasiModuleInstance {
    /// Maps a guest path to its backing host path. Guest paths are rooted at
    /// the staging directory, so absolute and relative forms land in the
    /// same tree.
    fn host_path(&self, guest: &str) -> PathBuf {
        self.staging_root.path().join(guest.trim_start_matches('/'))
    }

    #[cfg(test)]
    fn staging_path(&self) -> &std::path::Path {
        self.staging_root.path()
    }
}

impl EngineInstance for WasiModuleInstance {
    fn create_dir(&mut self, path: &str) -> Result<()> {
        fs::create_dir(self.host_path(path))
            .with_context(|| format!("Failed to create sandbox directory {path}"))
    }

    fn mount_file(&mut self, path: &str, bytes: &[u8]) -> Result<()> {
        fs::write(self.host_path(path), bytes)
            .with_context(|| format!("Failed to write sandbox file {path}"))
    }

    fn run(&mut self, argv: &[String]) -> Result<ExitStatus> {
        let mut linker: Linker<WasiP1Ctx> = Linker::new(&self.engine);
        preview1::add_to_linker_sync(&mut linker, |ctx| ctx)
            .context("Failed to link WASI imports")?;

        let wasi = WasiCtxBuilder::new()
            .inherit_stdio()
            .args(argv)
            .preopened_dir(
                self.staging_root.path(),
                ".",
                DirPerms::all(),
                FilePerms::all(),
            )
            .context("Failed to preopen sandbox directory")?
            .build_p1();

        let mut store = Store::new(&self.engine, wasi);
        linker
            .module(&mut store, "", &self.module)
            .context("Failed to instantiate module")?;

        let entry = linker
            .get_default(&mut store, "")
            .context("Module has no entry point")?
            .typed::<(), ()>(&store)
            .context("Entry point has unexpected signature")?;

        match entry.call(&mut store, ()) {
            Ok(()) => Ok(ExitStatus(0)),
            // proc_exit surfaces as a trap; translate it back to a status.
            Err(err) => match err.downcast_ref::<I32Exit>() {
                Some(exit) => Ok(ExitStatus(exit.0)),
                None => Err(err.context("Module trapped")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_MODULE: &str = r#"(module (func (export "_start")))"#;

    const EXITING_MODULE: &str = r#"
        (module
            (import "wasi_snapshot_preview1" "proc_exit" (func $exit (param i32)))
            (memory (export "memory") 1)
            (func (export "_start")
                (call $exit (i32.const 42))))
    "#;

    fn instance_from_wat(wat: &str) -> WasiModuleInstance {
        let engine = Engine::default();
        let module = Module::new(&engine, wat).unwrap();
        WasiModuleInstance {
            engine,
            module,
            staging_root: TempDir::new().unwrap(),
        }
    }

    #[test]
    fn test_mount_file_lands_in_staging_root() {
        let mut instance = instance_from_wat(EMPTY_MODULE);
        instance.create_dir("chisels").unwrap();
        instance.mount_file("chisels/top.lua", b"-- chisel").unwrap();

        let on_disk = instance.staging_path().join("chisels/top.lua");
        assert_eq!(fs::read(on_disk).unwrap(), b"-- chisel");
    }

    #[test]
    fn test_absolute_guest_path_stays_inside_sandbox() {
        let mut instance = instance_from_wat(EMPTY_MODULE);
        instance.mount_file("/capture.scap", b"\x01\x02").unwrap();

        let on_disk = instance.staging_path().join("capture.scap");
        assert_eq!(fs::read(on_disk).unwrap(), b"\x01\x02");
    }

    #[test]
    fn test_create_dir_is_not_idempotent() {
        let mut instance = instance_from_wat(EMPTY_MODULE);
        instance.create_dir("chisels").unwrap();
        assert!(instance.create_dir("chisels").is_err());
    }

    #[test]
    fn test_mount_file_fails_without_parent_dir() {
        let mut instance = instance_from_wat(EMPTY_MODULE);
        assert!(instance.mount_file("missing/trace.scap", b"x").is_err());
    }

    #[test]
    fn test_run_returns_zero_on_clean_exit() {
        let mut instance = instance_from_wat(EMPTY_MODULE);
        let status = instance.run(&["sysdig".to_string()]).unwrap();
        assert_eq!(status, ExitStatus(0));
        assert!(status.success());
    }

    #[test]
    fn test_run_maps_proc_exit_to_status() {
        let mut instance = instance_from_wat(EXITING_MODULE);
        let status = instance.run(&["sysdig".to_string()]).unwrap();
        assert_eq!(status.code(), 42);
        assert!(!status.success());
    }

    #[tokio::test]
    async fn test_load_missing_module_fails() {
        let loader = WasiModuleLoader::new("/nonexistent/sysdig.wasm");
        assert!(loader.load().await.is_err());
    }
}
