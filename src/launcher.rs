//! # Module Launcher
//!
//! Stages chisel scripts and capture files into a loaded module's sandbox
//! filesystem, then transfers control to its entry point. Every staging step
//! is fail-fast: the first I/O error aborts the run before the engine ever
//! sees the user's command.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::engine::{EngineInstance, EngineLoader, ExitStatus};

/// Sandbox directory the engine expects its chisel scripts in.
pub const CHISEL_MOUNT: &str = "chisels";

/// Suffix marking an argument as a capture file to stage.
pub const TRACE_EXT: &str = ".scap";

/// Loads the module, stages its inputs and runs it to completion.
///
/// `entry_argv` is handed to the entry point unmodified; its first element
/// is the program name, the rest are scanned for trace files to stage.
pub async fn launch<L: EngineLoader>(
    loader: &L,
    chisel_dir: &Path,
    entry_argv: &[String],
) -> Result<ExitStatus> {
    let mut instance = loader.load().await?;
    let forwarded = entry_argv.get(1..).unwrap_or_default();
    stage(&mut instance, chisel_dir, forwarded)?;
    tracing::info!(argv = ?entry_argv, "transferring control to module");
    instance.run(entry_argv)
}

/// Stages chisel scripts and any `.scap` arguments into the sandbox.
///
/// Not idempotent: the `chisels` directory is created fresh and a second
/// call against the same instance fails there.
pub fn stage<I: EngineInstance>(instance: &mut I, chisel_dir: &Path, args: &[String]) -> Result<()> {
    instance.create_dir(CHISEL_MOUNT)?;

    let entries = fs::read_dir(chisel_dir)
        .with_context(|| format!("Failed to read chisel directory {}", chisel_dir.display()))?;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read chisel directory {}", chisel_dir.display()))?;
        let name = entry.file_name();
        let data = fs::read(entry.path())
            .with_context(|| format!("Failed to read chisel {}", entry.path().display()))?;
        tracing::debug!(chisel = %name.to_string_lossy(), "staging chisel");
        instance.mount_file(
            &format!("{CHISEL_MOUNT}/{}", name.to_string_lossy()),
            &data,
        )?;
    }

    for arg in args {
        if arg.ends_with(TRACE_EXT) {
            let data = fs::read(arg)
                .with_context(|| format!("Failed to read trace file {arg}"))?;
            tracing::debug!(trace = %arg, "staging trace file");
            instance.mount_file(arg, &data)?;
        }
    }

    Ok(())
}
