//! # scaprun
//!
//! Staging-and-dispatch harness for the precompiled sysdig/csysdig
//! WebAssembly modules: routes on the first argument, stages chisel scripts
//! and capture files into the selected module's sandbox filesystem, then
//! hands control to its entry point.

mod cli;
mod config;
mod engine;
mod launcher;
mod router;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LauncherConfig;
use crate::engine::wasi::WasiModuleLoader;
use crate::router::Tool;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; the module's own output owns stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::Cli::parse();
    let config = LauncherConfig::load()?;
    let dispatch = router::route(cli.argv);

    let module = match dispatch.tool {
        Tool::Sysdig => &config.sysdig_module,
        Tool::Csysdig => &config.csysdig_module,
    };
    tracing::info!(tool = ?dispatch.tool, module = %module.display(), "dispatching");

    let loader = WasiModuleLoader::new(module);
    let status = launcher::launch(&loader, &config.chisel_dir, &dispatch.entry_argv()).await?;
    if !status.success() {
        std::process::exit(status.code());
    }
    Ok(())
}
