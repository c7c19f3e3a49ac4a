use clap::Parser;

/// Runs the precompiled sysdig/csysdig WebAssembly tools.
///
/// The first token selects the tool (`sysdig` for the capture tool, anything
/// else for the curses UI); everything after it is forwarded verbatim to the
/// module's entry point.
#[derive(Debug, Parser)]
#[command(name = "scaprun", version, about = "Launcher for the sysdig WebAssembly tools")]
pub struct Cli {
    /// Tool selector followed by the arguments forwarded to it,
    /// e.g. `sysdig -r capture.scap`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub argv: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphen_arguments_are_forwarded_verbatim() {
        let cli = Cli::parse_from(["scaprun", "sysdig", "-r", "capture.scap"]);
        assert_eq!(cli.argv, vec!["sysdig", "-r", "capture.scap"]);
    }

    #[test]
    fn test_no_arguments_is_accepted() {
        let cli = Cli::parse_from(["scaprun"]);
        assert!(cli.argv.is_empty());
    }
}
