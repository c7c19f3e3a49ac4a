//! # Argument Router
//!
//! Inspects the first positional argument and picks the tool to launch.
//! Pure decision logic, no side effects; `main` acts on the result.

/// The two precompiled tools the harness can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Sysdig,
    Csysdig,
}

/// Outcome of routing: which tool runs, the program name that becomes
/// argv[0] of its entry point, and the arguments forwarded to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub tool: Tool,
    pub program: String,
    pub args: Vec<String>,
}

impl Dispatch {
    /// Full argv for the module entry point.
    pub fn entry_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// Routes on the mode selector. Only the exact literal `sysdig` selects the
/// primary tool; everything else, including case variants and the empty
/// list, falls through to csysdig. The selector is not validated further and
/// is kept as the entry point's program name.
pub fn route(argv: Vec<String>) -> Dispatch {
    let mut argv = argv.into_iter();
    let selector = argv.next();
    let args: Vec<String> = argv.collect();

    match selector {
        Some(selector) if selector == "sysdig" => Dispatch {
            tool: Tool::Sysdig,
            program: selector,
            args,
        },
        Some(selector) if !selector.is_empty() => Dispatch {
            tool: Tool::Csysdig,
            program: selector,
            args,
        },
        _ => Dispatch {
            tool: Tool::Csysdig,
            program: "csysdig".to_string(),
            args,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sysdig_selects_primary() {
        let dispatch = route(argv(&["sysdig", "-r", "capture.scap"]));
        assert_eq!(dispatch.tool, Tool::Sysdig);
        assert_eq!(dispatch.args, argv(&["-r", "capture.scap"]));
        assert_eq!(dispatch.entry_argv(), argv(&["sysdig", "-r", "capture.scap"]));
    }

    #[test]
    fn test_csysdig_selects_secondary() {
        let dispatch = route(argv(&["csysdig"]));
        assert_eq!(dispatch.tool, Tool::Csysdig);
        assert!(dispatch.args.is_empty());
        assert_eq!(dispatch.entry_argv(), argv(&["csysdig"]));
    }

    #[test]
    fn test_case_variant_falls_through() {
        let dispatch = route(argv(&["Sysdig", "-l"]));
        assert_eq!(dispatch.tool, Tool::Csysdig);
        // The mismatched selector is passed through, not consumed.
        assert_eq!(dispatch.entry_argv(), argv(&["Sysdig", "-l"]));
    }

    #[test]
    fn test_unrelated_selector_falls_through() {
        let dispatch = route(argv(&["strace", "-p", "1"]));
        assert_eq!(dispatch.tool, Tool::Csysdig);
        assert_eq!(dispatch.program, "strace");
        assert_eq!(dispatch.args, argv(&["-p", "1"]));
    }

    #[test]
    fn test_empty_argv_falls_through() {
        let dispatch = route(vec![]);
        assert_eq!(dispatch.tool, Tool::Csysdig);
        assert_eq!(dispatch.entry_argv(), argv(&["csysdig"]));
    }

    #[test]
    fn test_empty_selector_falls_through() {
        let dispatch = route(argv(&["", "-l"]));
        assert_eq!(dispatch.tool, Tool::Csysdig);
        assert_eq!(dispatch.program, "csysdig");
        assert_eq!(dispatch.args, argv(&["-l"]));
    }
}
