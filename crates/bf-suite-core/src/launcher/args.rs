//! Splitting raw launcher arguments into VM flags and program arguments.

use serde::{Deserialize, Serialize};

/// Token marking the end of VM flags.
pub const DOUBLE_DASH: &str = "--";

/// Rule for separating VM flags from program arguments.
///
/// A literal `--` always wins: everything before it is a VM flag, everything
/// after it a program argument. Without it, the leading run of arguments with
/// a recognized prefix are VM flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VmArgSplitter {
    pub recognized_prefixes: Vec<String>,
}

impl Default for VmArgSplitter {
    fn default() -> Self {
        Self {
            recognized_prefixes: [
                "-XX:", "-X", "-D", "-ea", "-esa", "-da", "-agentlib:", "-javaagent:",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        }
    }
}

/// Arguments split into VM flags and program arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    pub vm_args: Vec<String>,
    pub program_args: Vec<String>,
}

impl VmArgSplitter {
    pub fn is_vm_flag(&self, arg: &str) -> bool {
        self.recognized_prefixes
            .iter()
            .any(|prefix| arg.starts_with(prefix.as_str()))
    }

    pub fn split(&self, raw: &[String]) -> SplitArgs {
        if let Some(pos) = raw.iter().position(|a| a == DOUBLE_DASH) {
            return SplitArgs {
                vm_args: raw[..pos].to_vec(),
                program_args: raw[pos + 1..].to_vec(),
            };
        }

        let boundary = raw
            .iter()
            .position(|a| !self.is_vm_flag(a))
            .unwrap_or(raw.len());
        SplitArgs {
            vm_args: raw[..boundary].to_vec(),
            program_args: raw[boundary..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_double_dash_boundary() {
        let split = VmArgSplitter::default().split(&args(&["-Xss8m", "--", "run", "prog.bf"]));
        assert_eq!(split.vm_args, args(&["-Xss8m"]));
        assert_eq!(split.program_args, args(&["run", "prog.bf"]));
    }

    #[test]
    fn test_double_dash_first() {
        let split = VmArgSplitter::default().split(&args(&["--", "-Dx=1"]));
        assert!(split.vm_args.is_empty());
        assert_eq!(split.program_args, args(&["-Dx=1"]));
    }

    #[test]
    fn test_only_first_double_dash_splits() {
        let split = VmArgSplitter::default().split(&args(&["--", "a", "--", "b"]));
        assert_eq!(split.program_args, args(&["a", "--", "b"]));
    }

    #[test]
    fn test_prefix_detection_without_separator() {
        let split = VmArgSplitter::default()
            .split(&args(&["-XX:+UseSerialGC", "-Dbf.trace=true", "prog.bf", "-Dlate"]));
        assert_eq!(split.vm_args, args(&["-XX:+UseSerialGC", "-Dbf.trace=true"]));
        assert_eq!(split.program_args, args(&["prog.bf", "-Dlate"]));
    }

    #[test]
    fn test_unrecognized_flags_are_program_args() {
        let split = VmArgSplitter::default().split(&args(&["--help"]));
        assert!(split.vm_args.is_empty());
        assert_eq!(split.program_args, args(&["--help"]));
    }

    #[test]
    fn test_empty_args() {
        let split = VmArgSplitter::default().split(&[]);
        assert_eq!(split, SplitArgs::default());
    }
}
