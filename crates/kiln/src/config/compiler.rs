use serde::{Deserialize, Serialize};

/// Configuration for the C toolchain invocation
///
/// The sandbox drives exactly one compiler. `command` is resolved against
/// PATH unless it is an absolute path; `args` carry `{source}` and
/// `{output}` placeholders expanded per request with workspace paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Compiler executable (e.g., "gcc")
    #[serde(default = "default_command")]
    pub command: String,

    /// Arguments with placeholders
    /// Placeholders: {source}, {output}
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Fixed source file name inside the workspace (e.g., "main.c")
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Output artifact name inside the workspace
    #[serde(default = "default_artifact_name")]
    pub artifact_name: String,
}

impl CompilerConfig {
    /// Expand placeholders in the configured arguments
    pub fn expand_args(&self, source: &str, artifact: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{source}", source).replace("{output}", artifact))
            .collect()
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
            source_name: default_source_name(),
            artifact_name: default_artifact_name(),
        }
    }
}

fn default_command() -> String {
    "gcc".to_owned()
}

fn default_args() -> Vec<String> {
    vec!["{source}".to_owned(), "-o".to_owned(), "{output}".to_owned()]
}

fn default_source_name() -> String {
    "main.c".to_owned()
}

fn default_artifact_name() -> String {
    if cfg!(windows) {
        "main.exe".to_owned()
    } else {
        "main".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_invokes_gcc_on_fixed_source() {
        let compiler = CompilerConfig::default();
        assert_eq!(compiler.command, "gcc");
        assert_eq!(compiler.source_name, "main.c");
        assert!(!compiler.artifact_name.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn default_artifact_name_has_no_extension_on_unix() {
        assert_eq!(CompilerConfig::default().artifact_name, "main");
    }

    #[test]
    fn expand_args_source_placeholder() {
        let compiler = CompilerConfig {
            args: vec!["-o".to_owned(), "out".to_owned(), "{source}".to_owned()],
            ..Default::default()
        };
        let result = compiler.expand_args("/ws/main.c", "/ws/main");
        assert_eq!(result, vec!["-o", "out", "/ws/main.c"]);
    }

    #[test]
    fn expand_args_output_placeholder() {
        let compiler = CompilerConfig {
            args: vec!["{source}".to_owned(), "-o".to_owned(), "{output}".to_owned()],
            ..Default::default()
        };
        let result = compiler.expand_args("main.c", "main");
        assert_eq!(result, vec!["main.c", "-o", "main"]);
    }

    #[test]
    fn expand_args_no_placeholders() {
        let compiler = CompilerConfig {
            args: vec!["-Wall".to_owned(), "-O2".to_owned()],
            ..Default::default()
        };
        let result = compiler.expand_args("main.c", "main");
        assert_eq!(result, vec!["-Wall", "-O2"]);
    }

    #[test]
    fn expand_args_empty() {
        let compiler = CompilerConfig {
            args: vec![],
            ..Default::default()
        };
        assert!(compiler.expand_args("main.c", "main").is_empty());
    }

    #[test]
    fn expand_args_placeholder_in_middle() {
        let compiler = CompilerConfig {
            args: vec!["prefix-{output}-suffix".to_owned()],
            ..Default::default()
        };
        let result = compiler.expand_args("main.c", "main");
        assert_eq!(result, vec!["prefix-main-suffix"]);
    }

    #[test]
    fn expand_args_repeated_placeholder() {
        let compiler = CompilerConfig {
            args: vec!["{source}".to_owned(), "{source}.bak".to_owned()],
            ..Default::default()
        };
        let result = compiler.expand_args("main.c", "main");
        assert_eq!(result, vec!["main.c", "main.c.bak"]);
    }
}
