//! Build toolchain introspection
//!
//! The build script needs the compile and link flags of the installed
//! TensorFlow. They are treated as opaque strings.

use std::process::Command;

use log::debug;

use crate::error::WriterError;

/// Default query for compile flags
pub const TF_COMPILE_FLAGS_QUERY: &str =
    "python3 -c \"import tensorflow as tf; print(' '.join(tf.sysconfig.get_compile_flags()))\"";

/// Default query for link flags
pub const TF_LINK_FLAGS_QUERY: &str =
    "python3 -c \"import tensorflow as tf; print(' '.join(tf.sysconfig.get_link_flags()))\"";

/// Source of toolchain flags for the build script
pub trait Toolchain {
    fn compile_flags(&self) -> Result<Vec<String>, WriterError>;
    fn link_flags(&self) -> Result<Vec<String>, WriterError>;
}

/// Flags known up front
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticToolchain {
    pub compile: Vec<String>,
    pub link: Vec<String>,
}

impl StaticToolchain {
    pub fn new<C, L>(compile: C, link: L) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            compile: compile.into_iter().map(Into::into).collect(),
            link: link.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from whitespace-separated flag strings
    pub fn from_flag_strings(compile: &str, link: &str) -> Self {
        Self::new(compile.split_whitespace(), link.split_whitespace())
    }
}

impl Toolchain for StaticToolchain {
    fn compile_flags(&self) -> Result<Vec<String>, WriterError> {
        Ok(self.compile.clone())
    }

    fn link_flags(&self) -> Result<Vec<String>, WriterError> {
        Ok(self.link.clone())
    }
}

/// Flags printed by shell commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToolchain {
    /// Shell used to run the queries
    pub shell: String,
    pub compile_query: String,
    pub link_query: String,
}

impl Default for CommandToolchain {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            compile_query: TF_COMPILE_FLAGS_QUERY.to_string(),
            link_query: TF_LINK_FLAGS_QUERY.to_string(),
        }
    }
}

impl CommandToolchain {
    pub fn new(compile_query: impl Into<String>, link_query: impl Into<String>) -> Self {
        Self {
            compile_query: compile_query.into(),
            link_query: link_query.into(),
            ..Self::default()
        }
    }

    /// Run a query and split its standard output on whitespace
    fn query(&self, command: &str) -> Result<Vec<String>, WriterError> {
        debug!("querying toolchain: {}", command);
        let failed = |reason: String| WriterError::Toolchain {
            command: command.to_string(),
            reason,
        };

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{}: {}", output.status, stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }
}

impl Toolchain for CommandToolchain {
    fn compile_flags(&self) -> Result<Vec<String>, WriterError> {
        self.query(&self.compile_query)
    }

    fn link_flags(&self) -> Result<Vec<String>, WriterError> {
        self.query(&self.link_query)
    }
}
