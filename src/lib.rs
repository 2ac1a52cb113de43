//! hlsop - operator project writer for hls4ml-style layer graphs
//!
//! This library turns a layer graph into a compilable operator project: a
//! single `<project>_op.cpp`, a `build_op.sh` that compiles it into a shared
//! library, and the support headers it needs.
//!
//! # Example
//!
//! ```rust,no_run
//! use hlsop::{write_project, Layer, Model, ModelConfig, WriterConfig};
//!
//! let model = Model::new(ModelConfig::new("myproj_prj", "myproj").with_stamp("A1"))
//!     .with_layer(Layer::new("InputLayer", "input_1"))
//!     .with_layer(Layer::new("Dense", "dense").with_config_text("struct config2 {};\n"));
//!
//! let config = WriterConfig::new()
//!     .with_assets_dir("templates")
//!     .with_flags("-I/opt/tf/include", "-L/opt/tf/lib -ltensorflow_framework");
//!
//! let project = write_project(&model, &config).unwrap();
//! assert!(project.operator_source.ends_with("myproj_op.cpp"));
//! ```

pub mod codegen;
pub mod error;
pub mod model;
pub mod project;
pub mod template;
pub mod toolchain;

use std::path::PathBuf;

pub use error::WriterError;
pub use model::{IoType, Layer, Model, ModelConfig, Precision, PrecisionType};
pub use project::{GeneratedProject, ProjectWriter};
pub use template::{Template, TemplateRegistry};
pub use toolchain::{CommandToolchain, StaticToolchain, Toolchain};

/// Configuration for writing a project
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Root of the template asset tree
    pub assets_dir: PathBuf,
    /// Fixed toolchain flags; queried from the installed toolchain if unset
    pub toolchain: Option<StaticToolchain>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("templates"),
            toolchain: None,
        }
    }
}

impl WriterConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template asset directory
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Use fixed, whitespace-separated compile and link flags
    pub fn with_flags(mut self, compile: &str, link: &str) -> Self {
        self.toolchain = Some(StaticToolchain::from_flag_strings(compile, link));
        self
    }
}

/// Write the project of a model
///
/// Scans the asset tree, then creates the output directory, renders the
/// operator source and build script, and copies the support library.
pub fn write_project(model: &Model, config: &WriterConfig) -> Result<GeneratedProject, WriterError> {
    let registry = TemplateRegistry::with_base_path(&config.assets_dir)?;
    let writer = match &config.toolchain {
        Some(toolchain) => ProjectWriter::new(registry).with_toolchain(toolchain.clone()),
        None => ProjectWriter::new(registry),
    };
    writer.assemble(model)
}
