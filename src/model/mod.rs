//! Layer graph and model configuration consumed by the project writer
//!
//! The graph is built elsewhere (normally by a model converter); this module
//! only describes the parts of it the writer reads. A TOML model description
//! loader is provided in [`description`] for driving the writer directly.

pub mod description;
mod precision;

use std::fmt;
use std::path::PathBuf;

pub use description::ModelDescriptionError;
pub use precision::{Precision, PrecisionType, RoundingMode, SaturationMode};

use crate::error::WriterError;

/// Class names treated as input placeholders
const INPUT_CLASSES: &[&str] = &["input", "inputlayer"];

/// A node of the layer graph
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer class, selects the operator-source template
    pub class_name: String,
    /// Unique name within the model
    pub name: String,
    /// Precision types used by this layer, in declaration order
    types: Vec<PrecisionType>,
    /// Rendered C++ config structs
    pub config_text: Option<String>,
    /// Rendered `#define` block
    pub op_defines_text: Option<String>,
}

impl Layer {
    pub fn new(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            types: Vec::new(),
            config_text: None,
            op_defines_text: None,
        }
    }

    /// Add a precision type, replacing any same-named type of this layer
    pub fn with_type(mut self, ty: PrecisionType) -> Self {
        self.set_type(ty);
        self
    }

    pub fn with_config_text(mut self, text: impl Into<String>) -> Self {
        self.config_text = Some(text.into());
        self
    }

    pub fn with_op_defines_text(mut self, text: impl Into<String>) -> Self {
        self.op_defines_text = Some(text.into());
        self
    }

    pub fn set_type(&mut self, ty: PrecisionType) {
        match self.types.iter_mut().find(|t| t.name() == ty.name()) {
            Some(existing) => *existing = ty,
            None => self.types.push(ty),
        }
    }

    /// Precision types of this layer, keyed by their names
    pub fn types(&self) -> &[PrecisionType] {
        &self.types
    }

    /// Check if this layer is an input placeholder
    pub fn is_input(&self) -> bool {
        let class = self.class_name.to_ascii_lowercase();
        INPUT_CLASSES.contains(&class.as_str())
    }
}

/// How tensors enter and leave the generated operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoType {
    Parallel,
    Streamed,
}

impl IoType {
    /// Parse a selector value, case-insensitively
    pub fn parse(value: &str) -> Result<Self, WriterError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "parallel" | "io_parallel" => Ok(IoType::Parallel),
            "streamed" | "stream" | "io_stream" => Ok(IoType::Streamed),
            _ => Err(WriterError::UnknownIoType {
                value: value.to_string(),
            }),
        }
    }

    /// Numeric code understood by `io_type.h`
    pub fn code(&self) -> u8 {
        match self {
            IoType::Parallel => 1,
            IoType::Streamed => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IoType::Parallel => "io_parallel",
            IoType::Streamed => "io_stream",
        }
    }
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration values the writer reads from the model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Directory the project is written to
    pub output_dir: PathBuf,
    /// Project name, prefixes the generated file and library names
    pub project_name: String,
    /// Identifier making symbol and library names unique
    pub stamp: String,
    pub io_type: IoType,
    /// Model-level parallelism switch; `None` means enabled
    pub parallel: Option<bool>,
}

impl ModelConfig {
    /// Create a configuration with a fresh stamp and parallel IO
    pub fn new(output_dir: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            project_name: project_name.into(),
            stamp: make_stamp(),
            io_type: IoType::Parallel,
            parallel: None,
        }
    }

    pub fn with_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = stamp.into();
        self
    }

    pub fn with_io_type(mut self, io_type: IoType) -> Self {
        self.io_type = io_type;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Whether parallel compilation stays enabled
    pub fn is_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    /// Operator symbol name: `<project>_<stamp in lowercase>`
    pub fn op_name(&self) -> String {
        format!("{}_{}", self.project_name, self.stamp.to_lowercase())
    }
}

/// Generate an 8 hex digit stamp
pub fn make_stamp() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[id.len() - 8..].to_string()
}

/// A layer graph together with its configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    layers: Vec<Layer>,
    pub config: ModelConfig,
}

impl Model {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            layers: Vec::new(),
            config,
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Layers in graph order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The first layer that is not an input placeholder
    pub fn main_layer(&self) -> Result<&Layer, WriterError> {
        self.layers
            .iter()
            .find(|layer| !layer.is_input())
            .ok_or(WriterError::NoMainLayer)
    }
}
