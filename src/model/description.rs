//! TOML model descriptions
//!
//! ```toml
//! [config]
//! output_dir = "myproj_prj"
//! project_name = "myproj"
//! stamp = "A1"
//! io_type = "io_parallel"
//!
//! [[layers]]
//! class_name = "InputLayer"
//! name = "input_1"
//!
//! [[layers]]
//! class_name = "Dense"
//! name = "dense"
//! types = [{ name = "layer2_t", precision = "ap_fixed<16,6>" }]
//! config_text = "struct config2 : nnet::dense_config { };\n"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::{IoType, Layer, Model, ModelConfig, Precision, PrecisionType};
use crate::error::WriterError;

/// Errors that can occur when reading a model description
#[derive(Error, Debug)]
pub enum ModelDescriptionError {
    #[error("Failed to read model description: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse model description TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid precision '{spec}': {reason}")]
    InvalidPrecision { spec: String, reason: String },
}

#[derive(Deserialize)]
struct TomlModel {
    config: TomlConfig,
    #[serde(default)]
    layers: Vec<TomlLayer>,
}

#[derive(Deserialize)]
struct TomlConfig {
    output_dir: PathBuf,
    #[serde(default = "default_project_name")]
    project_name: String,
    stamp: Option<String>,
    #[serde(default = "default_io_type")]
    io_type: String,
    parallel: Option<bool>,
}

#[derive(Deserialize)]
struct TomlLayer {
    class_name: String,
    name: String,
    #[serde(default)]
    types: Vec<TomlType>,
    config_text: Option<String>,
    op_defines_text: Option<String>,
}

#[derive(Deserialize)]
struct TomlType {
    name: String,
    precision: String,
}

fn default_project_name() -> String {
    "myproject".to_string()
}

fn default_io_type() -> String {
    "io_parallel".to_string()
}

impl Model {
    /// Load a model description from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, WriterError> {
        let content = std::fs::read_to_string(path).map_err(ModelDescriptionError::from)?;
        Self::from_toml_str(&content)
    }

    /// Load a model description from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, WriterError> {
        let parsed: TomlModel = toml::from_str(content).map_err(ModelDescriptionError::from)?;

        let mut config = ModelConfig::new(parsed.config.output_dir, parsed.config.project_name)
            .with_io_type(IoType::parse(&parsed.config.io_type)?);
        if let Some(stamp) = parsed.config.stamp {
            config = config.with_stamp(stamp);
        }
        config.parallel = parsed.config.parallel;

        let mut model = Model::new(config);
        for toml_layer in parsed.layers {
            let mut layer = Layer::new(toml_layer.class_name, toml_layer.name);
            for ty in toml_layer.types {
                let precision: Precision = ty.precision.parse()?;
                layer.set_type(PrecisionType::new(ty.name, precision));
            }
            layer.config_text = toml_layer.config_text;
            layer.op_defines_text = toml_layer.op_defines_text;
            model.push_layer(layer);
        }

        Ok(model)
    }
}
