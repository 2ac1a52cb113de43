//! Error types for project generation

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::model::ModelDescriptionError;

/// Errors that can occur while writing a generated project
#[derive(Error, Debug)]
pub enum WriterError {
    /// A template or static asset could not be opened
    #[error("asset not found: {path}: {source}")]
    AssetMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The main layer's class has no operator-source template
    #[error("no template for layer class '{class_name}' (available: {available})")]
    NoTemplateForLayer {
        class_name: String,
        available: String,
    },

    /// A layer's config text declares no struct to alias
    #[error("config of layer '{layer}' declares no struct")]
    MalformedConfig { layer: String, config_text: String },

    /// IOType outside of the supported selectors
    #[error("unknown io type '{value}' (expected 'parallel' or 'streamed')")]
    UnknownIoType { value: String },

    /// The layer graph holds no layer besides input placeholders
    #[error("model has no main layer")]
    NoMainLayer,

    /// Directory creation, copy or overwrite failure
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The toolchain introspection command failed
    #[error("toolchain query `{command}` failed: {reason}")]
    Toolchain { command: String, reason: String },

    /// Model description could not be loaded
    #[error("model description error: {0}")]
    ModelDescription(#[from] ModelDescriptionError),
}

impl WriterError {
    pub fn asset_missing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::AssetMissing {
            path: path.into(),
            source,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn malformed_config(layer: impl Into<String>, config_text: impl Into<String>) -> Self {
        Self::MalformedConfig {
            layer: layer.into(),
            config_text: config_text.into(),
        }
    }

    /// Format the error for terminal output
    ///
    /// Malformed configs are rendered with the offending config text as
    /// source context; every other variant falls back to its display string.
    pub fn format(&self) -> String {
        match self {
            Self::MalformedConfig { layer, config_text } => {
                let filename = format!("{}.config", layer);
                let end = config_text.chars().count().max(1);
                let mut buf = Vec::new();
                let written = Report::build(ReportKind::Error, filename.as_str(), 0)
                    .with_message(self.to_string())
                    .with_label(
                        Label::new((filename.as_str(), 0..end))
                            .with_message("expected a line starting with 'struct '")
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename.as_str(), Source::from(config_text.as_str())), &mut buf);
                match written {
                    Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
                    Err(_) => self.to_string(),
                }
            }
            _ => self.to_string(),
        }
    }
}
