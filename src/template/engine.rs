//! Line-oriented marker substitution

use std::path::Path;

use log::debug;

use super::resolver::MarkerTable;
use crate::error::WriterError;
use crate::model::Model;

/// An immutable template: a sequence of source lines
///
/// Lines keep their terminators, so passthrough lines are reproduced
/// byte-for-byte (including a missing newline on the final line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    lines: Vec<String>,
}

/// A substitution performed while rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Zero-based index of the marker line in the template
    pub line: usize,
    /// Sentinel that matched the line
    pub sentinel: &'static str,
}

/// Result of rendering a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub substitutions: Vec<Substitution>,
}

impl Template {
    /// Create a template from source text
    pub fn from_source(name: impl Into<String>, source: &str) -> Self {
        Self {
            name: name.into(),
            lines: source.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    /// Load a template file
    pub fn from_file(path: &Path) -> Result<Self, WriterError> {
        let source =
            std::fs::read_to_string(path).map_err(|e| WriterError::asset_missing(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_source(name, &source))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines matched by a sentinel of the table
    pub fn marker_count(&self, markers: &MarkerTable) -> usize {
        self.lines
            .iter()
            .filter(|line| markers.find(line).is_some())
            .count()
    }

    /// Render the template in a single pass
    ///
    /// Each line matched by a sentinel is replaced entirely by its resolver's
    /// output; the first matching sentinel (in table order) wins. All other
    /// lines pass through unchanged.
    pub fn render(&self, markers: &MarkerTable, model: &Model) -> Result<Rendered, WriterError> {
        let mut text = String::new();
        let mut substitutions = Vec::new();

        for (index, line) in self.lines.iter().enumerate() {
            match markers.find(line) {
                Some(marker) => {
                    debug!(
                        "{}:{}: substituting marker '{}'",
                        self.name,
                        index + 1,
                        marker.sentinel()
                    );
                    text.push_str(&marker.resolve(model)?);
                    substitutions.push(Substitution {
                        line: index,
                        sentinel: marker.sentinel(),
                    });
                }
                None => text.push_str(line),
            }
        }

        Ok(Rendered {
            text,
            substitutions,
        })
    }
}
