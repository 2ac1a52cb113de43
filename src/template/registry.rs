//! Registry of template and support assets on disk
//!
//! Asset tree layout:
//!
//! ```text
//! <base>/vivado_train/<class>_op.cpp   operator source, one per layer class
//! <base>/vivado_train/build_op.sh      build script
//! <base>/vivado_train/op_utils.h       standalone headers
//! <base>/vivado_train/io_type.h
//! <base>/vivado/nnet_utils/*.h         support library headers
//! <base>/vivado/ap_types/**            arbitrary precision types
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::engine::Template;
use crate::error::WriterError;

const TRAIN_DIR: &str = "vivado_train";
const SUPPORT_DIR: &str = "vivado";
const OPERATOR_SUFFIX: &str = "_op.cpp";

pub const BUILD_SCRIPT: &str = "build_op.sh";
pub const NNET_UTILS: &str = "nnet_utils";
pub const AP_TYPES: &str = "ap_types";
pub const EXTRA_HEADERS: [&str; 2] = ["op_utils.h", "io_type.h"];

/// Template assets rooted at a base path
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    base_path: PathBuf,
    /// Lowercased layer class -> operator template path
    operators: BTreeMap<String, PathBuf>,
}

impl TemplateRegistry {
    /// Create a registry and scan its operator templates
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Result<Self, WriterError> {
        let mut registry = Self {
            base_path: base_path.into(),
            operators: BTreeMap::new(),
        };
        registry.scan()?;
        Ok(registry)
    }

    /// Collect every `<class>_op.cpp` template
    pub fn scan(&mut self) -> Result<(), WriterError> {
        let dir = self.resolve_path(TRAIN_DIR);
        let entries = std::fs::read_dir(&dir).map_err(|e| WriterError::asset_missing(&dir, e))?;

        self.operators.clear();
        for entry in entries {
            let entry = entry.map_err(|e| WriterError::asset_missing(&dir, e))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if let Some(class) = file_name.strip_suffix(OPERATOR_SUFFIX) {
                if !class.is_empty() {
                    self.operators
                        .insert(class.to_ascii_lowercase(), entry.path());
                }
            }
        }
        Ok(())
    }

    /// Resolve a path relative to the base path
    pub fn resolve_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.base_path.join(relative)
    }

    /// Supported layer classes, sorted
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(|s| s.as_str())
    }

    /// Check if a layer class has an operator template (case-insensitive)
    pub fn contains(&self, class_name: &str) -> bool {
        self.operators.contains_key(&class_name.to_ascii_lowercase())
    }

    /// Path of the operator template for a layer class
    pub fn operator_template_path(&self, class_name: &str) -> Result<&Path, WriterError> {
        self.operators
            .get(&class_name.to_ascii_lowercase())
            .map(PathBuf::as_path)
            .ok_or_else(|| WriterError::NoTemplateForLayer {
                class_name: class_name.to_string(),
                available: self.classes().collect::<Vec<_>>().join(", "),
            })
    }

    /// Load the operator template for a layer class
    pub fn operator_template(&self, class_name: &str) -> Result<Template, WriterError> {
        Template::from_file(self.operator_template_path(class_name)?)
    }

    /// Load the build script template
    pub fn build_script(&self) -> Result<Template, WriterError> {
        Template::from_file(&self.resolve_path(Path::new(TRAIN_DIR).join(BUILD_SCRIPT)))
    }

    /// Directory of support library headers
    pub fn nnet_utils_dir(&self) -> PathBuf {
        self.resolve_path(Path::new(SUPPORT_DIR).join(NNET_UTILS))
    }

    /// Directory of the arbitrary precision types library
    pub fn ap_types_dir(&self) -> PathBuf {
        self.resolve_path(Path::new(SUPPORT_DIR).join(AP_TYPES))
    }

    /// Standalone headers copied into the project root
    pub fn extra_headers(&self) -> Vec<PathBuf> {
        EXTRA_HEADERS
            .iter()
            .map(|h| self.resolve_path(Path::new(TRAIN_DIR).join(h)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn asset_tree() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let train = dir.path().join(TRAIN_DIR);
        fs::create_dir_all(&train).unwrap();
        fs::write(train.join("dense_op.cpp"), "//hls4ml insert defines\n").unwrap();
        fs::write(train.join("upsampling2d_op.cpp"), "\n").unwrap();
        fs::write(train.join(BUILD_SCRIPT), "OP_SRC=\n").unwrap();
        fs::write(train.join("op_utils.h"), "").unwrap();
        dir
    }

    #[test]
    fn test_scan_collects_operator_templates() {
        let dir = asset_tree();
        let registry = TemplateRegistry::with_base_path(dir.path()).unwrap();
        assert_eq!(registry.classes().collect::<Vec<_>>(), vec!["dense", "upsampling2d"]);
        assert!(registry.contains("Dense"));
        assert!(registry.contains("UpSampling2D"));
        assert!(!registry.contains("op_utils.h"));
    }

    #[test]
    fn test_operator_template_lookup_is_case_insensitive() {
        let dir = asset_tree();
        let registry = TemplateRegistry::with_base_path(dir.path()).unwrap();
        let template = registry.operator_template("DENSE").unwrap();
        assert_eq!(template.name(), "dense_op.cpp");
        assert_eq!(template.lines(), &["//hls4ml insert defines\n".to_string()]);
    }

    #[test]
    fn test_unknown_class_lists_available() {
        let dir = asset_tree();
        let registry = TemplateRegistry::with_base_path(dir.path()).unwrap();
        let err = registry.operator_template("Conv2D").unwrap_err();
        match err {
            WriterError::NoTemplateForLayer {
                class_name,
                available,
            } => {
                assert_eq!(class_name, "Conv2D");
                assert_eq!(available, "dense, upsampling2d");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_base_path() {
        let dir = tempdir().unwrap();
        let result = TemplateRegistry::with_base_path(dir.path().join("nope"));
        assert!(matches!(result, Err(WriterError::AssetMissing { .. })));
    }

    #[test]
    fn test_support_paths() {
        let dir = asset_tree();
        let registry = TemplateRegistry::with_base_path(dir.path()).unwrap();
        assert_eq!(registry.nnet_utils_dir(), dir.path().join("vivado/nnet_utils"));
        assert_eq!(registry.ap_types_dir(), dir.path().join("vivado/ap_types"));
        assert_eq!(
            registry.extra_headers(),
            vec![
                dir.path().join("vivado_train/op_utils.h"),
                dir.path().join("vivado_train/io_type.h"),
            ]
        );
        assert!(registry.build_script().is_ok());
    }
}
