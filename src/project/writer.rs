//! Project assembly
//!
//! A project is written in independent steps. Each step can be rerun on its
//! own; a failing step leaves the output of earlier steps in place.

use std::fs;
use std::path::PathBuf;

use log::{debug, info};

use super::copy::{copy_file, ensure_dir, merge_into_subtree, replace_subtree};
use crate::error::WriterError;
use crate::model::Model;
use crate::template::{
    build_script_markers, operator_source_markers, Rendered, TemplateRegistry, AP_TYPES,
    BUILD_SCRIPT, NNET_UTILS,
};
use crate::toolchain::{CommandToolchain, Toolchain};

/// Files of a generated project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProject {
    /// Project root directory
    pub root: PathBuf,
    /// `<project>_op.cpp`
    pub operator_source: PathBuf,
    /// `build_op.sh`
    pub build_script: PathBuf,
    /// Headers written into `nnet_utils/`
    pub nnet_utils: Vec<PathBuf>,
    /// `ap_types/` directory
    pub ap_types: PathBuf,
    /// Standalone headers in the project root
    pub extra_headers: Vec<PathBuf>,
}

/// Support files written by [`ProjectWriter::write_support_library`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportFiles {
    pub nnet_utils: Vec<PathBuf>,
    pub ap_types: PathBuf,
    pub extra_headers: Vec<PathBuf>,
}

/// Writes operator projects from template assets
pub struct ProjectWriter {
    registry: TemplateRegistry,
    toolchain: Box<dyn Toolchain>,
}

impl ProjectWriter {
    /// Create a writer that queries the installed toolchain for flags
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry,
            toolchain: Box::new(CommandToolchain::default()),
        }
    }

    /// Set the toolchain flag source
    pub fn with_toolchain(mut self, toolchain: impl Toolchain + 'static) -> Self {
        self.toolchain = Box::new(toolchain);
        self
    }

    /// Write every part of the project
    pub fn assemble(&self, model: &Model) -> Result<GeneratedProject, WriterError> {
        info!(
            "writing project '{}' to {}",
            model.config.project_name,
            model.config.output_dir.display()
        );

        let root = self.write_project_dir(model)?;
        let operator_source = self.write_operator_source(model)?;
        let build_script = self.write_build_script(model)?;
        let support = self.write_support_library(model)?;

        Ok(GeneratedProject {
            root,
            operator_source,
            build_script,
            nnet_utils: support.nnet_utils,
            ap_types: support.ap_types,
            extra_headers: support.extra_headers,
        })
    }

    /// Create the output directory if needed
    pub fn write_project_dir(&self, model: &Model) -> Result<PathBuf, WriterError> {
        let root = model.config.output_dir.clone();
        ensure_dir(&root)?;
        Ok(root)
    }

    /// Render the operator source of the main layer
    ///
    /// The template is selected and rendered before the output file is
    /// created, so a missing template or malformed config writes nothing.
    pub fn write_operator_source(&self, model: &Model) -> Result<PathBuf, WriterError> {
        let main_layer = model.main_layer()?;
        let template = self.registry.operator_template(&main_layer.class_name)?;
        debug!(
            "main layer '{}' ({}) uses template {}",
            main_layer.name,
            main_layer.class_name,
            template.name()
        );

        let rendered = template.render(&operator_source_markers(), model)?;
        let path = model
            .config
            .output_dir
            .join(format!("{}_op.cpp", model.config.project_name));
        write_rendered(&path, &rendered)?;
        Ok(path)
    }

    /// Render the build script with the toolchain flags
    pub fn write_build_script(&self, model: &Model) -> Result<PathBuf, WriterError> {
        let template = self.registry.build_script()?;
        let markers = build_script_markers(model, self.toolchain.as_ref())?;
        let rendered = template.render(&markers, model)?;

        let path = model.config.output_dir.join(BUILD_SCRIPT);
        write_rendered(&path, &rendered)?;
        Ok(path)
    }

    /// Copy the static support library into the project
    pub fn write_support_library(&self, model: &Model) -> Result<SupportFiles, WriterError> {
        let root = &model.config.output_dir;

        let nnet_utils = merge_into_subtree(
            &self.registry.nnet_utils_dir(),
            &root.join(NNET_UTILS),
            "h",
        )?;
        debug!("copied {} support headers", nnet_utils.len());

        let ap_types = root.join(AP_TYPES);
        replace_subtree(&self.registry.ap_types_dir(), &ap_types)?;

        let mut extra_headers = Vec::new();
        for src in self.registry.extra_headers() {
            let Some(file_name) = src.file_name() else {
                continue;
            };
            let dst = root.join(file_name);
            copy_file(&src, &dst)?;
            extra_headers.push(dst);
        }

        info!("support library written to {}", root.display());
        Ok(SupportFiles {
            nnet_utils,
            ap_types,
            extra_headers,
        })
    }
}

fn write_rendered(path: &std::path::Path, rendered: &Rendered) -> Result<(), WriterError> {
    fs::write(path, &rendered.text).map_err(|e| WriterError::filesystem(path, e))?;
    info!(
        "wrote {} ({} markers substituted)",
        path.display(),
        rendered.substitutions.len()
    );
    Ok(())
}
