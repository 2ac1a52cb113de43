//! Marker tables: sentinel substrings mapped to resolver functions

use std::fmt;

use crate::codegen::{collect_configs, collect_defines, extract_config_typedef, TypeRegistry};
use crate::error::WriterError;
use crate::model::Model;
use crate::toolchain::Toolchain;

/// Operator-source sentinels
pub const DEFINES_MARKER: &str = "//hls4ml insert defines";
pub const PARAMETERS_MARKER: &str = "//hls4ml insert parameters";
pub const TYPEDEF_CONFIG_MARKER: &str = "//hls4ml insert typedef-config";
pub const IO_TYPE_MARKER: &str = "//hls4ml insert io-type";

/// Build-script sentinels
pub const OP_SRC_MARKER: &str = "OP_SRC=";
pub const TARGET_LIB_MARKER: &str = "TARGET_LIB=";
pub const TF_CFLAGS_MARKER: &str = "TF_CFLAGS=";
pub const TF_LFLAGS_MARKER: &str = "TF_LFLAGS=";
pub const OMPFLAGS_MARKER: &str = "OMPFLAGS=";

/// Computes the replacement text of a marker line
pub type Resolver = Box<dyn Fn(&Model) -> Result<String, WriterError>>;

/// A sentinel with its resolver
pub struct Marker {
    sentinel: &'static str,
    resolver: Resolver,
}

impl Marker {
    pub fn sentinel(&self) -> &'static str {
        self.sentinel
    }

    pub fn resolve(&self, model: &Model) -> Result<String, WriterError> {
        (self.resolver)(model)
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("sentinel", &self.sentinel)
            .finish_non_exhaustive()
    }
}

/// Sentinels in priority order
#[derive(Debug, Default)]
pub struct MarkerTable {
    markers: Vec<Marker>,
}

impl MarkerTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sentinel with a lower priority than those already present
    pub fn with<F>(mut self, sentinel: &'static str, resolver: F) -> Self
    where
        F: Fn(&Model) -> Result<String, WriterError> + 'static,
    {
        self.markers.push(Marker {
            sentinel,
            resolver: Box::new(resolver),
        });
        self
    }

    /// Find the first marker whose sentinel occurs in the line
    pub fn find(&self, line: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| line.contains(m.sentinel))
    }

    pub fn sentinels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.markers.iter().map(|m| m.sentinel)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Markers of the operator source template
pub fn operator_source_markers() -> MarkerTable {
    MarkerTable::new()
        .with(DEFINES_MARKER, |model| Ok(render_defines(model)))
        .with(PARAMETERS_MARKER, |model| Ok(collect_configs(model.layers())))
        .with(TYPEDEF_CONFIG_MARKER, |model| {
            extract_config_typedef(model.main_layer()?)
        })
        .with(IO_TYPE_MARKER, |model| {
            let io_type = model.config.io_type;
            Ok(format!("#define IO_TYPE {} // == {}\n", io_type.code(), io_type))
        })
}

/// Typedefs, layer defines and the operator name
fn render_defines(model: &Model) -> String {
    let mut out = TypeRegistry::register_all(model.layers()).render_all();
    out.push_str(&collect_defines(model.layers()));
    out.push_str(&format!("\n#define NAME \"{}\"\n", model.config.op_name()));
    out
}

/// Markers of the build script
///
/// Toolchain flags are queried once, up front. The parallelism flag line is
/// only matched when the model disables parallel compilation.
pub fn build_script_markers(
    model: &Model,
    toolchain: &dyn Toolchain,
) -> Result<MarkerTable, WriterError> {
    let cflags = toolchain.compile_flags()?.join(" ");
    let lflags = toolchain.link_flags()?.join(" ");

    let mut table = MarkerTable::new()
        .with(OP_SRC_MARKER, |model| {
            Ok(format!("OP_SRC={}_op.cpp\n", model.config.project_name))
        })
        .with(TARGET_LIB_MARKER, |model| {
            Ok(format!(
                "TARGET_LIB={}_op-{}.so\n",
                model.config.project_name, model.config.stamp
            ))
        })
        .with(TF_CFLAGS_MARKER, move |_| Ok(format!("TF_CFLAGS=\"{}\"\n", cflags)))
        .with(TF_LFLAGS_MARKER, move |_| Ok(format!("TF_LFLAGS=\"{}\"\n", lflags)));

    if !model.config.is_parallel() {
        table = table.with(OMPFLAGS_MARKER, |_| Ok(format!("{}\n", OMPFLAGS_MARKER)));
    }

    Ok(table)
}
