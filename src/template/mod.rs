//! Template system for generated project files
//!
//! Templates are plain source files in which some lines are markers. A marker
//! line contains a sentinel substring and is replaced as a whole by text
//! computed from the model; every other line is copied through unchanged.
//!
//! # Example
//!
//! ```text
//! #include "io_type.h"
//! //hls4ml insert io-type        <- becomes `#define IO_TYPE 1 // == io_parallel`
//! ```

mod engine;
mod registry;
mod resolver;

pub use engine::{Rendered, Substitution, Template};
pub use registry::{TemplateRegistry, AP_TYPES, BUILD_SCRIPT, EXTRA_HEADERS, NNET_UTILS};
pub use resolver::{
    build_script_markers, operator_source_markers, Marker, MarkerTable, Resolver,
    DEFINES_MARKER, IO_TYPE_MARKER, OMPFLAGS_MARKER, OP_SRC_MARKER, PARAMETERS_MARKER,
    TARGET_LIB_MARKER, TF_CFLAGS_MARKER, TF_LFLAGS_MARKER, TYPEDEF_CONFIG_MARKER,
};
