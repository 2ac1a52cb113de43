//! Generated C++ fragments derived from the layer graph
//!
//! - [`TypeRegistry`] emits each precision typedef once, in first-seen order
//! - [`collect_configs`] and [`collect_defines`] gather per-layer text
//! - [`extract_config_typedef`] recovers the main layer's config struct name

mod aggregate;
mod registry;
mod typedef;

pub use aggregate::{collect_configs, collect_defines};
pub use registry::TypeRegistry;
pub use typedef::{extract_config_typedef, parse_struct_name};
