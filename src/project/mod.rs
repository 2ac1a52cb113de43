//! Generated project output: the operator source, its build script and the
//! support library it compiles against

mod copy;
mod writer;

pub use copy::{copy_file, ensure_dir, merge_into_subtree, replace_subtree};
pub use writer::{GeneratedProject, ProjectWriter, SupportFiles};
