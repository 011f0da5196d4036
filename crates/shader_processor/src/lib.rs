//! Resolves `#include "relative/path"` directives in shader sources.
//!
//! This is not a C preprocessor: macros and conditionals are left in the text for the shader
//! compiler. Directives inside `//` and `/* */` comments are ignored, and every included file is
//! bracketed by `BEGIN`/`END` marker comments so errors in the merged text can be traced back.

pub mod error;
pub mod include_resolver;
pub mod loader;
pub mod scan_cursor;
pub mod text_buffer;

pub use error::PreprocessError;
pub use include_resolver::{preprocess_file, IncludeResolver, ResolverOptions};
pub use loader::{FileSystemLoader, IncludeLoader, MemoryLoader};
pub use text_buffer::TextBuffer;
