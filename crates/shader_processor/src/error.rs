use std::io;
use thiserror::Error;

/// Reasons a preprocessing request can fail. Any of them aborts the whole request.
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Could not load text file \"{path}\": {source}")]
    Load {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Unexpected EOF in \"{path}\" after {context}")]
    UnexpectedEof { path: String, context: &'static str },

    #[error("Expected '\"' after #include in \"{path}\", but got '{found}'")]
    ExpectedQuote { path: String, found: char },

    #[error("Include path \"{include}\" in \"{path}\" is not valid UTF-8")]
    InvalidIncludePath { path: String, include: String },

    #[error("Include depth limit of {depth} reached at \"{path}\", the include graph is probably cyclic")]
    IncludeTooDeep { path: String, depth: usize },
}

impl PreprocessError {
    /// File in which the problem was detected
    pub fn path(&self) -> &str {
        match self {
            PreprocessError::Load { path, .. }
            | PreprocessError::UnexpectedEof { path, .. }
            | PreprocessError::ExpectedQuote { path, .. }
            | PreprocessError::InvalidIncludePath { path, .. }
            | PreprocessError::IncludeTooDeep { path, .. } => path,
        }
    }
}
