use crate::{
    error::PreprocessError,
    loader::{FileSystemLoader, IncludeLoader},
    scan_cursor::ScanCursor,
    text_buffer::TextBuffer,
};

const INCLUDE_DIRECTIVE: &[u8] = b"#include";
const MARKER_FENCE: &str = "####################";

pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Nesting level past which an include is rejected. The root file is at level 0.
    pub max_include_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

/// Expands `#include "path"` directives recursively into a single text.
///
/// Include paths are relative to the directory of the file containing the directive.
/// Every file's contribution is wrapped in `BEGIN`/`END` marker comments.
pub struct IncludeResolver<L> {
    loader: L,
    options: ResolverOptions,
    included_files: Vec<String>,
}

impl<L: IncludeLoader> IncludeResolver<L> {
    pub fn new(loader: L) -> Self {
        Self::with_options(loader, ResolverOptions::default())
    }

    pub fn with_options(loader: L, options: ResolverOptions) -> Self {
        Self {
            loader,
            options,
            included_files: Vec::new(),
        }
    }

    /// Every file loaded by the last run, root first, in expansion order.
    /// After a failure these are the files that were read before it.
    pub fn included_files(&self) -> &[String] {
        &self.included_files
    }

    /// Loads `file_name` and everything it includes. Either the whole expansion succeeds or
    /// nothing is returned.
    pub fn preprocess_file(&mut self, file_name: &str) -> Result<TextBuffer, PreprocessError> {
        self.included_files.clear();

        let mut output = TextBuffer::new();
        self.expand_file(&mut output, file_name, 0)?;

        log::debug!(
            "Preprocessed \"{}\" ({} files, {} bytes)",
            file_name,
            self.included_files.len(),
            output.len()
        );
        Ok(output)
    }

    fn expand_file(
        &mut self,
        output: &mut TextBuffer,
        file_name: &str,
        depth: usize,
    ) -> Result<(), PreprocessError> {
        if depth > self.options.max_include_depth {
            return Err(report(PreprocessError::IncludeTooDeep {
                path: file_name.to_owned(),
                depth: self.options.max_include_depth,
            }));
        }

        append_marker(output, "BEGIN", file_name);

        let unprocessed = self.loader.load(file_name).map_err(|source| {
            report(PreprocessError::Load {
                path: file_name.to_owned(),
                source,
            })
        })?;
        self.included_files.push(file_name.to_owned());

        let mut include_path = TextBuffer::from_text(directory_of(file_name));
        if !include_path.as_bytes().ends_with(b"/") {
            include_path.append_str("/");
        }
        let directory_len = include_path.len();

        let mut cursor = ScanCursor::new(&unprocessed);
        while !cursor.is_eof() {
            let start = cursor.offset();
            include_path.truncate(directory_len);

            let found = cursor.seek_to_match(INCLUDE_DIRECTIVE);
            output.append(cursor.slice(start, cursor.offset()));
            if !found {
                break;
            }

            cursor.advance(INCLUDE_DIRECTIVE.len());
            cursor.skip_whitespace();
            match cursor.peek() {
                Some(b'"') => cursor.advance(1),
                Some(other) => {
                    return Err(report(PreprocessError::ExpectedQuote {
                        path: file_name.to_owned(),
                        found: char::from(other),
                    }))
                }
                None => return Err(unexpected_eof(file_name, "#include")),
            }
            if cursor.is_eof() {
                return Err(unexpected_eof(file_name, "#include \""));
            }

            let name_start = cursor.offset();
            if !cursor.seek_to_match(b"\"") {
                return Err(unexpected_eof(file_name, "#include \"..."));
            }
            include_path.append(cursor.slice(name_start, cursor.offset()));
            cursor.advance(1);

            let Ok(child_path) = include_path.as_str() else {
                return Err(report(PreprocessError::InvalidIncludePath {
                    path: file_name.to_owned(),
                    include: include_path.to_string_lossy(),
                }));
            };
            self.expand_file(output, child_path, depth + 1)?;
        }

        output.append_str("\n");
        append_marker_line(output, "END", file_name);

        Ok(())
    }
}

/// Preprocesses a file from disk with the default options
pub fn preprocess_file(file_name: &str) -> Result<TextBuffer, PreprocessError> {
    IncludeResolver::new(FileSystemLoader).preprocess_file(file_name)
}

/// Directory part of a forward slash separated path, without the trailing slash
fn directory_of(path: &str) -> &str {
    match path.rfind(|c: char| c == '/' || c == '\\') {
        Some(0) => &path[..1],
        Some(index) => &path[..index],
        None => ".",
    }
}

fn append_marker(output: &mut TextBuffer, kind: &str, file_name: &str) {
    output.append_str("\n");
    append_marker_line(output, kind, file_name);
}

fn append_marker_line(output: &mut TextBuffer, kind: &str, file_name: &str) {
    output.append_str("// ");
    output.append_str(MARKER_FENCE);
    output.append_str(" ");
    output.append_str(kind);
    output.append_str(" ");
    output.append_str(file_name);
    output.append_str(" ");
    output.append_str(MARKER_FENCE);
    output.append_str("\n");
}

fn unexpected_eof(file_name: &str, context: &'static str) -> PreprocessError {
    report(PreprocessError::UnexpectedEof {
        path: file_name.to_owned(),
        context,
    })
}

fn report(error: PreprocessError) -> PreprocessError {
    log::error!("{error}");
    error
}
