use std::{collections::HashMap, fs, io};

/// Source of raw file contents for the include resolver
pub trait IncludeLoader {
    fn load(&mut self, path: &str) -> io::Result<Vec<u8>>;
}

/// Reads files from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemLoader;

impl IncludeLoader for FileSystemLoader {
    fn load(&mut self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// Serves files from memory, keyed by the exact path the resolver asks for
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl IncludeLoader for MemoryLoader {
    fn load(&mut self, path: &str) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {path}"))
        })
    }
}

impl<L: IncludeLoader + ?Sized> IncludeLoader for &mut L {
    fn load(&mut self, path: &str) -> io::Result<Vec<u8>> {
        (**self).load(path)
    }
}
