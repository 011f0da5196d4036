use std::{
    fmt,
    str::{self, Utf8Error},
    string::FromUtf8Error,
};

/// Smallest allocation the buffer grows to
pub const MIN_CAPACITY: usize = 128;

/// Append-only byte buffer that always keeps a `0` terminator after its content.
///
/// The terminator lives inside the storage, so `capacity() >= len() + 1` holds at all times
/// and [`TextBuffer::as_bytes_with_nul`] can hand the text to C-style consumers without copying.
#[derive(Clone, PartialEq, Eq)]
pub struct TextBuffer {
    data: Vec<u8>,
}

impl TextBuffer {
    pub fn new() -> Self {
        let mut data = Vec::with_capacity(MIN_CAPACITY);
        data.push(0);
        Self { data }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.append_str(text);
        buffer
    }

    /// Length of the content, without the terminator
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn append(&mut self, bytes: &[u8]) {
        let required = self.len() + bytes.len() + 1;
        if required > self.data.capacity() {
            // Power of two growth keeps appends amortized O(1)
            let new_capacity = required.next_power_of_two().max(MIN_CAPACITY);
            self.data.reserve_exact(new_capacity - self.data.len());
        }

        self.data.pop();
        self.data.extend_from_slice(bytes);
        self.data.push(0);
    }

    pub fn append_str(&mut self, text: &str) {
        self.append(text.as_bytes());
    }

    /// Cuts the content down to `new_len` bytes.
    ///
    /// Only internal bookkeeping calls this, so asking for a larger size is a bug and panics.
    pub fn truncate(&mut self, new_len: usize) {
        assert!(
            new_len <= self.len(),
            "Cannot truncate a text buffer of length {} to the larger length {}",
            self.len(),
            new_len
        );
        self.data.truncate(new_len);
        self.data.push(0);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(self.as_bytes())
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    pub fn into_string(mut self) -> Result<String, FromUtf8Error> {
        self.data.pop();
        String::from_utf8(self.data)
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("text", &String::from_utf8_lossy(self.as_bytes()))
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Write for TextBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}
