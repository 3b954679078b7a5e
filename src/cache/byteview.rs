use bytes::Bytes;
use std::fmt;

/// Immutable view over a cached payload.
///
/// Cloning a `ByteView` is cheap (reference counted). `byte_slice` always
/// returns a fresh copy so callers never get at the buffer the cache owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Takes ownership of `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { b: data.into() }
    }

    /// Copies `data` into a new view.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(data),
        }
    }

    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Owned copy of the payload.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Lossy UTF-8 rendering of the payload.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.b).into_owned()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.b))
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<String> for ByteView {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&str> for ByteView {
    fn from(data: &str) -> Self {
        Self::copy_from_slice(data.as_bytes())
    }
}
