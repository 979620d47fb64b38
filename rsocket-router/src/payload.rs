//! Payload model shared by every interaction kind.

use bytes::Bytes;
use std::fmt::{Debug, Formatter};

/// One RSocket payload: opaque data plus an optional metadata buffer.
///
/// Both buffers are reference counted. Dropping the last handle releases the
/// underlying memory, so any payload the router inspects but does not forward
/// is released when it goes out of scope.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Payload {
    data: Bytes,
    metadata: Option<Bytes>,
}

impl Payload {
    pub fn new(data: impl Into<Bytes>, metadata: Option<Bytes>) -> Self {
        Self {
            data: data.into(),
            metadata,
        }
    }

    pub fn from_data(data: impl Into<Bytes>) -> Self {
        Self::new(data, None)
    }

    pub fn with_metadata(data: impl Into<Bytes>, metadata: impl Into<Bytes>) -> Self {
        Self::new(data, Some(metadata.into()))
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Metadata buffer, `None` when the frame carried no metadata flag.
    pub fn metadata(&self) -> Option<&Bytes> {
        self.metadata.as_ref()
    }

    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    /// Lossy UTF-8 view of the data, handy for logging and text handlers.
    pub fn data_utf8(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    pub fn into_parts(self) -> (Bytes, Option<Bytes>) {
        (self.data, self.metadata)
    }
}

impl Debug for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload")
            .field("data_len", &self.data.len())
            .field("metadata_len", &self.metadata.as_ref().map(Bytes::len))
            .finish()
    }
}

impl From<&'static str> for Payload {
    fn from(data: &'static str) -> Self {
        Self::from_data(Bytes::from_static(data.as_bytes()))
    }
}

impl From<String> for Payload {
    fn from(data: String) -> Self {
        Self::from_data(data)
    }
}
