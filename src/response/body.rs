//! Response body: streamed file or in-memory bytes.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

pub enum Body {
    /// File streamed from disk without buffering.
    File { file: File, len: u64 },
    /// Transformed content.
    Bytes(Vec<u8>),
    /// In-memory asset content.
    Shared(Arc<[u8]>),
}

impl Body {
    /// Length in bytes.
    pub fn len(&self) -> u64 {
        match self {
            Self::File { len, .. } => *len,
            Self::Bytes(bytes) => bytes.len() as u64,
            Self::Shared(bytes) => bytes.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume into a reader.
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        match self {
            Self::File { file, len } => Box::new(file.take(len)),
            Self::Bytes(bytes) => Box::new(Cursor::new(bytes)),
            Self::Shared(bytes) => Box::new(Cursor::new(bytes)),
        }
    }

    /// Read the whole body into memory.
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Shared(bytes) => Ok(bytes.to_vec()),
            Self::File { file, len } => {
                let mut buffer = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
                file.take(len).read_to_end(&mut buffer)?;
                Ok(buffer)
            }
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { len, .. } => f.debug_struct("File").field("len", len).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Shared(bytes) => f.debug_tuple("Shared").field(&bytes.len()).finish(),
        }
    }
}
