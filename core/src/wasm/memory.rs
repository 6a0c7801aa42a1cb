//! Read-only view over the module's linear memory
//!
//! Strings cross the boundary as `(ptr, len)` byte ranges. The memory export
//! is looked up again on every read: the module may grow its memory between
//! calls, so a previously resolved slice is never reused.

use wasmtime::{Caller, Extern};

/// Name of the module's linear memory export
pub const MEMORY_EXPORT: &str = "memory";

/// A string read that fell outside the module's memory
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("read of {len} bytes at offset {ptr} exceeds linear memory of {size} bytes")]
    OutOfBounds { ptr: u32, len: u32, size: usize },
}

/// Snapshot of the module's linear memory for the duration of one host call
#[derive(Debug, Clone, Copy)]
pub struct MemoryView<'a> {
    bytes: &'a [u8],
}

impl<'a> MemoryView<'a> {
    /// Resolve the current memory export of the calling instance
    ///
    /// A module without an exported memory yields an empty view.
    pub fn resolve<T: 'static>(caller: &'a mut Caller<'_, T>) -> Self {
        let memory = caller
            .get_export(MEMORY_EXPORT)
            .and_then(Extern::into_memory);
        let caller: &'a Caller<'_, T> = caller;
        let bytes = match memory {
            Some(memory) => memory.data(caller),
            None => &[],
        };
        Self { bytes }
    }

    /// View over an arbitrary byte buffer
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Current memory size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Decode `len` bytes at `ptr` as UTF-8
    ///
    /// Malformed sequences become U+FFFD; only an out-of-range read fails.
    pub fn read_utf8(&self, ptr: u32, len: u32) -> Result<String, MemoryError> {
        let start = ptr as usize;
        let range = start
            .checked_add(len as usize)
            .filter(|&end| end <= self.bytes.len())
            .map(|end| start..end)
            .ok_or(MemoryError::OutOfBounds {
                ptr,
                len,
                size: self.bytes.len(),
            })?;
        Ok(String::from_utf8_lossy(&self.bytes[range]).into_owned())
    }

    /// Like [`read_utf8`](Self::read_utf8), degrading to an empty string
    pub fn read_utf8_or_empty(&self, ptr: u32, len: u32) -> String {
        self.read_utf8(ptr, len).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            String::new()
        })
    }
}
