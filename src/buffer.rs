//! The ownership-transfer allocator and its matching deallocator.
//!
//! Buffers handed to foreign callers live in the C heap (`malloc`/`free`) rather
//! than in Rust's allocator: the caller may be another runtime that cannot run
//! Rust destructors, so ownership is a protocol. `OwnedBuffer` is the only type
//! that can hold such storage on the Rust side. It is never `Clone`; it either
//! frees its storage on drop or gives it away exactly once through `into_raw`.

use std::mem::ManuallyDrop;
use std::ptr::NonNull;

use crate::error::{SpzError, SpzResult};

/// A `malloc`ed byte buffer with a single owner.
#[derive(Debug)]
pub struct OwnedBuffer {
    ptr: NonNull<u8>,
    len: usize,
}

// The storage is plain bytes exclusively owned by this handle.
unsafe impl Send for OwnedBuffer {}

impl OwnedBuffer {
    /// Allocates exactly `bytes.len()` bytes and copies `bytes` into them.
    ///
    /// A zero-length payload still receives a (one byte) allocation so the
    /// pointer handed out is non-null and can be released like any other.
    pub fn copy_from(bytes: &[u8]) -> SpzResult<Self> {
        let len = bytes.len();
        let raw = unsafe { libc::malloc(len.max(1)) }.cast::<u8>();
        let ptr = NonNull::new(raw).ok_or_else(|| {
            SpzError::MemoryAllocation(format!("malloc of {} bytes returned null", len))
        })?;
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), len);
        }
        Ok(Self { ptr, len })
    }

    /// Gives up ownership. The caller must eventually pass the pointer to `release`.
    pub fn into_raw(self) -> (*mut u8, usize) {
        let this = ManuallyDrop::new(self);
        (this.ptr.as_ptr(), this.len)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for OwnedBuffer {
    fn drop(&mut self) {
        unsafe { libc::free(self.ptr.as_ptr().cast()) }
    }
}

/// Releases storage handed out by `OwnedBuffer::into_raw`. Null is a no-op.
///
/// # Safety
/// A non-null `ptr` must come from `into_raw` and must not be used afterwards.
/// Releasing twice, or releasing a foreign pointer, is undefined behaviour; no
/// bookkeeping is kept to detect it.
pub unsafe fn release(ptr: *mut u8) {
    if ptr.is_null() {
        return;
    }
    libc::free(ptr.cast());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_is_exact_and_verbatim() {
        let payload: Vec<u8> = (0..=255u8).collect();
        let buffer = OwnedBuffer::copy_from(&payload).unwrap();
        assert_eq!(buffer.len(), 256);
        assert_eq!(buffer.as_slice(), payload.as_slice());
    }

    #[test]
    fn zero_length_buffer_is_non_null() {
        let buffer = OwnedBuffer::copy_from(&[]).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.as_slice(), &[] as &[u8]);

        let (ptr, len) = buffer.into_raw();
        assert!(!ptr.is_null());
        assert_eq!(len, 0);
        unsafe { release(ptr) };
    }

    #[test]
    fn into_raw_hands_over_the_bytes() {
        let buffer = OwnedBuffer::copy_from(b"gaussian").unwrap();
        let (ptr, len) = buffer.into_raw();

        assert_eq!(len, 8);
        assert_eq!(unsafe { std::slice::from_raw_parts(ptr, len) }, b"gaussian");
        unsafe { release(ptr) };
    }

    #[test]
    fn release_null_is_noop() {
        unsafe { release(std::ptr::null_mut()) };
    }
}
