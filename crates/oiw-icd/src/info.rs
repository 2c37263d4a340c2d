//! Writer for the `param_value` / `param_value_size_ret` query convention.

use std::ffi::c_void;
use std::mem;
use std::ptr;

use crate::error::CLResult;
use crate::types::CL_INVALID_VALUE;

/// Output side of an info query, answered locally.
pub struct InfoWriter {
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
}

impl InfoWriter {
    pub fn new(size: usize, value: *mut c_void, size_ret: *mut usize) -> Self {
        Self {
            size,
            value,
            size_ret,
        }
    }

    /// Write `data` following the query contract: a buffer too small fails
    /// with `CL_INVALID_VALUE` before anything is written, a null buffer is
    /// skipped, and the required size is reported whenever asked for.
    ///
    /// A non-null buffer with a size of zero counts as too small for any
    /// non-empty answer; only a null buffer makes a zero size a size query.
    ///
    /// # Safety
    /// `value` must be null or valid for `size` bytes; `size_ret` must be
    /// null or valid for a write.
    pub unsafe fn write_slice<T: Copy>(&self, data: &[T]) -> CLResult<()> {
        let needed = mem::size_of_val(data);
        if (self.size != 0 || !self.value.is_null()) && self.size < needed {
            return Err(CL_INVALID_VALUE);
        }
        if !self.value.is_null() {
            unsafe {
                ptr::copy_nonoverlapping(data.as_ptr().cast::<u8>(), self.value.cast::<u8>(), needed)
            };
        }
        if !self.size_ret.is_null() {
            unsafe { *self.size_ret = needed };
        }
        Ok(())
    }

    /// # Safety
    /// See [`InfoWriter::write_slice`].
    pub unsafe fn write<T: Copy>(&self, value: T) -> CLResult<()> {
        unsafe { self.write_slice(std::slice::from_ref(&value)) }
    }

    /// Writes `s` with its NUL terminator.
    ///
    /// # Safety
    /// See [`InfoWriter::write_slice`].
    pub unsafe fn write_str(&self, s: &std::ffi::CStr) -> CLResult<()> {
        unsafe { self.write_slice(s.to_bytes_with_nul()) }
    }
}
