use std::ptr;

use crate::types::{cl_int, CL_SUCCESS};

/// Result of an operation inside the driver; the error is the OpenCL status
/// handed back to the application.
pub type CLResult<T> = Result<T, cl_int>;

/// Failures while locating and opening the real OpenCL implementation.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("no OpenCL library could be opened (last error: {0})")]
    LibraryNotFound(String),

    #[error("{library} exports neither clGetPlatformIDs nor clIcdGetPlatformIDsKHR")]
    NoEntryPoint { library: String },

    #[error("{library} reported no usable platform (status {status})")]
    NoPlatform { library: String, status: cl_int },
}

/// Turns a real status code into a result.
pub fn check(status: cl_int) -> CLResult<()> {
    if status == CL_SUCCESS {
        Ok(())
    } else {
        Err(status)
    }
}

/// Collapses a result into the status an entry point returns.
pub fn status(res: CLResult<()>) -> cl_int {
    match res {
        Ok(()) => CL_SUCCESS,
        Err(e) => e,
    }
}

/// Reports `res` through an optional `errcode_ret` and returns the handle,
/// or null on failure.
///
/// # Safety
/// `errcode_ret` must be null or valid for a write.
pub unsafe fn with_errcode<T>(errcode_ret: *mut cl_int, res: CLResult<*mut T>) -> *mut T {
    let (handle, code) = match res {
        Ok(handle) => (handle, CL_SUCCESS),
        Err(e) => (ptr::null_mut(), e),
    };
    if !errcode_ret.is_null() {
        unsafe { *errcode_ret = code };
    }
    handle
}
