//! OIW OpenCL ICD (Installable Client Driver)
//!
//! This library registers with the OpenCL ICD loader as a platform of its
//! own and forwards every call to a real OpenCL implementation, loaded at
//! run time. Each handle the real implementation returns is wrapped in a
//! record of this driver, so the loader routes every later call on it back
//! through [`DISPATCH`].

#[macro_use]
mod entry;

pub mod bootstrap;
pub mod callback;
pub mod context;
pub mod device;
pub mod dispatch;
pub mod driver;
pub mod enqueue;
pub mod error;
pub mod event;
pub mod info;
pub mod kernel;
pub mod memory;
pub mod objects;
pub mod platform;
pub mod program;
pub mod queue;
pub mod sampler;
pub mod stubs;
pub mod translate;
pub mod types;

use std::ffi::{c_char, c_void};

pub use bootstrap::{set_real_driver, PlatformCell};
pub use dispatch::{IcdDispatch, DISPATCH};
pub use driver::RealDriver;

use types::{cl_int, cl_platform_id, cl_uint};

// ── ICD discovery ───────────────────────────────────────────

/// Reports this driver's single platform to the ICD loader.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn clIcdGetPlatformIDsKHR(
    num_entries: cl_uint,
    platforms: *mut cl_platform_id,
    num_platforms: *mut cl_uint,
) -> cl_int {
    unsafe { platform::cl_icd_get_platform_ids(num_entries, platforms, num_platforms) }
}

/// Resolves extension entry points for the loader.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn clGetExtensionFunctionAddress(func_name: *const c_char) -> *mut c_void {
    unsafe { platform::extension_address(func_name) }
}
