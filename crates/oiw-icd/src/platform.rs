//! Platform enumeration and platform queries.

use std::ffi::{c_char, c_void, CStr};
use std::ptr;

use tracing::trace;

use crate::bootstrap;
use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Platform, Wrapped};
use crate::types::*;

/// Value of `CL_PLATFORM_ICD_SUFFIX_KHR`.
pub const ICD_SUFFIX: &CStr = c"oiw";

unsafe fn icd_get_platform_ids(
    num_entries: cl_uint,
    platforms: *mut cl_platform_id,
    num_platforms: *mut cl_uint,
) -> CLResult<()> {
    let platform = match bootstrap::platform() {
        Ok(platform) => platform,
        Err(e) => {
            if !num_platforms.is_null() {
                unsafe { *num_platforms = 0 };
            }
            return Err(e);
        }
    };

    if num_entries > 0 && !platforms.is_null() {
        unsafe { *platforms = platform.handle() };
    }
    if !num_platforms.is_null() {
        unsafe { *num_platforms = 1 };
    }
    Ok(())
}

cl_entry! {
    /// ICD discovery entry point; see `clIcdGetPlatformIDsKHR` in the crate root.
    fn cl_icd_get_platform_ids(
        num_entries: cl_uint,
        platforms: *mut cl_platform_id,
        num_platforms: *mut cl_uint,
    ) => icd_get_platform_ids;
}

cl_entry! {
    fn cl_get_platform_ids(
        num_entries: cl_uint,
        platforms: *mut cl_platform_id,
        num_platforms: *mut cl_uint,
    ) => icd_get_platform_ids;
}

unsafe fn get_platform_info(
    platform: cl_platform_id,
    param_name: cl_platform_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let p = unsafe { Platform::ref_from(platform) }?;
    if param_name == CL_PLATFORM_ICD_SUFFIX_KHR {
        let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
        return unsafe { w.write_str(ICD_SUFFIX) };
    }
    let f = real_fn!(p.driver(), clGetPlatformInfo);
    trace!(param_name, "forwarding platform query");
    check(unsafe { f(p.inner, param_name, param_value_size, param_value, param_value_size_ret) })
}

cl_entry! {
    fn cl_get_platform_info(
        platform: cl_platform_id,
        param_name: cl_platform_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_platform_info;
}

unsafe fn unload_platform_compiler(platform: cl_platform_id) -> CLResult<()> {
    let p = unsafe { Platform::ref_from(platform) }?;
    match p.driver().table().clUnloadPlatformCompiler {
        Some(f) => check(unsafe { f(p.inner) }),
        // Unloading is a hint; implementations before 1.2 have nothing to do.
        None => Ok(()),
    }
}

cl_entry! {
    fn cl_unload_platform_compiler(platform: cl_platform_id) => unload_platform_compiler;
}

/// Resolves extension entry points. The only one this driver provides is its
/// own discovery function.
///
/// # Safety
/// `func_name` must be null or a NUL-terminated string.
pub unsafe fn extension_address(func_name: *const c_char) -> *mut c_void {
    if func_name.is_null() {
        return ptr::null_mut();
    }
    match unsafe { CStr::from_ptr(func_name) }.to_bytes() {
        b"clIcdGetPlatformIDsKHR" => cl_icd_get_platform_ids as *const () as *mut c_void,
        _ => ptr::null_mut(),
    }
}

pub unsafe extern "system" fn cl_get_extension_function_address(func_name: *const c_char) -> *mut c_void {
    unsafe { extension_address(func_name) }
}

pub unsafe extern "system" fn cl_get_extension_function_address_for_platform(
    platform: cl_platform_id,
    func_name: *const c_char,
) -> *mut c_void {
    match unsafe { Platform::ref_from(platform) } {
        Ok(_) => unsafe { extension_address(func_name) },
        Err(_) => ptr::null_mut(),
    }
}
