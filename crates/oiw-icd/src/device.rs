//! Device enumeration and device queries.

use std::ffi::c_void;
use std::slice;
use std::sync::Arc;

use tracing::debug;

use crate::bootstrap;
use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Device, Platform, Wrapped};
use crate::types::*;

unsafe fn get_device_ids(
    platform: cl_platform_id,
    device_type: cl_device_type,
    num_entries: cl_uint,
    devices: *mut cl_device_id,
    num_devices: *mut cl_uint,
) -> CLResult<()> {
    let p = if platform.is_null() {
        Arc::clone(bootstrap::platform()?)
    } else {
        unsafe { Platform::arc_from(platform) }?
    };

    let f = real_fn!(p.driver(), clGetDeviceIDs);
    let mut found: cl_uint = 0;
    check(unsafe { f(p.inner, device_type, num_entries, devices, &mut found) })?;

    if !devices.is_null() {
        let written = num_entries.min(found) as usize;
        for slot in unsafe { slice::from_raw_parts_mut(devices, written) } {
            *slot = p.device(*slot).handle();
        }
        debug!(count = written, "wrapped devices");
    }
    if !num_devices.is_null() {
        unsafe { *num_devices = found };
    }
    Ok(())
}

cl_entry! {
    fn cl_get_device_ids(
        platform: cl_platform_id,
        device_type: cl_device_type,
        num_entries: cl_uint,
        devices: *mut cl_device_id,
        num_devices: *mut cl_uint,
    ) => get_device_ids;
}

unsafe fn get_device_info(
    device: cl_device_id,
    param_name: cl_device_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let d = unsafe { Device::ref_from(device) }?;
    if param_name == CL_DEVICE_PLATFORM {
        let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
        return unsafe { w.write(d.platform.handle()) };
    }
    let f = real_fn!(d.driver(), clGetDeviceInfo);
    check(unsafe { f(d.inner, param_name, param_value_size, param_value, param_value_size_ret) })
}

cl_entry! {
    fn cl_get_device_info(
        device: cl_device_id,
        param_name: cl_device_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_device_info;
}

// Device records belong to the platform for the life of the process, so
// retain and release only reach the real implementation.

unsafe fn retain_device(device: cl_device_id) -> CLResult<()> {
    let d = unsafe { Device::ref_from(device) }?;
    match d.driver().table().clRetainDevice {
        Some(f) => check(unsafe { f(d.inner) }),
        None => Ok(()),
    }
}

unsafe fn release_device(device: cl_device_id) -> CLResult<()> {
    let d = unsafe { Device::ref_from(device) }?;
    match d.driver().table().clReleaseDevice {
        Some(f) => check(unsafe { f(d.inner) }),
        None => Ok(()),
    }
}

cl_entry! {
    fn cl_retain_device(device: cl_device_id) => retain_device;
}

cl_entry! {
    fn cl_release_device(device: cl_device_id) => release_device;
}
