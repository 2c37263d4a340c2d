//! Context creation and context queries.

use std::ffi::c_void;
use std::mem;
use std::ptr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::bootstrap;
use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Context, Device, Platform, Wrapped};
use crate::translate::{self, ContextProperties};
use crate::types::*;

fn properties_ptr(props: &Option<ContextProperties>) -> *const cl_context_properties {
    props.as_ref().map_or(ptr::null(), |p| p.rewritten.as_ptr())
}

unsafe fn create_context(
    properties: *const cl_context_properties,
    num_devices: cl_uint,
    devices: *const cl_device_id,
    pfn_notify: ContextNotify,
    user_data: *mut c_void,
) -> CLResult<cl_context> {
    let props = unsafe { ContextProperties::parse(properties) }?;
    let records = unsafe { translate::records::<Device>(devices, num_devices) }?;
    let Some(first) = records.first() else {
        return Err(CL_INVALID_VALUE);
    };
    let platform = match props.as_ref().and_then(|p| p.platform.clone()) {
        Some(platform) => platform,
        None => Arc::clone(&first.platform),
    };
    let real_devices = translate::inners(&records)?;

    let f = real_fn!(platform.driver(), clCreateContext);
    let mut err = CL_SUCCESS;
    let real = unsafe {
        f(
            properties_ptr(&props),
            num_devices,
            real_devices.as_ptr(),
            pfn_notify,
            user_data,
            &mut err,
        )
    };
    check(err)?;

    debug!(devices = records.len(), "created context");
    let original = props.map(|p| p.original);
    Ok(Context::new(platform, real, records, original).into_handle())
}

cl_entry! {
    fn cl_create_context(
        properties: *const cl_context_properties,
        num_devices: cl_uint,
        devices: *const cl_device_id,
        pfn_notify: ContextNotify,
        user_data: *mut c_void,
    ) -> cl_context => create_context;
}

/// Device records of a context the real implementation created, in the
/// order it reports them.
unsafe fn real_context_devices(platform: &Arc<Platform>, real: cl_context) -> CLResult<Vec<Arc<Device>>> {
    let f = real_fn!(platform.driver(), clGetContextInfo);
    let mut size = 0usize;
    check(unsafe { f(real, CL_CONTEXT_DEVICES, 0, ptr::null_mut(), &mut size) })?;

    let count = size / mem::size_of::<cl_device_id>();
    let mut ids: Vec<cl_device_id> = translate::reserve(count)?;
    ids.resize(count, ptr::null_mut());
    check(unsafe { f(real, CL_CONTEXT_DEVICES, size, ids.as_mut_ptr().cast(), ptr::null_mut()) })?;

    let mut records = translate::reserve(count)?;
    records.extend(ids.into_iter().map(|id| platform.device(id)));
    Ok(records)
}

unsafe fn create_context_from_type(
    properties: *const cl_context_properties,
    device_type: cl_device_type,
    pfn_notify: ContextNotify,
    user_data: *mut c_void,
) -> CLResult<cl_context> {
    let props = unsafe { ContextProperties::parse(properties) }?;
    let platform = match props.as_ref().and_then(|p| p.platform.clone()) {
        Some(platform) => platform,
        None => Arc::clone(bootstrap::platform()?),
    };

    let f = real_fn!(platform.driver(), clCreateContextFromType);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(properties_ptr(&props), device_type, pfn_notify, user_data, &mut err) };
    check(err)?;

    let devices = match unsafe { real_context_devices(&platform, real) } {
        Ok(devices) => devices,
        Err(e) => {
            warn!(status = e, "cannot list devices of new context");
            if let Some(release) = platform.driver().table().clReleaseContext {
                unsafe { release(real) };
            }
            return Err(e);
        }
    };

    debug!(devices = devices.len(), device_type, "created context from type");
    let original = props.map(|p| p.original);
    Ok(Context::new(platform, real, devices, original).into_handle())
}

cl_entry! {
    fn cl_create_context_from_type(
        properties: *const cl_context_properties,
        device_type: cl_device_type,
        pfn_notify: ContextNotify,
        user_data: *mut c_void,
    ) -> cl_context => create_context_from_type;
}

refcount_entries!(Context, cl_retain_context => clRetainContext, cl_release_context => clReleaseContext);

unsafe fn get_context_info(
    context: cl_context,
    param_name: cl_context_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let ctx = unsafe { Context::ref_from(context) }?;
    let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
    match param_name {
        CL_CONTEXT_DEVICES => unsafe { w.write_slice(&ctx.device_handles()) },
        CL_CONTEXT_NUM_DEVICES => unsafe { w.write(ctx.devices.len() as cl_uint) },
        CL_CONTEXT_PROPERTIES => unsafe { w.write_slice(ctx.properties.as_deref().unwrap_or(&[])) },
        _ => {
            let f = real_fn!(ctx.driver(), clGetContextInfo);
            check(unsafe { f(ctx.inner, param_name, param_value_size, param_value, param_value_size_ret) })
        }
    }
}

cl_entry! {
    fn cl_get_context_info(
        context: cl_context,
        param_name: cl_context_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_context_info;
}
