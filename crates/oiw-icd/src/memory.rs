//! Buffers, sub-buffers and images.

use std::ffi::c_void;
use std::ptr;

use tracing::debug;

use crate::callback::{self, MemFn, MemTrampoline};
use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Context, Mem, Wrapped};
use crate::types::*;

unsafe fn create_buffer(
    context: cl_context,
    flags: cl_mem_flags,
    size: usize,
    host_ptr: *mut c_void,
) -> CLResult<cl_mem> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let f = real_fn!(ctx.driver(), clCreateBuffer);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(ctx.inner, flags, size, host_ptr, &mut err) };
    check(err)?;
    Ok(Mem::new(ctx, real, None, None).into_handle())
}

cl_entry! {
    fn cl_create_buffer(
        context: cl_context,
        flags: cl_mem_flags,
        size: usize,
        host_ptr: *mut c_void,
    ) -> cl_mem => create_buffer;
}

unsafe fn create_sub_buffer(
    buffer: cl_mem,
    flags: cl_mem_flags,
    buffer_create_type: cl_buffer_create_type,
    buffer_create_info: *const c_void,
) -> CLResult<cl_mem> {
    let parent = unsafe { Mem::arc_from(buffer) }?;
    let f = real_fn!(parent.driver(), clCreateSubBuffer);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(parent.inner, flags, buffer_create_type, buffer_create_info, &mut err) };
    check(err)?;
    debug!("created sub-buffer");
    Ok(Mem::new(parent.context.clone(), real, Some(parent), None).into_handle())
}

cl_entry! {
    fn cl_create_sub_buffer(
        buffer: cl_mem,
        flags: cl_mem_flags,
        buffer_create_type: cl_buffer_create_type,
        buffer_create_info: *const c_void,
    ) -> cl_mem => create_sub_buffer;
}

unsafe fn create_image(
    context: cl_context,
    flags: cl_mem_flags,
    image_format: *const cl_image_format,
    image_desc: *const cl_image_desc,
    host_ptr: *mut c_void,
) -> CLResult<cl_mem> {
    let ctx = unsafe { Context::arc_from(context) }?;

    // An image made from a buffer names the buffer inside its descriptor.
    let mut desc = None;
    let mut backing = None;
    if !image_desc.is_null() {
        let mut copy = unsafe { *image_desc };
        if !copy.buffer.is_null() {
            let buffer = unsafe { Mem::arc_from(copy.buffer) }?;
            copy.buffer = buffer.inner;
            backing = Some(buffer);
        }
        desc = Some(copy);
    }
    let desc_ptr = desc.as_ref().map_or(ptr::null(), |d| d as *const cl_image_desc);

    let f = real_fn!(ctx.driver(), clCreateImage);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(ctx.inner, flags, image_format, desc_ptr, host_ptr, &mut err) };
    check(err)?;
    Ok(Mem::new(ctx, real, None, backing).into_handle())
}

cl_entry! {
    fn cl_create_image(
        context: cl_context,
        flags: cl_mem_flags,
        image_format: *const cl_image_format,
        image_desc: *const cl_image_desc,
        host_ptr: *mut c_void,
    ) -> cl_mem => create_image;
}

#[allow(clippy::too_many_arguments)]
unsafe fn create_image_2d(
    context: cl_context,
    flags: cl_mem_flags,
    image_format: *const cl_image_format,
    image_width: usize,
    image_height: usize,
    image_row_pitch: usize,
    host_ptr: *mut c_void,
) -> CLResult<cl_mem> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let f = real_fn!(ctx.driver(), clCreateImage2D);
    let mut err = CL_SUCCESS;
    let real = unsafe {
        f(ctx.inner, flags, image_format, image_width, image_height, image_row_pitch, host_ptr, &mut err)
    };
    check(err)?;
    Ok(Mem::new(ctx, real, None, None).into_handle())
}

cl_entry! {
    #[allow(clippy::too_many_arguments)]
    fn cl_create_image_2d(
        context: cl_context,
        flags: cl_mem_flags,
        image_format: *const cl_image_format,
        image_width: usize,
        image_height: usize,
        image_row_pitch: usize,
        host_ptr: *mut c_void,
    ) -> cl_mem => create_image_2d;
}

#[allow(clippy::too_many_arguments)]
unsafe fn create_image_3d(
    context: cl_context,
    flags: cl_mem_flags,
    image_format: *const cl_image_format,
    image_width: usize,
    image_height: usize,
    image_depth: usize,
    image_row_pitch: usize,
    image_slice_pitch: usize,
    host_ptr: *mut c_void,
) -> CLResult<cl_mem> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let f = real_fn!(ctx.driver(), clCreateImage3D);
    let mut err = CL_SUCCESS;
    let real = unsafe {
        f(
            ctx.inner,
            flags,
            image_format,
            image_width,
            image_height,
            image_depth,
            image_row_pitch,
            image_slice_pitch,
            host_ptr,
            &mut err,
        )
    };
    check(err)?;
    Ok(Mem::new(ctx, real, None, None).into_handle())
}

cl_entry! {
    #[allow(clippy::too_many_arguments)]
    fn cl_create_image_3d(
        context: cl_context,
        flags: cl_mem_flags,
        image_format: *const cl_image_format,
        image_width: usize,
        image_height: usize,
        image_depth: usize,
        image_row_pitch: usize,
        image_slice_pitch: usize,
        host_ptr: *mut c_void,
    ) -> cl_mem => create_image_3d;
}

refcount_entries!(Mem, cl_retain_mem_object => clRetainMemObject, cl_release_mem_object => clReleaseMemObject);

unsafe fn get_supported_image_formats(
    context: cl_context,
    flags: cl_mem_flags,
    image_type: cl_mem_object_type,
    num_entries: cl_uint,
    image_formats: *mut cl_image_format,
    num_image_formats: *mut cl_uint,
) -> CLResult<()> {
    let ctx = unsafe { Context::ref_from(context) }?;
    let f = real_fn!(ctx.driver(), clGetSupportedImageFormats);
    check(unsafe { f(ctx.inner, flags, image_type, num_entries, image_formats, num_image_formats) })
}

cl_entry! {
    fn cl_get_supported_image_formats(
        context: cl_context,
        flags: cl_mem_flags,
        image_type: cl_mem_object_type,
        num_entries: cl_uint,
        image_formats: *mut cl_image_format,
        num_image_formats: *mut cl_uint,
    ) => get_supported_image_formats;
}

fn handle_or_null(mem: Option<&std::sync::Arc<Mem>>) -> cl_mem {
    mem.map_or(ptr::null_mut(), |m| m.handle())
}

unsafe fn get_mem_object_info(
    memobj: cl_mem,
    param_name: cl_mem_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let m = unsafe { Mem::ref_from(memobj) }?;
    let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
    match param_name {
        CL_MEM_CONTEXT => unsafe { w.write(m.context.handle()) },
        CL_MEM_ASSOCIATED_MEMOBJECT => unsafe { w.write(handle_or_null(m.parent.as_ref())) },
        _ => {
            let f = real_fn!(m.driver(), clGetMemObjectInfo);
            check(unsafe { f(m.inner, param_name, param_value_size, param_value, param_value_size_ret) })
        }
    }
}

cl_entry! {
    fn cl_get_mem_object_info(
        memobj: cl_mem,
        param_name: cl_mem_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_mem_object_info;
}

unsafe fn get_image_info(
    image: cl_mem,
    param_name: cl_image_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let m = unsafe { Mem::ref_from(image) }?;
    if param_name == CL_IMAGE_BUFFER {
        let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
        return unsafe { w.write(handle_or_null(m.buffer.as_ref())) };
    }
    let f = real_fn!(m.driver(), clGetImageInfo);
    check(unsafe { f(m.inner, param_name, param_value_size, param_value, param_value_size_ret) })
}

cl_entry! {
    fn cl_get_image_info(
        image: cl_mem,
        param_name: cl_image_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_image_info;
}

unsafe fn set_mem_object_destructor_callback(
    memobj: cl_mem,
    pfn_notify: MemDestructorNotify,
    user_data: *mut c_void,
) -> CLResult<()> {
    let m = unsafe { Mem::arc_from(memobj) }?;
    let f = real_fn!(m.driver(), clSetMemObjectDestructorCallback);

    let state = MemTrampoline::arm(&m, pfn_notify, user_data);
    let notify = state.as_ref().map(|_| callback::mem_destructor_notify as MemFn);
    let real_data = if state.is_some() {
        MemTrampoline::real_user_data(&state)
    } else {
        user_data
    };
    let status = unsafe { f(m.inner, notify, real_data) };
    MemTrampoline::settle(&state, status);
    check(status)
}

cl_entry! {
    fn cl_set_mem_object_destructor_callback(
        memobj: cl_mem,
        pfn_notify: MemDestructorNotify,
        user_data: *mut c_void,
    ) => set_mem_object_destructor_callback;
}
