//! Enqueued commands.
//!
//! Every command shares one shape: translate the wait list, call the real
//! entry point, and wrap the event it produced. [`enqueue_with`] does the
//! shared part; the functions below only substitute their handle arguments.

#![allow(clippy::too_many_arguments)]

use std::ffi::c_void;
use std::ptr;

use tracing::trace;

use crate::error::{check, CLResult};
use crate::objects::{Event, Kernel, Mem, Queue, Wrapped};
use crate::translate::{self, list_ptr};
use crate::types::*;

/// Runs `call` with the real wait list and, if the application asked for
/// one, a slot for the real event, which is wrapped once `call` succeeds.
///
/// # Safety
/// The wait list and `event` must follow the usual enqueue conventions.
unsafe fn enqueue_with<R>(
    command_queue: cl_command_queue,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
    call: impl FnOnce(&Queue, *const cl_event, *mut cl_event) -> CLResult<R>,
) -> CLResult<R> {
    let q = unsafe { Queue::arc_from(command_queue) }?;
    let waits = unsafe { translate::wait_list(event_wait_list, num_events_in_wait_list) }?;

    let mut real_event: cl_event = ptr::null_mut();
    let event_slot = if event.is_null() {
        ptr::null_mut()
    } else {
        &mut real_event as *mut cl_event
    };
    let res = call(&q, list_ptr(&waits), event_slot)?;

    if !event.is_null() {
        let wrapped = if real_event.is_null() {
            ptr::null_mut()
        } else {
            Event::new(q.context.clone(), Some(q), real_event).into_handle()
        };
        unsafe { *event = wrapped };
    }
    Ok(res)
}

unsafe fn mem_inner(mem: cl_mem) -> CLResult<cl_mem> {
    Ok(unsafe { Mem::ref_from(mem) }?.inner)
}

// ── Buffers ───────────────────────────────────────────────────────────

unsafe fn enqueue_read_buffer(
    command_queue: cl_command_queue,
    buffer: cl_mem,
    blocking_read: cl_bool,
    offset: usize,
    size: usize,
    host_ptr: *mut c_void,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let buffer = unsafe { mem_inner(buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueReadBuffer);
            check(f(q.inner, buffer, blocking_read, offset, size, host_ptr, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_read_buffer(
        command_queue: cl_command_queue,
        buffer: cl_mem,
        blocking_read: cl_bool,
        offset: usize,
        size: usize,
        host_ptr: *mut c_void,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_read_buffer;
}

unsafe fn enqueue_write_buffer(
    command_queue: cl_command_queue,
    buffer: cl_mem,
    blocking_write: cl_bool,
    offset: usize,
    size: usize,
    host_ptr: *const c_void,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let buffer = unsafe { mem_inner(buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueWriteBuffer);
            check(f(q.inner, buffer, blocking_write, offset, size, host_ptr, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_write_buffer(
        command_queue: cl_command_queue,
        buffer: cl_mem,
        blocking_write: cl_bool,
        offset: usize,
        size: usize,
        host_ptr: *const c_void,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_write_buffer;
}

unsafe fn enqueue_copy_buffer(
    command_queue: cl_command_queue,
    src_buffer: cl_mem,
    dst_buffer: cl_mem,
    src_offset: usize,
    dst_offset: usize,
    size: usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let src = unsafe { mem_inner(src_buffer) }?;
    let dst = unsafe { mem_inner(dst_buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueCopyBuffer);
            check(f(q.inner, src, dst, src_offset, dst_offset, size, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_copy_buffer(
        command_queue: cl_command_queue,
        src_buffer: cl_mem,
        dst_buffer: cl_mem,
        src_offset: usize,
        dst_offset: usize,
        size: usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_copy_buffer;
}

unsafe fn enqueue_read_buffer_rect(
    command_queue: cl_command_queue,
    buffer: cl_mem,
    blocking_read: cl_bool,
    buffer_origin: *const usize,
    host_origin: *const usize,
    region: *const usize,
    buffer_row_pitch: usize,
    buffer_slice_pitch: usize,
    host_row_pitch: usize,
    host_slice_pitch: usize,
    host_ptr: *mut c_void,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let buffer = unsafe { mem_inner(buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueReadBufferRect);
            check(f(
                q.inner,
                buffer,
                blocking_read,
                buffer_origin,
                host_origin,
                region,
                buffer_row_pitch,
                buffer_slice_pitch,
                host_row_pitch,
                host_slice_pitch,
                host_ptr,
                num_events_in_wait_list,
                wait,
                ev,
            ))
        })
    }
}

cl_entry! {
    fn cl_enqueue_read_buffer_rect(
        command_queue: cl_command_queue,
        buffer: cl_mem,
        blocking_read: cl_bool,
        buffer_origin: *const usize,
        host_origin: *const usize,
        region: *const usize,
        buffer_row_pitch: usize,
        buffer_slice_pitch: usize,
        host_row_pitch: usize,
        host_slice_pitch: usize,
        host_ptr: *mut c_void,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_read_buffer_rect;
}

unsafe fn enqueue_write_buffer_rect(
    command_queue: cl_command_queue,
    buffer: cl_mem,
    blocking_write: cl_bool,
    buffer_origin: *const usize,
    host_origin: *const usize,
    region: *const usize,
    buffer_row_pitch: usize,
    buffer_slice_pitch: usize,
    host_row_pitch: usize,
    host_slice_pitch: usize,
    host_ptr: *const c_void,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let buffer = unsafe { mem_inner(buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueWriteBufferRect);
            check(f(
                q.inner,
                buffer,
                blocking_write,
                buffer_origin,
                host_origin,
                region,
                buffer_row_pitch,
                buffer_slice_pitch,
                host_row_pitch,
                host_slice_pitch,
                host_ptr,
                num_events_in_wait_list,
                wait,
                ev,
            ))
        })
    }
}

cl_entry! {
    fn cl_enqueue_write_buffer_rect(
        command_queue: cl_command_queue,
        buffer: cl_mem,
        blocking_write: cl_bool,
        buffer_origin: *const usize,
        host_origin: *const usize,
        region: *const usize,
        buffer_row_pitch: usize,
        buffer_slice_pitch: usize,
        host_row_pitch: usize,
        host_slice_pitch: usize,
        host_ptr: *const c_void,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_write_buffer_rect;
}

unsafe fn enqueue_copy_buffer_rect(
    command_queue: cl_command_queue,
    src_buffer: cl_mem,
    dst_buffer: cl_mem,
    src_origin: *const usize,
    dst_origin: *const usize,
    region: *const usize,
    src_row_pitch: usize,
    src_slice_pitch: usize,
    dst_row_pitch: usize,
    dst_slice_pitch: usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let src = unsafe { mem_inner(src_buffer) }?;
    let dst = unsafe { mem_inner(dst_buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueCopyBufferRect);
            check(f(
                q.inner,
                src,
                dst,
                src_origin,
                dst_origin,
                region,
                src_row_pitch,
                src_slice_pitch,
                dst_row_pitch,
                dst_slice_pitch,
                num_events_in_wait_list,
                wait,
                ev,
            ))
        })
    }
}

cl_entry! {
    fn cl_enqueue_copy_buffer_rect(
        command_queue: cl_command_queue,
        src_buffer: cl_mem,
        dst_buffer: cl_mem,
        src_origin: *const usize,
        dst_origin: *const usize,
        region: *const usize,
        src_row_pitch: usize,
        src_slice_pitch: usize,
        dst_row_pitch: usize,
        dst_slice_pitch: usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_copy_buffer_rect;
}

unsafe fn enqueue_fill_buffer(
    command_queue: cl_command_queue,
    buffer: cl_mem,
    pattern: *const c_void,
    pattern_size: usize,
    offset: usize,
    size: usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let buffer = unsafe { mem_inner(buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueFillBuffer);
            check(f(q.inner, buffer, pattern, pattern_size, offset, size, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_fill_buffer(
        command_queue: cl_command_queue,
        buffer: cl_mem,
        pattern: *const c_void,
        pattern_size: usize,
        offset: usize,
        size: usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_fill_buffer;
}

// ── Images ────────────────────────────────────────────────────────────

unsafe fn enqueue_read_image(
    command_queue: cl_command_queue,
    image: cl_mem,
    blocking_read: cl_bool,
    origin: *const usize,
    region: *const usize,
    row_pitch: usize,
    slice_pitch: usize,
    host_ptr: *mut c_void,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let image = unsafe { mem_inner(image) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueReadImage);
            check(f(
                q.inner,
                image,
                blocking_read,
                origin,
                region,
                row_pitch,
                slice_pitch,
                host_ptr,
                num_events_in_wait_list,
                wait,
                ev,
            ))
        })
    }
}

cl_entry! {
    fn cl_enqueue_read_image(
        command_queue: cl_command_queue,
        image: cl_mem,
        blocking_read: cl_bool,
        origin: *const usize,
        region: *const usize,
        row_pitch: usize,
        slice_pitch: usize,
        host_ptr: *mut c_void,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_read_image;
}

unsafe fn enqueue_write_image(
    command_queue: cl_command_queue,
    image: cl_mem,
    blocking_write: cl_bool,
    origin: *const usize,
    region: *const usize,
    input_row_pitch: usize,
    input_slice_pitch: usize,
    host_ptr: *const c_void,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let image = unsafe { mem_inner(image) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueWriteImage);
            check(f(
                q.inner,
                image,
                blocking_write,
                origin,
                region,
                input_row_pitch,
                input_slice_pitch,
                host_ptr,
                num_events_in_wait_list,
                wait,
                ev,
            ))
        })
    }
}

cl_entry! {
    fn cl_enqueue_write_image(
        command_queue: cl_command_queue,
        image: cl_mem,
        blocking_write: cl_bool,
        origin: *const usize,
        region: *const usize,
        input_row_pitch: usize,
        input_slice_pitch: usize,
        host_ptr: *const c_void,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_write_image;
}

unsafe fn enqueue_copy_image(
    command_queue: cl_command_queue,
    src_image: cl_mem,
    dst_image: cl_mem,
    src_origin: *const usize,
    dst_origin: *const usize,
    region: *const usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let src = unsafe { mem_inner(src_image) }?;
    let dst = unsafe { mem_inner(dst_image) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueCopyImage);
            check(f(q.inner, src, dst, src_origin, dst_origin, region, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_copy_image(
        command_queue: cl_command_queue,
        src_image: cl_mem,
        dst_image: cl_mem,
        src_origin: *const usize,
        dst_origin: *const usize,
        region: *const usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_copy_image;
}

unsafe fn enqueue_fill_image(
    command_queue: cl_command_queue,
    image: cl_mem,
    fill_color: *const c_void,
    origin: *const usize,
    region: *const usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let image = unsafe { mem_inner(image) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueFillImage);
            check(f(q.inner, image, fill_color, origin, region, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_fill_image(
        command_queue: cl_command_queue,
        image: cl_mem,
        fill_color: *const c_void,
        origin: *const usize,
        region: *const usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_fill_image;
}

unsafe fn enqueue_copy_image_to_buffer(
    command_queue: cl_command_queue,
    src_image: cl_mem,
    dst_buffer: cl_mem,
    src_origin: *const usize,
    region: *const usize,
    dst_offset: usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let src = unsafe { mem_inner(src_image) }?;
    let dst = unsafe { mem_inner(dst_buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueCopyImageToBuffer);
            check(f(q.inner, src, dst, src_origin, region, dst_offset, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_copy_image_to_buffer(
        command_queue: cl_command_queue,
        src_image: cl_mem,
        dst_buffer: cl_mem,
        src_origin: *const usize,
        region: *const usize,
        dst_offset: usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_copy_image_to_buffer;
}

unsafe fn enqueue_copy_buffer_to_image(
    command_queue: cl_command_queue,
    src_buffer: cl_mem,
    dst_image: cl_mem,
    src_offset: usize,
    dst_origin: *const usize,
    region: *const usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let src = unsafe { mem_inner(src_buffer) }?;
    let dst = unsafe { mem_inner(dst_image) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueCopyBufferToImage);
            check(f(q.inner, src, dst, src_offset, dst_origin, region, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_copy_buffer_to_image(
        command_queue: cl_command_queue,
        src_buffer: cl_mem,
        dst_image: cl_mem,
        src_offset: usize,
        dst_origin: *const usize,
        region: *const usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_copy_buffer_to_image;
}

// ── Mapping ───────────────────────────────────────────────────────────

unsafe fn enqueue_map_buffer(
    command_queue: cl_command_queue,
    buffer: cl_mem,
    blocking_map: cl_bool,
    map_flags: cl_map_flags,
    offset: usize,
    size: usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<*mut c_void> {
    let buffer = unsafe { mem_inner(buffer) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueMapBuffer);
            let mut err = CL_SUCCESS;
            let mapped = f(
                q.inner,
                buffer,
                blocking_map,
                map_flags,
                offset,
                size,
                num_events_in_wait_list,
                wait,
                ev,
                &mut err,
            );
            check(err).map(|()| mapped)
        })
    }
}

cl_entry! {
    fn cl_enqueue_map_buffer(
        command_queue: cl_command_queue,
        buffer: cl_mem,
        blocking_map: cl_bool,
        map_flags: cl_map_flags,
        offset: usize,
        size: usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) -> *mut c_void => enqueue_map_buffer;
}

unsafe fn enqueue_map_image(
    command_queue: cl_command_queue,
    image: cl_mem,
    blocking_map: cl_bool,
    map_flags: cl_map_flags,
    origin: *const usize,
    region: *const usize,
    image_row_pitch: *mut usize,
    image_slice_pitch: *mut usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<*mut c_void> {
    let image = unsafe { mem_inner(image) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueMapImage);
            let mut err = CL_SUCCESS;
            let mapped = f(
                q.inner,
                image,
                blocking_map,
                map_flags,
                origin,
                region,
                image_row_pitch,
                image_slice_pitch,
                num_events_in_wait_list,
                wait,
                ev,
                &mut err,
            );
            check(err).map(|()| mapped)
        })
    }
}

cl_entry! {
    fn cl_enqueue_map_image(
        command_queue: cl_command_queue,
        image: cl_mem,
        blocking_map: cl_bool,
        map_flags: cl_map_flags,
        origin: *const usize,
        region: *const usize,
        image_row_pitch: *mut usize,
        image_slice_pitch: *mut usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) -> *mut c_void => enqueue_map_image;
}

unsafe fn enqueue_unmap_mem_object(
    command_queue: cl_command_queue,
    memobj: cl_mem,
    mapped_ptr: *mut c_void,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let memobj = unsafe { mem_inner(memobj) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueUnmapMemObject);
            check(f(q.inner, memobj, mapped_ptr, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_unmap_mem_object(
        command_queue: cl_command_queue,
        memobj: cl_mem,
        mapped_ptr: *mut c_void,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_unmap_mem_object;
}

unsafe fn enqueue_migrate_mem_objects(
    command_queue: cl_command_queue,
    num_mem_objects: cl_uint,
    mem_objects: *const cl_mem,
    flags: cl_mem_migration_flags,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let objects = unsafe { translate::inner_handles::<Mem>(mem_objects, num_mem_objects) }?;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueMigrateMemObjects);
            check(f(q.inner, num_mem_objects, list_ptr(&objects), flags, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_migrate_mem_objects(
        command_queue: cl_command_queue,
        num_mem_objects: cl_uint,
        mem_objects: *const cl_mem,
        flags: cl_mem_migration_flags,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_migrate_mem_objects;
}

// ── Kernels ───────────────────────────────────────────────────────────

unsafe fn enqueue_nd_range_kernel(
    command_queue: cl_command_queue,
    kernel: cl_kernel,
    work_dim: cl_uint,
    global_work_offset: *const usize,
    global_work_size: *const usize,
    local_work_size: *const usize,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let kernel = unsafe { Kernel::ref_from(kernel) }?.inner;
    trace!(work_dim, "enqueue nd-range kernel");
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueNDRangeKernel);
            check(f(
                q.inner,
                kernel,
                work_dim,
                global_work_offset,
                global_work_size,
                local_work_size,
                num_events_in_wait_list,
                wait,
                ev,
            ))
        })
    }
}

cl_entry! {
    fn cl_enqueue_nd_range_kernel(
        command_queue: cl_command_queue,
        kernel: cl_kernel,
        work_dim: cl_uint,
        global_work_offset: *const usize,
        global_work_size: *const usize,
        local_work_size: *const usize,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_nd_range_kernel;
}

unsafe fn enqueue_task(
    command_queue: cl_command_queue,
    kernel: cl_kernel,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    let kernel = unsafe { Kernel::ref_from(kernel) }?.inner;
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueTask);
            check(f(q.inner, kernel, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_task(
        command_queue: cl_command_queue,
        kernel: cl_kernel,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_task;
}

// ── Synchronisation ───────────────────────────────────────────────────

unsafe fn enqueue_marker(command_queue: cl_command_queue, event: *mut cl_event) -> CLResult<()> {
    unsafe {
        enqueue_with(command_queue, 0, ptr::null(), event, |q, _, ev| {
            let f = real_fn!(q.driver(), clEnqueueMarker);
            check(f(q.inner, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_marker(command_queue: cl_command_queue, event: *mut cl_event) => enqueue_marker;
}

unsafe fn enqueue_wait_for_events(
    command_queue: cl_command_queue,
    num_events: cl_uint,
    event_list: *const cl_event,
) -> CLResult<()> {
    let q = unsafe { Queue::ref_from(command_queue) }?;
    let events = unsafe { translate::inner_handles::<Event>(event_list, num_events) }?;
    let f = real_fn!(q.driver(), clEnqueueWaitForEvents);
    check(unsafe { f(q.inner, num_events, list_ptr(&events)) })
}

cl_entry! {
    fn cl_enqueue_wait_for_events(
        command_queue: cl_command_queue,
        num_events: cl_uint,
        event_list: *const cl_event,
    ) => enqueue_wait_for_events;
}

unsafe fn enqueue_barrier(command_queue: cl_command_queue) -> CLResult<()> {
    let q = unsafe { Queue::ref_from(command_queue) }?;
    let f = real_fn!(q.driver(), clEnqueueBarrier);
    check(unsafe { f(q.inner) })
}

cl_entry! {
    fn cl_enqueue_barrier(command_queue: cl_command_queue) => enqueue_barrier;
}

unsafe fn enqueue_marker_with_wait_list(
    command_queue: cl_command_queue,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueMarkerWithWaitList);
            check(f(q.inner, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_marker_with_wait_list(
        command_queue: cl_command_queue,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_marker_with_wait_list;
}

unsafe fn enqueue_barrier_with_wait_list(
    command_queue: cl_command_queue,
    num_events_in_wait_list: cl_uint,
    event_wait_list: *const cl_event,
    event: *mut cl_event,
) -> CLResult<()> {
    unsafe {
        enqueue_with(command_queue, num_events_in_wait_list, event_wait_list, event, |q, wait, ev| {
            let f = real_fn!(q.driver(), clEnqueueBarrierWithWaitList);
            check(f(q.inner, num_events_in_wait_list, wait, ev))
        })
    }
}

cl_entry! {
    fn cl_enqueue_barrier_with_wait_list(
        command_queue: cl_command_queue,
        num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event,
        event: *mut cl_event,
    ) => enqueue_barrier_with_wait_list;
}
