//! Command queues.

use std::ffi::c_void;

use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Context, Device, Queue, Wrapped};
use crate::types::*;

unsafe fn create_command_queue(
    context: cl_context,
    device: cl_device_id,
    properties: cl_command_queue_properties,
) -> CLResult<cl_command_queue> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let dev = unsafe { Device::arc_from(device) }?;

    let f = real_fn!(ctx.driver(), clCreateCommandQueue);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(ctx.inner, dev.inner, properties, &mut err) };
    check(err)?;
    Ok(Queue::new(ctx, dev, real).into_handle())
}

cl_entry! {
    fn cl_create_command_queue(
        context: cl_context,
        device: cl_device_id,
        properties: cl_command_queue_properties,
    ) -> cl_command_queue => create_command_queue;
}

refcount_entries!(Queue, cl_retain_command_queue => clRetainCommandQueue, cl_release_command_queue => clReleaseCommandQueue);

unsafe fn get_command_queue_info(
    command_queue: cl_command_queue,
    param_name: cl_command_queue_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let q = unsafe { Queue::ref_from(command_queue) }?;
    let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
    match param_name {
        CL_QUEUE_CONTEXT => unsafe { w.write(q.context.handle()) },
        CL_QUEUE_DEVICE => unsafe { w.write(q.device.handle()) },
        _ => {
            let f = real_fn!(q.driver(), clGetCommandQueueInfo);
            check(unsafe { f(q.inner, param_name, param_value_size, param_value, param_value_size_ret) })
        }
    }
}

cl_entry! {
    fn cl_get_command_queue_info(
        command_queue: cl_command_queue,
        param_name: cl_command_queue_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_command_queue_info;
}

unsafe fn flush(command_queue: cl_command_queue) -> CLResult<()> {
    let q = unsafe { Queue::ref_from(command_queue) }?;
    let f = real_fn!(q.driver(), clFlush);
    check(unsafe { f(q.inner) })
}

unsafe fn finish(command_queue: cl_command_queue) -> CLResult<()> {
    let q = unsafe { Queue::ref_from(command_queue) }?;
    let f = real_fn!(q.driver(), clFinish);
    check(unsafe { f(q.inner) })
}

cl_entry! {
    fn cl_flush(command_queue: cl_command_queue) => flush;
}

cl_entry! {
    fn cl_finish(command_queue: cl_command_queue) => finish;
}
