//! Events, user events and event callbacks.

use std::ffi::c_void;
use std::ptr;

use tracing::trace;

use crate::callback::{self, EventFn, EventTrampoline};
use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Context, Event, Wrapped};
use crate::translate;
use crate::types::*;

unsafe fn wait_for_events(num_events: cl_uint, event_list: *const cl_event) -> CLResult<()> {
    // Waiting on nothing is complete without asking the real implementation.
    if num_events == 0 {
        return Ok(());
    }
    if event_list.is_null() {
        return Err(CL_INVALID_VALUE);
    }
    let first = unsafe { Event::ref_from(*event_list) }?;
    let real = unsafe { translate::inner_handles::<Event>(event_list, num_events) }?;
    trace!(count = real.len(), "waiting for events");

    let f = real_fn!(first.driver(), clWaitForEvents);
    check(unsafe { f(num_events, real.as_ptr()) })
}

cl_entry! {
    fn cl_wait_for_events(num_events: cl_uint, event_list: *const cl_event) => wait_for_events;
}

unsafe fn get_event_info(
    event: cl_event,
    param_name: cl_event_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let e = unsafe { Event::ref_from(event) }?;
    let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
    match param_name {
        CL_EVENT_CONTEXT => unsafe { w.write(e.context.handle()) },
        CL_EVENT_COMMAND_QUEUE => {
            let queue = e.queue.as_ref().map_or(ptr::null_mut(), |q| q.handle());
            unsafe { w.write(queue) }
        }
        _ => {
            let f = real_fn!(e.driver(), clGetEventInfo);
            check(unsafe { f(e.inner, param_name, param_value_size, param_value, param_value_size_ret) })
        }
    }
}

cl_entry! {
    fn cl_get_event_info(
        event: cl_event,
        param_name: cl_event_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_event_info;
}

refcount_entries!(Event, cl_retain_event => clRetainEvent, cl_release_event => clReleaseEvent);

unsafe fn get_event_profiling_info(
    event: cl_event,
    param_name: cl_profiling_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let e = unsafe { Event::ref_from(event) }?;
    let f = real_fn!(e.driver(), clGetEventProfilingInfo);
    check(unsafe { f(e.inner, param_name, param_value_size, param_value, param_value_size_ret) })
}

cl_entry! {
    fn cl_get_event_profiling_info(
        event: cl_event,
        param_name: cl_profiling_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_event_profiling_info;
}

unsafe fn set_event_callback(
    event: cl_event,
    command_exec_callback_type: cl_int,
    pfn_notify: EventNotify,
    user_data: *mut c_void,
) -> CLResult<()> {
    let e = unsafe { Event::arc_from(event) }?;
    let f = real_fn!(e.driver(), clSetEventCallback);

    let state = EventTrampoline::arm(&e, pfn_notify, user_data);
    let notify = state.as_ref().map(|_| callback::event_notify as EventFn);
    let real_data = if state.is_some() {
        EventTrampoline::real_user_data(&state)
    } else {
        user_data
    };
    let status = unsafe { f(e.inner, command_exec_callback_type, notify, real_data) };
    EventTrampoline::settle(&state, status);
    check(status)
}

cl_entry! {
    fn cl_set_event_callback(
        event: cl_event,
        command_exec_callback_type: cl_int,
        pfn_notify: EventNotify,
        user_data: *mut c_void,
    ) => set_event_callback;
}

unsafe fn create_user_event(context: cl_context) -> CLResult<cl_event> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let f = real_fn!(ctx.driver(), clCreateUserEvent);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(ctx.inner, &mut err) };
    check(err)?;
    Ok(Event::new(ctx, None, real).into_handle())
}

cl_entry! {
    fn cl_create_user_event(context: cl_context) -> cl_event => create_user_event;
}

unsafe fn set_user_event_status(event: cl_event, execution_status: cl_int) -> CLResult<()> {
    let e = unsafe { Event::ref_from(event) }?;
    let f = real_fn!(e.driver(), clSetUserEventStatus);
    check(unsafe { f(e.inner, execution_status) })
}

cl_entry! {
    fn cl_set_user_event_status(event: cl_event, execution_status: cl_int) => set_user_event_status;
}
