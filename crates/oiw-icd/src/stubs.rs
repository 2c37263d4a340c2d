//! Entry points this driver does not support.
//!
//! Sub-devices, OpenGL sharing, native kernels and the deprecated queue
//! property setter all fail with `CL_INVALID_OPERATION` without reaching
//! the real implementation. Handle-returning variants report the status
//! through `errcode_ret` and return null.

use std::ffi::c_void;
use std::ptr;

use crate::types::*;

unsafe fn unsupported<T>(errcode_ret: *mut cl_int) -> *mut T {
    if !errcode_ret.is_null() {
        unsafe { *errcode_ret = CL_INVALID_OPERATION };
    }
    ptr::null_mut()
}

// ── Queues & devices ─────────────────────────────────────────────────

pub unsafe extern "system" fn cl_set_command_queue_property(_queue: cl_command_queue, _properties: cl_command_queue_properties, _enable: cl_bool, _old_properties: *mut cl_command_queue_properties) -> cl_int { CL_INVALID_OPERATION }
#[allow(clippy::too_many_arguments)]
pub unsafe extern "system" fn cl_enqueue_native_kernel(_queue: cl_command_queue, _user_func: NativeKernelFn, _args: *mut c_void, _cb_args: usize, _num_mem_objects: cl_uint, _mem_list: *const cl_mem, _args_mem_loc: *const *const c_void, _num_events: cl_uint, _wait_list: *const cl_event, _event: *mut cl_event) -> cl_int { CL_INVALID_OPERATION }
pub unsafe extern "system" fn cl_create_sub_devices(_device: cl_device_id, _properties: *const cl_device_partition_property, _num_devices: cl_uint, _out_devices: *mut cl_device_id, _num_devices_ret: *mut cl_uint) -> cl_int { CL_INVALID_OPERATION }
pub unsafe extern "system" fn cl_create_sub_devices_ext(_device: cl_device_id, _properties: *const cl_device_partition_property_ext, _num_entries: cl_uint, _out_devices: *mut cl_device_id, _num_devices: *mut cl_uint) -> cl_int { CL_INVALID_OPERATION }

// ── OpenGL sharing ───────────────────────────────────────────────────

pub unsafe extern "system" fn cl_create_from_gl_buffer(_context: cl_context, _flags: cl_mem_flags, _bufobj: cl_GLuint, errcode_ret: *mut cl_int) -> cl_mem { unsafe { unsupported(errcode_ret) } }
pub unsafe extern "system" fn cl_create_from_gl_texture(_context: cl_context, _flags: cl_mem_flags, _target: cl_GLenum, _miplevel: cl_GLint, _texture: cl_GLuint, errcode_ret: *mut cl_int) -> cl_mem { unsafe { unsupported(errcode_ret) } }
pub unsafe extern "system" fn cl_create_from_gl_renderbuffer(_context: cl_context, _flags: cl_mem_flags, _renderbuffer: cl_GLuint, errcode_ret: *mut cl_int) -> cl_mem { unsafe { unsupported(errcode_ret) } }
pub unsafe extern "system" fn cl_get_gl_object_info(_memobj: cl_mem, _gl_object_type: *mut cl_gl_object_type, _gl_object_name: *mut cl_GLuint) -> cl_int { CL_INVALID_OPERATION }
pub unsafe extern "system" fn cl_get_gl_texture_info(_memobj: cl_mem, _param_name: cl_gl_texture_info, _param_value_size: usize, _param_value: *mut c_void, _param_value_size_ret: *mut usize) -> cl_int { CL_INVALID_OPERATION }
pub unsafe extern "system" fn cl_enqueue_acquire_gl_objects(_queue: cl_command_queue, _num_objects: cl_uint, _mem_objects: *const cl_mem, _num_events: cl_uint, _wait_list: *const cl_event, _event: *mut cl_event) -> cl_int { CL_INVALID_OPERATION }
pub unsafe extern "system" fn cl_enqueue_release_gl_objects(_queue: cl_command_queue, _num_objects: cl_uint, _mem_objects: *const cl_mem, _num_events: cl_uint, _wait_list: *const cl_event, _event: *mut cl_event) -> cl_int { CL_INVALID_OPERATION }
pub unsafe extern "system" fn cl_get_gl_context_info_khr(_properties: *const cl_context_properties, _param_name: cl_gl_context_info, _param_value_size: usize, _param_value: *mut c_void, _param_value_size_ret: *mut usize) -> cl_int { CL_INVALID_OPERATION }
pub unsafe extern "system" fn cl_create_event_from_gl_sync_khr(_context: cl_context, _sync: cl_GLsync, errcode_ret: *mut cl_int) -> cl_event { unsafe { unsupported(errcode_ret) } }
