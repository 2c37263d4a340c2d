//! Kernels and kernel arguments.
//!
//! Memory objects and samplers are passed to `clSetKernelArg` by value, as
//! the bytes of their handle. Those bytes hold a wrapped handle here, so the
//! argument's declared kind is looked up in the real kernel's metadata and
//! the real handle is passed instead.

use std::ffi::{c_char, c_void};
use std::mem;
use std::ptr;
use std::slice;

use tracing::{debug, trace, warn};

use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Device, Kernel, Mem, Program, Sampler, Wrapped};
use crate::translate;
use crate::types::*;

unsafe fn create_kernel(program: cl_program, kernel_name: *const c_char) -> CLResult<cl_kernel> {
    let prog = unsafe { Program::arc_from(program) }?;
    let f = real_fn!(prog.driver(), clCreateKernel);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(prog.inner(), kernel_name, &mut err) };
    check(err)?;
    Ok(Kernel::new(prog, real).into_handle())
}

cl_entry! {
    fn cl_create_kernel(program: cl_program, kernel_name: *const c_char) -> cl_kernel => create_kernel;
}

unsafe fn create_kernels_in_program(
    program: cl_program,
    num_kernels: cl_uint,
    kernels: *mut cl_kernel,
    num_kernels_ret: *mut cl_uint,
) -> CLResult<()> {
    let prog = unsafe { Program::arc_from(program) }?;
    let f = real_fn!(prog.driver(), clCreateKernelsInProgram);
    let mut found: cl_uint = 0;
    check(unsafe { f(prog.inner(), num_kernels, kernels, &mut found) })?;

    if !kernels.is_null() {
        let written = num_kernels.min(found) as usize;
        for slot in unsafe { slice::from_raw_parts_mut(kernels, written) } {
            *slot = Kernel::new(prog.clone(), *slot).into_handle();
        }
        debug!(count = written, "created kernels in program");
    }
    if !num_kernels_ret.is_null() {
        unsafe { *num_kernels_ret = found };
    }
    Ok(())
}

cl_entry! {
    fn cl_create_kernels_in_program(
        program: cl_program,
        num_kernels: cl_uint,
        kernels: *mut cl_kernel,
        num_kernels_ret: *mut cl_uint,
    ) => create_kernels_in_program;
}

refcount_entries!(Kernel, cl_retain_kernel => clRetainKernel, cl_release_kernel => clReleaseKernel);

/// What an argument holds, as far as handle translation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgKind {
    Mem,
    Sampler,
    Plain,
}

/// Reads the argument's address qualifier and type name from the real
/// kernel.
unsafe fn arg_kind(k: &Kernel, arg_index: cl_uint) -> CLResult<ArgKind> {
    let f = real_fn!(k.driver(), clGetKernelArgInfo);

    let mut qualifier: cl_kernel_arg_address_qualifier = 0;
    check(unsafe {
        f(
            k.inner,
            arg_index,
            CL_KERNEL_ARG_ADDRESS_QUALIFIER,
            mem::size_of_val(&qualifier),
            (&mut qualifier as *mut cl_kernel_arg_address_qualifier).cast(),
            ptr::null_mut(),
        )
    })?;
    if qualifier == CL_KERNEL_ARG_ADDRESS_GLOBAL || qualifier == CL_KERNEL_ARG_ADDRESS_CONSTANT {
        return Ok(ArgKind::Mem);
    }

    let mut size = 0usize;
    check(unsafe { f(k.inner, arg_index, CL_KERNEL_ARG_TYPE_NAME, 0, ptr::null_mut(), &mut size) })?;
    let mut name: Vec<u8> = translate::reserve(size)?;
    name.resize(size, 0);
    check(unsafe {
        f(
            k.inner,
            arg_index,
            CL_KERNEL_ARG_TYPE_NAME,
            size,
            name.as_mut_ptr().cast(),
            ptr::null_mut(),
        )
    })?;
    let name = name.split(|&b| b == 0).next().unwrap_or(&[]);
    if name == b"sampler_t" {
        Ok(ArgKind::Sampler)
    } else {
        Ok(ArgKind::Plain)
    }
}

/// The handle stored in an argument value of handle size, if it is one.
unsafe fn arg_handle<H>(arg_size: usize, arg_value: *const c_void) -> Option<*mut H> {
    if arg_value.is_null() || arg_size != mem::size_of::<*mut H>() {
        return None;
    }
    Some(unsafe { ptr::read_unaligned(arg_value.cast::<*mut H>()) })
}

unsafe fn set_kernel_arg(
    kernel: cl_kernel,
    arg_index: cl_uint,
    arg_size: usize,
    arg_value: *const c_void,
) -> CLResult<()> {
    let k = unsafe { Kernel::ref_from(kernel) }?;
    let f = real_fn!(k.driver(), clSetKernelArg);

    let kind = match unsafe { arg_kind(k, arg_index) } {
        Ok(kind) => kind,
        Err(status) => {
            warn!(arg_index, status, "kernel argument info unavailable, forwarding argument as is");
            ArgKind::Plain
        }
    };
    trace!(arg_index, ?kind, "set kernel arg");

    match kind {
        ArgKind::Mem => {
            if let Some(handle) = unsafe { arg_handle::<_cl_mem>(arg_size, arg_value) } {
                let real: cl_mem = if handle.is_null() {
                    ptr::null_mut()
                } else {
                    unsafe { Mem::ref_from(handle) }?.inner
                };
                return check(unsafe { f(k.inner, arg_index, arg_size, (&real as *const cl_mem).cast()) });
            }
        }
        ArgKind::Sampler => {
            if let Some(handle) = unsafe { arg_handle::<_cl_sampler>(arg_size, arg_value) } {
                let real = unsafe { Sampler::ref_from(handle) }?.inner;
                return check(unsafe { f(k.inner, arg_index, arg_size, (&real as *const cl_sampler).cast()) });
            }
        }
        ArgKind::Plain => {}
    }
    check(unsafe { f(k.inner, arg_index, arg_size, arg_value) })
}

cl_entry! {
    fn cl_set_kernel_arg(
        kernel: cl_kernel,
        arg_index: cl_uint,
        arg_size: usize,
        arg_value: *const c_void,
    ) => set_kernel_arg;
}

unsafe fn get_kernel_info(
    kernel: cl_kernel,
    param_name: cl_kernel_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let k = unsafe { Kernel::ref_from(kernel) }?;
    let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
    match param_name {
        CL_KERNEL_CONTEXT => unsafe { w.write(k.program.context.handle()) },
        CL_KERNEL_PROGRAM => unsafe { w.write(k.program.handle()) },
        _ => {
            let f = real_fn!(k.driver(), clGetKernelInfo);
            check(unsafe { f(k.inner, param_name, param_value_size, param_value, param_value_size_ret) })
        }
    }
}

cl_entry! {
    fn cl_get_kernel_info(
        kernel: cl_kernel,
        param_name: cl_kernel_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_kernel_info;
}

unsafe fn get_kernel_work_group_info(
    kernel: cl_kernel,
    device: cl_device_id,
    param_name: cl_kernel_work_group_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let k = unsafe { Kernel::ref_from(kernel) }?;
    // A null device is allowed for single-device kernels.
    let real_device = if device.is_null() {
        ptr::null_mut()
    } else {
        unsafe { Device::ref_from(device) }?.inner
    };
    let f = real_fn!(k.driver(), clGetKernelWorkGroupInfo);
    check(unsafe {
        f(
            k.inner,
            real_device,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    })
}

cl_entry! {
    fn cl_get_kernel_work_group_info(
        kernel: cl_kernel,
        device: cl_device_id,
        param_name: cl_kernel_work_group_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_kernel_work_group_info;
}

unsafe fn get_kernel_arg_info(
    kernel: cl_kernel,
    arg_index: cl_uint,
    param_name: cl_kernel_arg_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let k = unsafe { Kernel::ref_from(kernel) }?;
    let f = real_fn!(k.driver(), clGetKernelArgInfo);
    check(unsafe {
        f(
            k.inner,
            arg_index,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    })
}

cl_entry! {
    fn cl_get_kernel_arg_info(
        kernel: cl_kernel,
        arg_index: cl_uint,
        param_name: cl_kernel_arg_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_kernel_arg_info;
}
