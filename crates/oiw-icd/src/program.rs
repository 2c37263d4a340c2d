//! Program creation, build and queries.

use std::ffi::{c_char, c_void};
use std::ptr;
use std::sync::Arc;

use tracing::debug;

use crate::bootstrap;
use crate::callback::{self, ProgramFn, ProgramTrampoline};
use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Context, Device, Program, Wrapped};
use crate::translate::{self, list_ptr};
use crate::types::*;

unsafe fn create_program_with_source(
    context: cl_context,
    count: cl_uint,
    strings: *const *const c_char,
    lengths: *const usize,
) -> CLResult<cl_program> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let f = real_fn!(ctx.driver(), clCreateProgramWithSource);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(ctx.inner, count, strings, lengths, &mut err) };
    check(err)?;
    Ok(Program::new(ctx, real, None).into_handle())
}

cl_entry! {
    fn cl_create_program_with_source(
        context: cl_context,
        count: cl_uint,
        strings: *const *const c_char,
        lengths: *const usize,
    ) -> cl_program => create_program_with_source;
}

unsafe fn create_program_with_binary(
    context: cl_context,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    lengths: *const usize,
    binaries: *const *const u8,
    binary_status: *mut cl_int,
) -> CLResult<cl_program> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let devices = unsafe { translate::records::<Device>(device_list, num_devices) }?;
    let real_devices = translate::inners(&devices)?;

    let f = real_fn!(ctx.driver(), clCreateProgramWithBinary);
    let mut err = CL_SUCCESS;
    let real = unsafe {
        f(
            ctx.inner,
            num_devices,
            list_ptr(&real_devices),
            lengths,
            binaries,
            binary_status,
            &mut err,
        )
    };
    check(err)?;
    Ok(Program::new(ctx, real, Some(devices)).into_handle())
}

cl_entry! {
    fn cl_create_program_with_binary(
        context: cl_context,
        num_devices: cl_uint,
        device_list: *const cl_device_id,
        lengths: *const usize,
        binaries: *const *const u8,
        binary_status: *mut cl_int,
    ) -> cl_program => create_program_with_binary;
}

unsafe fn create_program_with_built_in_kernels(
    context: cl_context,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    kernel_names: *const c_char,
) -> CLResult<cl_program> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let devices = unsafe { translate::records::<Device>(device_list, num_devices) }?;
    let real_devices = translate::inners(&devices)?;

    let f = real_fn!(ctx.driver(), clCreateProgramWithBuiltInKernels);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(ctx.inner, num_devices, list_ptr(&real_devices), kernel_names, &mut err) };
    check(err)?;
    Ok(Program::new(ctx, real, Some(devices)).into_handle())
}

cl_entry! {
    fn cl_create_program_with_built_in_kernels(
        context: cl_context,
        num_devices: cl_uint,
        device_list: *const cl_device_id,
        kernel_names: *const c_char,
    ) -> cl_program => create_program_with_built_in_kernels;
}

refcount_entries!(Program, cl_retain_program => clRetainProgram, cl_release_program => clReleaseProgram);

/// Notification and `user_data` to hand the real implementation.
fn real_notify(state: &Option<Arc<ProgramTrampoline>>) -> (ProgramNotify, *mut c_void) {
    let notify = state.as_ref().map(|_| callback::program_notify as ProgramFn);
    (notify, ProgramTrampoline::real_user_data(state))
}

unsafe fn build_program(
    program: cl_program,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    options: *const c_char,
    pfn_notify: ProgramNotify,
    user_data: *mut c_void,
) -> CLResult<()> {
    let prog = unsafe { Program::arc_from(program) }?;
    let devices = unsafe { translate::inner_handles::<Device>(device_list, num_devices) }?;
    let options = unsafe { translate::with_arg_info(options) }?;
    debug!(options = ?options, "building program");

    let f = real_fn!(prog.driver(), clBuildProgram);
    let state = ProgramTrampoline::arm(&prog, pfn_notify, user_data);
    let (notify, data) = real_notify(&state);
    let status = unsafe {
        f(
            prog.inner(),
            num_devices,
            list_ptr(&devices),
            options.as_ptr(),
            notify,
            data,
        )
    };
    ProgramTrampoline::settle(&state, status);
    check(status)
}

cl_entry! {
    fn cl_build_program(
        program: cl_program,
        num_devices: cl_uint,
        device_list: *const cl_device_id,
        options: *const c_char,
        pfn_notify: ProgramNotify,
        user_data: *mut c_void,
    ) => build_program;
}

#[allow(clippy::too_many_arguments)]
unsafe fn compile_program(
    program: cl_program,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    options: *const c_char,
    num_input_headers: cl_uint,
    input_headers: *const cl_program,
    header_include_names: *const *const c_char,
    pfn_notify: ProgramNotify,
    user_data: *mut c_void,
) -> CLResult<()> {
    let prog = unsafe { Program::arc_from(program) }?;
    let devices = unsafe { translate::inner_handles::<Device>(device_list, num_devices) }?;
    let headers = unsafe { translate::inner_handles::<Program>(input_headers, num_input_headers) }?;
    let options = unsafe { translate::with_arg_info(options) }?;
    debug!(options = ?options, headers = headers.len(), "compiling program");

    let f = real_fn!(prog.driver(), clCompileProgram);
    let state = ProgramTrampoline::arm(&prog, pfn_notify, user_data);
    let (notify, data) = real_notify(&state);
    let status = unsafe {
        f(
            prog.inner(),
            num_devices,
            list_ptr(&devices),
            options.as_ptr(),
            num_input_headers,
            list_ptr(&headers),
            header_include_names,
            notify,
            data,
        )
    };
    ProgramTrampoline::settle(&state, status);
    check(status)
}

cl_entry! {
    #[allow(clippy::too_many_arguments)]
    fn cl_compile_program(
        program: cl_program,
        num_devices: cl_uint,
        device_list: *const cl_device_id,
        options: *const c_char,
        num_input_headers: cl_uint,
        input_headers: *const cl_program,
        header_include_names: *const *const c_char,
        pfn_notify: ProgramNotify,
        user_data: *mut c_void,
    ) => compile_program;
}

/// Links a program. A link can hand back a program together with a failure
/// status (`CL_LINK_PROGRAM_FAILURE`), so both are returned.
#[allow(clippy::too_many_arguments)]
unsafe fn link_program(
    context: cl_context,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    options: *const c_char,
    num_input_programs: cl_uint,
    input_programs: *const cl_program,
    pfn_notify: ProgramNotify,
    user_data: *mut c_void,
) -> CLResult<(cl_program, cl_int)> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let devices = if device_list.is_null() {
        None
    } else {
        Some(unsafe { translate::records::<Device>(device_list, num_devices) }?)
    };
    let real_devices = translate::inners(devices.as_deref().unwrap_or(&[]))?;
    let inputs = unsafe { translate::inner_handles::<Program>(input_programs, num_input_programs) }?;

    let f = real_fn!(ctx.driver(), clLinkProgram);
    // The callback may run before the real call returns, so the record it
    // reports must exist first.
    let linked = Program::new(Arc::clone(&ctx), ptr::null_mut(), devices);
    let state = ProgramTrampoline::arm(&linked, pfn_notify, user_data);
    let (notify, data) = real_notify(&state);

    let mut err = CL_SUCCESS;
    let real = unsafe {
        f(
            ctx.inner,
            num_devices,
            list_ptr(&real_devices),
            options,
            num_input_programs,
            list_ptr(&inputs),
            notify,
            data,
            &mut err,
        )
    };

    if real.is_null() {
        let status = if err == CL_SUCCESS { CL_OUT_OF_RESOURCES } else { err };
        ProgramTrampoline::settle(&state, status);
        return Err(status);
    }
    if linked.inner().is_null() {
        linked.bind(real);
    }
    debug!(status = err, inputs = inputs.len(), "linked program");
    Ok((linked.into_handle(), err))
}

#[allow(clippy::too_many_arguments)]
pub unsafe extern "system" fn cl_link_program(
    context: cl_context,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    options: *const c_char,
    num_input_programs: cl_uint,
    input_programs: *const cl_program,
    pfn_notify: ProgramNotify,
    user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_program {
    let res = unsafe {
        link_program(
            context,
            num_devices,
            device_list,
            options,
            num_input_programs,
            input_programs,
            pfn_notify,
            user_data,
        )
    };
    let (program, code) = res.unwrap_or_else(|e| (ptr::null_mut(), e));
    if !errcode_ret.is_null() {
        unsafe { *errcode_ret = code };
    }
    program
}

unsafe fn unload_compiler() -> CLResult<()> {
    // Nothing to unload before any platform was created.
    let Some(platform) = bootstrap::current() else {
        return Ok(());
    };
    match platform.driver().table().clUnloadCompiler {
        Some(f) => check(unsafe { f() }),
        None => Ok(()),
    }
}

pub unsafe extern "system" fn cl_unload_compiler() -> cl_int {
    crate::error::status(unsafe { unload_compiler() })
}

unsafe fn get_program_info(
    program: cl_program,
    param_name: cl_program_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let p = unsafe { Program::ref_from(program) }?;
    let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
    match param_name {
        CL_PROGRAM_CONTEXT => unsafe { w.write(p.context.handle()) },
        CL_PROGRAM_NUM_DEVICES => unsafe { w.write(p.devices().len() as cl_uint) },
        CL_PROGRAM_DEVICES => {
            let handles: Vec<cl_device_id> = p.devices().iter().map(|d| d.handle()).collect();
            unsafe { w.write_slice(&handles) }
        }
        _ => {
            let f = real_fn!(p.driver(), clGetProgramInfo);
            check(unsafe { f(p.inner(), param_name, param_value_size, param_value, param_value_size_ret) })
        }
    }
}

cl_entry! {
    fn cl_get_program_info(
        program: cl_program,
        param_name: cl_program_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_program_info;
}

unsafe fn get_program_build_info(
    program: cl_program,
    device: cl_device_id,
    param_name: cl_program_build_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let p = unsafe { Program::ref_from(program) }?;
    let d = unsafe { Device::ref_from(device) }?;
    let f = real_fn!(p.driver(), clGetProgramBuildInfo);
    check(unsafe {
        f(
            p.inner(),
            d.inner,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    })
}

cl_entry! {
    fn cl_get_program_build_info(
        program: cl_program,
        device: cl_device_id,
        param_name: cl_program_build_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_program_build_info;
}
