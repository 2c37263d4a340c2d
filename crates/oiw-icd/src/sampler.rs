//! Samplers.

use std::ffi::c_void;

use crate::error::{check, CLResult};
use crate::info::InfoWriter;
use crate::objects::{Context, Sampler, Wrapped};
use crate::types::*;

unsafe fn create_sampler(
    context: cl_context,
    normalized_coords: cl_bool,
    addressing_mode: cl_addressing_mode,
    filter_mode: cl_filter_mode,
) -> CLResult<cl_sampler> {
    let ctx = unsafe { Context::arc_from(context) }?;
    let f = real_fn!(ctx.driver(), clCreateSampler);
    let mut err = CL_SUCCESS;
    let real = unsafe { f(ctx.inner, normalized_coords, addressing_mode, filter_mode, &mut err) };
    check(err)?;
    Ok(Sampler::new(ctx, real).into_handle())
}

cl_entry! {
    fn cl_create_sampler(
        context: cl_context,
        normalized_coords: cl_bool,
        addressing_mode: cl_addressing_mode,
        filter_mode: cl_filter_mode,
    ) -> cl_sampler => create_sampler;
}

refcount_entries!(Sampler, cl_retain_sampler => clRetainSampler, cl_release_sampler => clReleaseSampler);

unsafe fn get_sampler_info(
    sampler: cl_sampler,
    param_name: cl_sampler_info,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> CLResult<()> {
    let s = unsafe { Sampler::ref_from(sampler) }?;
    if param_name == CL_SAMPLER_CONTEXT {
        let w = InfoWriter::new(param_value_size, param_value, param_value_size_ret);
        return unsafe { w.write(s.context.handle()) };
    }
    let f = real_fn!(s.driver(), clGetSamplerInfo);
    check(unsafe { f(s.inner, param_name, param_value_size, param_value, param_value_size_ret) })
}

cl_entry! {
    fn cl_get_sampler_info(
        sampler: cl_sampler,
        param_name: cl_sampler_info,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) => get_sampler_info;
}
