//! The `cl_icd_dispatch` table.
//!
//! Every handle this driver hands out starts with a pointer to [`DISPATCH`];
//! the ICD loader routes each API call through that table. The same struct
//! also carries the entry points of the real implementation, so both sides
//! of the interception share one layout.
#![allow(non_snake_case)]

use std::ffi::{c_char, c_void};

use libloading::Library;

use crate::types::*;
use crate::{context, device, enqueue, event, kernel, memory, platform, program, queue, sampler, stubs};

/// Slots after `clCreateFromGLTexture` (D3D11, DX9, EGL, OpenCL 2.x/3.0).
/// This driver does not fill them, but the table keeps their room so a
/// loader probing newer entries reads null.
pub const RESERVED_SLOTS: usize = 40;

type Unfilled = Option<unsafe extern "system" fn()>;

macro_rules! icd_dispatch {
    ($($name:ident: fn($($arg:ty),* $(,)?) $(-> $ret:ty)?;)*) => {
        #[repr(C)]
        #[derive(Clone, Copy)]
        pub struct IcdDispatch {
            $(pub $name: Option<unsafe extern "system" fn($($arg),*) $(-> $ret)?>,)*
            pub reserved: [Unfilled; RESERVED_SLOTS],
        }

        impl IcdDispatch {
            pub const EMPTY: Self = Self {
                $($name: None,)*
                reserved: [None; RESERVED_SLOTS],
            };

            /// Resolves every slot by its exported symbol name. Symbols the
            /// library does not export leave their slot empty.
            ///
            /// # Safety
            /// `lib` must be an OpenCL implementation whose exports have the
            /// standard signatures.
            pub unsafe fn resolve(lib: &Library) -> (Self, usize) {
                let mut table = Self::EMPTY;
                let mut found = 0;
                $(
                    table.$name = unsafe {
                        lib.get::<unsafe extern "system" fn($($arg),*) $(-> $ret)?>(
                            concat!(stringify!($name), "\0").as_bytes(),
                        )
                    }
                    .ok()
                    .map(|sym| *sym);
                    found += usize::from(table.$name.is_some());
                )*
                (table, found)
            }
        }
    };
}

icd_dispatch! {
    clGetPlatformIDs: fn(cl_uint, *mut cl_platform_id, *mut cl_uint) -> cl_int;
    clGetPlatformInfo: fn(cl_platform_id, cl_platform_info, usize, *mut c_void, *mut usize) -> cl_int;
    clGetDeviceIDs: fn(cl_platform_id, cl_device_type, cl_uint, *mut cl_device_id, *mut cl_uint) -> cl_int;
    clGetDeviceInfo: fn(cl_device_id, cl_device_info, usize, *mut c_void, *mut usize) -> cl_int;
    clCreateContext: fn(*const cl_context_properties, cl_uint, *const cl_device_id, ContextNotify, *mut c_void, *mut cl_int) -> cl_context;
    clCreateContextFromType: fn(*const cl_context_properties, cl_device_type, ContextNotify, *mut c_void, *mut cl_int) -> cl_context;
    clRetainContext: fn(cl_context) -> cl_int;
    clReleaseContext: fn(cl_context) -> cl_int;
    clGetContextInfo: fn(cl_context, cl_context_info, usize, *mut c_void, *mut usize) -> cl_int;
    clCreateCommandQueue: fn(cl_context, cl_device_id, cl_command_queue_properties, *mut cl_int) -> cl_command_queue;
    clRetainCommandQueue: fn(cl_command_queue) -> cl_int;
    clReleaseCommandQueue: fn(cl_command_queue) -> cl_int;
    clGetCommandQueueInfo: fn(cl_command_queue, cl_command_queue_info, usize, *mut c_void, *mut usize) -> cl_int;
    clSetCommandQueueProperty: fn(cl_command_queue, cl_command_queue_properties, cl_bool, *mut cl_command_queue_properties) -> cl_int;
    clCreateBuffer: fn(cl_context, cl_mem_flags, usize, *mut c_void, *mut cl_int) -> cl_mem;
    clCreateImage2D: fn(cl_context, cl_mem_flags, *const cl_image_format, usize, usize, usize, *mut c_void, *mut cl_int) -> cl_mem;
    clCreateImage3D: fn(cl_context, cl_mem_flags, *const cl_image_format, usize, usize, usize, usize, usize, *mut c_void, *mut cl_int) -> cl_mem;
    clRetainMemObject: fn(cl_mem) -> cl_int;
    clReleaseMemObject: fn(cl_mem) -> cl_int;
    clGetSupportedImageFormats: fn(cl_context, cl_mem_flags, cl_mem_object_type, cl_uint, *mut cl_image_format, *mut cl_uint) -> cl_int;
    clGetMemObjectInfo: fn(cl_mem, cl_mem_info, usize, *mut c_void, *mut usize) -> cl_int;
    clGetImageInfo: fn(cl_mem, cl_image_info, usize, *mut c_void, *mut usize) -> cl_int;
    clCreateSampler: fn(cl_context, cl_bool, cl_addressing_mode, cl_filter_mode, *mut cl_int) -> cl_sampler;
    clRetainSampler: fn(cl_sampler) -> cl_int;
    clReleaseSampler: fn(cl_sampler) -> cl_int;
    clGetSamplerInfo: fn(cl_sampler, cl_sampler_info, usize, *mut c_void, *mut usize) -> cl_int;
    clCreateProgramWithSource: fn(cl_context, cl_uint, *const *const c_char, *const usize, *mut cl_int) -> cl_program;
    clCreateProgramWithBinary: fn(cl_context, cl_uint, *const cl_device_id, *const usize, *const *const u8, *mut cl_int, *mut cl_int) -> cl_program;
    clRetainProgram: fn(cl_program) -> cl_int;
    clReleaseProgram: fn(cl_program) -> cl_int;
    clBuildProgram: fn(cl_program, cl_uint, *const cl_device_id, *const c_char, ProgramNotify, *mut c_void) -> cl_int;
    clUnloadCompiler: fn() -> cl_int;
    clGetProgramInfo: fn(cl_program, cl_program_info, usize, *mut c_void, *mut usize) -> cl_int;
    clGetProgramBuildInfo: fn(cl_program, cl_device_id, cl_program_build_info, usize, *mut c_void, *mut usize) -> cl_int;
    clCreateKernel: fn(cl_program, *const c_char, *mut cl_int) -> cl_kernel;
    clCreateKernelsInProgram: fn(cl_program, cl_uint, *mut cl_kernel, *mut cl_uint) -> cl_int;
    clRetainKernel: fn(cl_kernel) -> cl_int;
    clReleaseKernel: fn(cl_kernel) -> cl_int;
    clSetKernelArg: fn(cl_kernel, cl_uint, usize, *const c_void) -> cl_int;
    clGetKernelInfo: fn(cl_kernel, cl_kernel_info, usize, *mut c_void, *mut usize) -> cl_int;
    clGetKernelWorkGroupInfo: fn(cl_kernel, cl_device_id, cl_kernel_work_group_info, usize, *mut c_void, *mut usize) -> cl_int;
    clWaitForEvents: fn(cl_uint, *const cl_event) -> cl_int;
    clGetEventInfo: fn(cl_event, cl_event_info, usize, *mut c_void, *mut usize) -> cl_int;
    clRetainEvent: fn(cl_event) -> cl_int;
    clReleaseEvent: fn(cl_event) -> cl_int;
    clGetEventProfilingInfo: fn(cl_event, cl_profiling_info, usize, *mut c_void, *mut usize) -> cl_int;
    clFlush: fn(cl_command_queue) -> cl_int;
    clFinish: fn(cl_command_queue) -> cl_int;
    clEnqueueReadBuffer: fn(cl_command_queue, cl_mem, cl_bool, usize, usize, *mut c_void, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueWriteBuffer: fn(cl_command_queue, cl_mem, cl_bool, usize, usize, *const c_void, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueCopyBuffer: fn(cl_command_queue, cl_mem, cl_mem, usize, usize, usize, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueReadImage: fn(cl_command_queue, cl_mem, cl_bool, *const usize, *const usize, usize, usize, *mut c_void, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueWriteImage: fn(cl_command_queue, cl_mem, cl_bool, *const usize, *const usize, usize, usize, *const c_void, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueCopyImage: fn(cl_command_queue, cl_mem, cl_mem, *const usize, *const usize, *const usize, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueCopyImageToBuffer: fn(cl_command_queue, cl_mem, cl_mem, *const usize, *const usize, usize, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueCopyBufferToImage: fn(cl_command_queue, cl_mem, cl_mem, usize, *const usize, *const usize, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueMapBuffer: fn(cl_command_queue, cl_mem, cl_bool, cl_map_flags, usize, usize, cl_uint, *const cl_event, *mut cl_event, *mut cl_int) -> *mut c_void;
    clEnqueueMapImage: fn(cl_command_queue, cl_mem, cl_bool, cl_map_flags, *const usize, *const usize, *mut usize, *mut usize, cl_uint, *const cl_event, *mut cl_event, *mut cl_int) -> *mut c_void;
    clEnqueueUnmapMemObject: fn(cl_command_queue, cl_mem, *mut c_void, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueNDRangeKernel: fn(cl_command_queue, cl_kernel, cl_uint, *const usize, *const usize, *const usize, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueTask: fn(cl_command_queue, cl_kernel, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueNativeKernel: fn(cl_command_queue, NativeKernelFn, *mut c_void, usize, cl_uint, *const cl_mem, *const *const c_void, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueMarker: fn(cl_command_queue, *mut cl_event) -> cl_int;
    clEnqueueWaitForEvents: fn(cl_command_queue, cl_uint, *const cl_event) -> cl_int;
    clEnqueueBarrier: fn(cl_command_queue) -> cl_int;
    clGetExtensionFunctionAddress: fn(*const c_char) -> *mut c_void;
    clCreateFromGLBuffer: fn(cl_context, cl_mem_flags, cl_GLuint, *mut cl_int) -> cl_mem;
    clCreateFromGLTexture2D: fn(cl_context, cl_mem_flags, cl_GLenum, cl_GLint, cl_GLuint, *mut cl_int) -> cl_mem;
    clCreateFromGLTexture3D: fn(cl_context, cl_mem_flags, cl_GLenum, cl_GLint, cl_GLuint, *mut cl_int) -> cl_mem;
    clCreateFromGLRenderbuffer: fn(cl_context, cl_mem_flags, cl_GLuint, *mut cl_int) -> cl_mem;
    clGetGLObjectInfo: fn(cl_mem, *mut cl_gl_object_type, *mut cl_GLuint) -> cl_int;
    clGetGLTextureInfo: fn(cl_mem, cl_gl_texture_info, usize, *mut c_void, *mut usize) -> cl_int;
    clEnqueueAcquireGLObjects: fn(cl_command_queue, cl_uint, *const cl_mem, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueReleaseGLObjects: fn(cl_command_queue, cl_uint, *const cl_mem, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clGetGLContextInfoKHR: fn(*const cl_context_properties, cl_gl_context_info, usize, *mut c_void, *mut usize) -> cl_int;
    clGetDeviceIDsFromD3D10KHR: fn();
    clCreateFromD3D10BufferKHR: fn();
    clCreateFromD3D10Texture2DKHR: fn();
    clCreateFromD3D10Texture3DKHR: fn();
    clEnqueueAcquireD3D10ObjectsKHR: fn();
    clEnqueueReleaseD3D10ObjectsKHR: fn();
    clSetEventCallback: fn(cl_event, cl_int, EventNotify, *mut c_void) -> cl_int;
    clCreateSubBuffer: fn(cl_mem, cl_mem_flags, cl_buffer_create_type, *const c_void, *mut cl_int) -> cl_mem;
    clSetMemObjectDestructorCallback: fn(cl_mem, MemDestructorNotify, *mut c_void) -> cl_int;
    clCreateUserEvent: fn(cl_context, *mut cl_int) -> cl_event;
    clSetUserEventStatus: fn(cl_event, cl_int) -> cl_int;
    clEnqueueReadBufferRect: fn(cl_command_queue, cl_mem, cl_bool, *const usize, *const usize, *const usize, usize, usize, usize, usize, *mut c_void, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueWriteBufferRect: fn(cl_command_queue, cl_mem, cl_bool, *const usize, *const usize, *const usize, usize, usize, usize, usize, *const c_void, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueCopyBufferRect: fn(cl_command_queue, cl_mem, cl_mem, *const usize, *const usize, *const usize, usize, usize, usize, usize, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clCreateSubDevicesEXT: fn(cl_device_id, *const cl_device_partition_property_ext, cl_uint, *mut cl_device_id, *mut cl_uint) -> cl_int;
    clRetainDeviceEXT: fn(cl_device_id) -> cl_int;
    clReleaseDeviceEXT: fn(cl_device_id) -> cl_int;
    clCreateEventFromGLsyncKHR: fn(cl_context, cl_GLsync, *mut cl_int) -> cl_event;
    clCreateSubDevices: fn(cl_device_id, *const cl_device_partition_property, cl_uint, *mut cl_device_id, *mut cl_uint) -> cl_int;
    clRetainDevice: fn(cl_device_id) -> cl_int;
    clReleaseDevice: fn(cl_device_id) -> cl_int;
    clCreateImage: fn(cl_context, cl_mem_flags, *const cl_image_format, *const cl_image_desc, *mut c_void, *mut cl_int) -> cl_mem;
    clCreateProgramWithBuiltInKernels: fn(cl_context, cl_uint, *const cl_device_id, *const c_char, *mut cl_int) -> cl_program;
    clCompileProgram: fn(cl_program, cl_uint, *const cl_device_id, *const c_char, cl_uint, *const cl_program, *const *const c_char, ProgramNotify, *mut c_void) -> cl_int;
    clLinkProgram: fn(cl_context, cl_uint, *const cl_device_id, *const c_char, cl_uint, *const cl_program, ProgramNotify, *mut c_void, *mut cl_int) -> cl_program;
    clUnloadPlatformCompiler: fn(cl_platform_id) -> cl_int;
    clGetKernelArgInfo: fn(cl_kernel, cl_uint, cl_kernel_arg_info, usize, *mut c_void, *mut usize) -> cl_int;
    clEnqueueFillBuffer: fn(cl_command_queue, cl_mem, *const c_void, usize, usize, usize, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueFillImage: fn(cl_command_queue, cl_mem, *const c_void, *const usize, *const usize, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueMigrateMemObjects: fn(cl_command_queue, cl_uint, *const cl_mem, cl_mem_migration_flags, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueMarkerWithWaitList: fn(cl_command_queue, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clEnqueueBarrierWithWaitList: fn(cl_command_queue, cl_uint, *const cl_event, *mut cl_event) -> cl_int;
    clGetExtensionFunctionAddressForPlatform: fn(cl_platform_id, *const c_char) -> *mut c_void;
    clCreateFromGLTexture: fn(cl_context, cl_mem_flags, cl_GLenum, cl_GLint, cl_GLuint, *mut cl_int) -> cl_mem;
}

/// Byte length of the slots every OpenCL 1.2 vendor table is known to carry.
pub const CORE_TABLE_BYTES: usize = std::mem::offset_of!(IcdDispatch, reserved);

/// The table behind every handle this driver returns.
pub static DISPATCH: IcdDispatch = build_dispatch();

const fn build_dispatch() -> IcdDispatch {
    let mut t = IcdDispatch::EMPTY;

    // ── Platform & device ─────────────────────────────────────────────
    t.clGetPlatformIDs = Some(platform::cl_get_platform_ids);
    t.clGetPlatformInfo = Some(platform::cl_get_platform_info);
    t.clUnloadPlatformCompiler = Some(platform::cl_unload_platform_compiler);
    t.clGetExtensionFunctionAddress = Some(platform::cl_get_extension_function_address);
    t.clGetExtensionFunctionAddressForPlatform =
        Some(platform::cl_get_extension_function_address_for_platform);
    t.clGetDeviceIDs = Some(device::cl_get_device_ids);
    t.clGetDeviceInfo = Some(device::cl_get_device_info);
    t.clRetainDevice = Some(device::cl_retain_device);
    t.clReleaseDevice = Some(device::cl_release_device);
    t.clRetainDeviceEXT = Some(device::cl_retain_device);
    t.clReleaseDeviceEXT = Some(device::cl_release_device);

    // ── Context & queue ───────────────────────────────────────────────
    t.clCreateContext = Some(context::cl_create_context);
    t.clCreateContextFromType = Some(context::cl_create_context_from_type);
    t.clRetainContext = Some(context::cl_retain_context);
    t.clReleaseContext = Some(context::cl_release_context);
    t.clGetContextInfo = Some(context::cl_get_context_info);
    t.clCreateCommandQueue = Some(queue::cl_create_command_queue);
    t.clRetainCommandQueue = Some(queue::cl_retain_command_queue);
    t.clReleaseCommandQueue = Some(queue::cl_release_command_queue);
    t.clGetCommandQueueInfo = Some(queue::cl_get_command_queue_info);
    t.clFlush = Some(queue::cl_flush);
    t.clFinish = Some(queue::cl_finish);

    // ── Memory objects & samplers ─────────────────────────────────────
    t.clCreateBuffer = Some(memory::cl_create_buffer);
    t.clCreateSubBuffer = Some(memory::cl_create_sub_buffer);
    t.clCreateImage = Some(memory::cl_create_image);
    t.clCreateImage2D = Some(memory::cl_create_image_2d);
    t.clCreateImage3D = Some(memory::cl_create_image_3d);
    t.clRetainMemObject = Some(memory::cl_retain_mem_object);
    t.clReleaseMemObject = Some(memory::cl_release_mem_object);
    t.clGetSupportedImageFormats = Some(memory::cl_get_supported_image_formats);
    t.clGetMemObjectInfo = Some(memory::cl_get_mem_object_info);
    t.clGetImageInfo = Some(memory::cl_get_image_info);
    t.clSetMemObjectDestructorCallback = Some(memory::cl_set_mem_object_destructor_callback);
    t.clCreateSampler = Some(sampler::cl_create_sampler);
    t.clRetainSampler = Some(sampler::cl_retain_sampler);
    t.clReleaseSampler = Some(sampler::cl_release_sampler);
    t.clGetSamplerInfo = Some(sampler::cl_get_sampler_info);

    // ── Programs & kernels ────────────────────────────────────────────
    t.clCreateProgramWithSource = Some(program::cl_create_program_with_source);
    t.clCreateProgramWithBinary = Some(program::cl_create_program_with_binary);
    t.clCreateProgramWithBuiltInKernels = Some(program::cl_create_program_with_built_in_kernels);
    t.clRetainProgram = Some(program::cl_retain_program);
    t.clReleaseProgram = Some(program::cl_release_program);
    t.clBuildProgram = Some(program::cl_build_program);
    t.clCompileProgram = Some(program::cl_compile_program);
    t.clLinkProgram = Some(program::cl_link_program);
    t.clUnloadCompiler = Some(program::cl_unload_compiler);
    t.clGetProgramInfo = Some(program::cl_get_program_info);
    t.clGetProgramBuildInfo = Some(program::cl_get_program_build_info);
    t.clCreateKernel = Some(kernel::cl_create_kernel);
    t.clCreateKernelsInProgram = Some(kernel::cl_create_kernels_in_program);
    t.clRetainKernel = Some(kernel::cl_retain_kernel);
    t.clReleaseKernel = Some(kernel::cl_release_kernel);
    t.clSetKernelArg = Some(kernel::cl_set_kernel_arg);
    t.clGetKernelInfo = Some(kernel::cl_get_kernel_info);
    t.clGetKernelWorkGroupInfo = Some(kernel::cl_get_kernel_work_group_info);
    t.clGetKernelArgInfo = Some(kernel::cl_get_kernel_arg_info);

    // ── Events ────────────────────────────────────────────────────────
    t.clWaitForEvents = Some(event::cl_wait_for_events);
    t.clGetEventInfo = Some(event::cl_get_event_info);
    t.clRetainEvent = Some(event::cl_retain_event);
    t.clReleaseEvent = Some(event::cl_release_event);
    t.clGetEventProfilingInfo = Some(event::cl_get_event_profiling_info);
    t.clSetEventCallback = Some(event::cl_set_event_callback);
    t.clCreateUserEvent = Some(event::cl_create_user_event);
    t.clSetUserEventStatus = Some(event::cl_set_user_event_status);

    // ── Enqueue ───────────────────────────────────────────────────────
    t.clEnqueueReadBuffer = Some(enqueue::cl_enqueue_read_buffer);
    t.clEnqueueWriteBuffer = Some(enqueue::cl_enqueue_write_buffer);
    t.clEnqueueCopyBuffer = Some(enqueue::cl_enqueue_copy_buffer);
    t.clEnqueueReadBufferRect = Some(enqueue::cl_enqueue_read_buffer_rect);
    t.clEnqueueWriteBufferRect = Some(enqueue::cl_enqueue_write_buffer_rect);
    t.clEnqueueCopyBufferRect = Some(enqueue::cl_enqueue_copy_buffer_rect);
    t.clEnqueueFillBuffer = Some(enqueue::cl_enqueue_fill_buffer);
    t.clEnqueueReadImage = Some(enqueue::cl_enqueue_read_image);
    t.clEnqueueWriteImage = Some(enqueue::cl_enqueue_write_image);
    t.clEnqueueCopyImage = Some(enqueue::cl_enqueue_copy_image);
    t.clEnqueueFillImage = Some(enqueue::cl_enqueue_fill_image);
    t.clEnqueueCopyImageToBuffer = Some(enqueue::cl_enqueue_copy_image_to_buffer);
    t.clEnqueueCopyBufferToImage = Some(enqueue::cl_enqueue_copy_buffer_to_image);
    t.clEnqueueMapBuffer = Some(enqueue::cl_enqueue_map_buffer);
    t.clEnqueueMapImage = Some(enqueue::cl_enqueue_map_image);
    t.clEnqueueUnmapMemObject = Some(enqueue::cl_enqueue_unmap_mem_object);
    t.clEnqueueMigrateMemObjects = Some(enqueue::cl_enqueue_migrate_mem_objects);
    t.clEnqueueNDRangeKernel = Some(enqueue::cl_enqueue_nd_range_kernel);
    t.clEnqueueTask = Some(enqueue::cl_enqueue_task);
    t.clEnqueueMarker = Some(enqueue::cl_enqueue_marker);
    t.clEnqueueWaitForEvents = Some(enqueue::cl_enqueue_wait_for_events);
    t.clEnqueueBarrier = Some(enqueue::cl_enqueue_barrier);
    t.clEnqueueMarkerWithWaitList = Some(enqueue::cl_enqueue_marker_with_wait_list);
    t.clEnqueueBarrierWithWaitList = Some(enqueue::cl_enqueue_barrier_with_wait_list);

    // ── Unsupported ───────────────────────────────────────────────────
    t.clSetCommandQueueProperty = Some(stubs::cl_set_command_queue_property);
    t.clEnqueueNativeKernel = Some(stubs::cl_enqueue_native_kernel);
    t.clCreateSubDevices = Some(stubs::cl_create_sub_devices);
    t.clCreateSubDevicesEXT = Some(stubs::cl_create_sub_devices_ext);
    t.clCreateFromGLBuffer = Some(stubs::cl_create_from_gl_buffer);
    t.clCreateFromGLTexture = Some(stubs::cl_create_from_gl_texture);
    t.clCreateFromGLTexture2D = Some(stubs::cl_create_from_gl_texture);
    t.clCreateFromGLTexture3D = Some(stubs::cl_create_from_gl_texture);
    t.clCreateFromGLRenderbuffer = Some(stubs::cl_create_from_gl_renderbuffer);
    t.clGetGLObjectInfo = Some(stubs::cl_get_gl_object_info);
    t.clGetGLTextureInfo = Some(stubs::cl_get_gl_texture_info);
    t.clEnqueueAcquireGLObjects = Some(stubs::cl_enqueue_acquire_gl_objects);
    t.clEnqueueReleaseGLObjects = Some(stubs::cl_enqueue_release_gl_objects);
    t.clGetGLContextInfoKHR = Some(stubs::cl_get_gl_context_info_khr);
    t.clCreateEventFromGLsyncKHR = Some(stubs::cl_create_event_from_gl_sync_khr);

    t
}
