//! Shared harness for the driver's integration tests.
//!
//! Installs a fake "real" OpenCL implementation behind the driver. The fake
//! hands out numbered handles that are never dereferenced and records what
//! it receives in thread-local state, so each test observes only its own
//! calls.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ffi::{c_char, c_void, CStr};
use std::ptr;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use oiw::dispatch::IcdDispatch;
use oiw::objects::Wrapped;
use oiw::types::*;
use oiw::RealDriver;

/// Calls an entry point through the table the ICD loader would use.
#[macro_export]
macro_rules! cl {
    ($name:ident($($arg:expr),* $(,)?)) => {
        unsafe { (oiw::DISPATCH.$name.expect(stringify!($name)))($($arg),*) }
    };
}

pub const REAL_PLATFORM: usize = 0x9100;
pub const REAL_DEVICES: [usize; 2] = [0xd001, 0xd002];

/// Argument layout of every kernel the fake creates.
pub const ARG_GLOBAL: cl_uint = 0;
pub const ARG_CONSTANT: cl_uint = 1;
pub const ARG_SAMPLER: cl_uint = 2;
pub const ARG_INT: cl_uint = 3;
pub const ARG_NO_INFO: cl_uint = 4;

static NEXT_HANDLE: AtomicUsize = AtomicUsize::new(0x5000_0000);

fn mint<T>() -> *mut T {
    NEXT_HANDLE.fetch_add(0x10, Ordering::SeqCst) as *mut T
}

// ── Recorder ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Recorder {
    /// Real entry points reached, in order.
    pub calls: Vec<&'static str>,
    /// Handles the last call received, in parameter order.
    pub handles: Vec<usize>,
    /// Wait list the last enqueue received.
    pub waits: Vec<usize>,
    pub properties: Vec<isize>,
    pub options: Option<String>,
    /// `(index, size, value)` of the last `clSetKernelArg`; the value is the
    /// pointer-sized word behind `arg_value`, if any.
    pub kernel_arg: Option<(cl_uint, usize, Option<usize>)>,
    pub image_buffer: usize,
    pending_destructors: Vec<(cl_mem, unsafe extern "system" fn(cl_mem, *mut c_void), *mut c_void)>,
}

thread_local! {
    static RECORDER: RefCell<Recorder> = RefCell::new(Recorder::default());
    static FAIL_NEXT: Cell<Option<cl_int>> = const { Cell::new(None) };
}

fn record(name: &'static str) {
    RECORDER.with(|r| r.borrow_mut().calls.push(name));
}

fn record_handles(handles: &[usize]) {
    RECORDER.with(|r| r.borrow_mut().handles = handles.to_vec());
}

fn with_recorder<R>(f: impl FnOnce(&mut Recorder) -> R) -> R {
    RECORDER.with(|r| f(&mut r.borrow_mut()))
}

/// Clears what this thread recorded so far.
pub fn reset() {
    with_recorder(|r| *r = Recorder::default());
    FAIL_NEXT.with(|f| f.set(None));
}

pub fn calls() -> Vec<&'static str> {
    with_recorder(|r| r.calls.clone())
}

pub fn called(name: &str) -> bool {
    with_recorder(|r| r.calls.iter().any(|c| *c == name))
}

pub fn handles() -> Vec<usize> {
    with_recorder(|r| r.handles.clone())
}

pub fn waits() -> Vec<usize> {
    with_recorder(|r| r.waits.clone())
}

pub fn properties() -> Vec<isize> {
    with_recorder(|r| r.properties.clone())
}

pub fn options() -> Option<String> {
    with_recorder(|r| r.options.clone())
}

pub fn kernel_arg() -> Option<(cl_uint, usize, Option<usize>)> {
    with_recorder(|r| r.kernel_arg)
}

pub fn image_buffer() -> usize {
    with_recorder(|r| r.image_buffer)
}

/// Makes the next creating call on this thread fail with `status`.
pub fn fail_next(status: cl_int) {
    FAIL_NEXT.with(|f| f.set(Some(status)));
}

fn take_failure() -> Option<cl_int> {
    FAIL_NEXT.with(|f| f.take())
}

/// Creation result honouring [`fail_next`].
unsafe fn create<T>(errcode_ret: *mut cl_int) -> *mut T {
    let (handle, status) = match take_failure() {
        Some(status) => (ptr::null_mut(), status),
        None => (mint(), CL_SUCCESS),
    };
    if !errcode_ret.is_null() {
        unsafe { *errcode_ret = status };
    }
    handle
}

unsafe fn list<T>(items: *const *mut T, count: cl_uint) -> Vec<usize> {
    if items.is_null() {
        return Vec::new();
    }
    unsafe { slice::from_raw_parts(items, count as usize) }
        .iter()
        .map(|&h| h as usize)
        .collect()
}

/// Answers a query the way a conforming implementation does.
pub unsafe fn answer(bytes: &[u8], size: usize, value: *mut c_void, size_ret: *mut usize) -> cl_int {
    if !value.is_null() {
        if size < bytes.len() {
            return CL_INVALID_VALUE;
        }
        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), value.cast::<u8>(), bytes.len()) };
    }
    if !size_ret.is_null() {
        unsafe { *size_ret = bytes.len() };
    }
    CL_SUCCESS
}

pub fn bytes_of<T: Copy>(value: &T) -> &[u8] {
    unsafe { slice::from_raw_parts((value as *const T).cast::<u8>(), std::mem::size_of::<T>()) }
}

// ── Fake entry points ─────────────────────────────────────────────────

macro_rules! succeed {
    ($($name:ident($ty:ty) => $label:literal;)*) => {
        $(
            unsafe extern "system" fn $name(handle: $ty) -> cl_int {
                record($label);
                record_handles(&[handle as usize]);
                CL_SUCCESS
            }
        )*
    };
}

succeed! {
    fake_retain_context(cl_context) => "clRetainContext";
    fake_release_context(cl_context) => "clReleaseContext";
    fake_retain_queue(cl_command_queue) => "clRetainCommandQueue";
    fake_release_queue(cl_command_queue) => "clReleaseCommandQueue";
    fake_retain_sampler(cl_sampler) => "clRetainSampler";
    fake_release_sampler(cl_sampler) => "clReleaseSampler";
    fake_retain_program(cl_program) => "clRetainProgram";
    fake_release_program(cl_program) => "clReleaseProgram";
    fake_retain_kernel(cl_kernel) => "clRetainKernel";
    fake_release_kernel(cl_kernel) => "clReleaseKernel";
    fake_retain_event(cl_event) => "clRetainEvent";
    fake_release_event(cl_event) => "clReleaseEvent";
    fake_retain_mem(cl_mem) => "clRetainMemObject";
    fake_retain_device(cl_device_id) => "clRetainDevice";
    fake_release_device(cl_device_id) => "clReleaseDevice";
    fake_flush(cl_command_queue) => "clFlush";
    fake_finish(cl_command_queue) => "clFinish";
}

unsafe extern "system" fn fake_get_platform_ids(
    num_entries: cl_uint,
    platforms: *mut cl_platform_id,
    num_platforms: *mut cl_uint,
) -> cl_int {
    record("clGetPlatformIDs");
    if num_entries > 0 && !platforms.is_null() {
        unsafe { *platforms = REAL_PLATFORM as cl_platform_id };
    }
    if !num_platforms.is_null() {
        unsafe { *num_platforms = 1 };
    }
    CL_SUCCESS
}

unsafe extern "system" fn fake_get_platform_info(
    platform: cl_platform_id,
    _param_name: cl_platform_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    record("clGetPlatformInfo");
    record_handles(&[platform as usize]);
    unsafe { answer(b"Fake OpenCL\0", size, value, size_ret) }
}

unsafe extern "system" fn fake_get_device_ids(
    platform: cl_platform_id,
    _device_type: cl_device_type,
    num_entries: cl_uint,
    devices: *mut cl_device_id,
    num_devices: *mut cl_uint,
) -> cl_int {
    record("clGetDeviceIDs");
    record_handles(&[platform as usize]);
    if !devices.is_null() {
        for (i, real) in REAL_DEVICES.iter().take(num_entries as usize).enumerate() {
            unsafe { *devices.add(i) = *real as cl_device_id };
        }
    }
    if !num_devices.is_null() {
        unsafe { *num_devices = REAL_DEVICES.len() as cl_uint };
    }
    CL_SUCCESS
}

unsafe extern "system" fn fake_get_device_info(
    device: cl_device_id,
    _param_name: cl_device_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    record("clGetDeviceInfo");
    record_handles(&[device as usize]);
    unsafe { answer(b"Fake Device\0", size, value, size_ret) }
}

unsafe fn record_properties(props: *const cl_context_properties) {
    let mut out = Vec::new();
    if !props.is_null() {
        let mut i = 0;
        loop {
            let key = unsafe { *props.add(i) };
            out.push(key);
            if key == 0 {
                break;
            }
            out.push(unsafe { *props.add(i + 1) });
            i += 2;
        }
    }
    with_recorder(|r| r.properties = out);
}

unsafe extern "system" fn fake_create_context(
    properties: *const cl_context_properties,
    num_devices: cl_uint,
    devices: *const cl_device_id,
    _pfn_notify: ContextNotify,
    _user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_context {
    record("clCreateContext");
    unsafe { record_properties(properties) };
    record_handles(&unsafe { list(devices, num_devices) });
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_create_context_from_type(
    properties: *const cl_context_properties,
    _device_type: cl_device_type,
    _pfn_notify: ContextNotify,
    _user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_context {
    record("clCreateContextFromType");
    unsafe { record_properties(properties) };
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_get_context_info(
    _context: cl_context,
    param_name: cl_context_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    record("clGetContextInfo");
    match param_name {
        CL_CONTEXT_DEVICES => unsafe { answer(bytes_of(&REAL_DEVICES), size, value, size_ret) },
        _ => unsafe { answer(bytes_of(&1u32), size, value, size_ret) },
    }
}

unsafe extern "system" fn fake_create_command_queue(
    context: cl_context,
    device: cl_device_id,
    _properties: cl_command_queue_properties,
    errcode_ret: *mut cl_int,
) -> cl_command_queue {
    record("clCreateCommandQueue");
    record_handles(&[context as usize, device as usize]);
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_get_command_queue_info(
    _queue: cl_command_queue,
    _param_name: cl_command_queue_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    record("clGetCommandQueueInfo");
    unsafe { answer(bytes_of(&0u64), size, value, size_ret) }
}

unsafe extern "system" fn fake_create_buffer(
    context: cl_context,
    _flags: cl_mem_flags,
    size: usize,
    _host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_mem {
    record("clCreateBuffer");
    record_handles(&[context as usize]);
    if size == 0 {
        if !errcode_ret.is_null() {
            unsafe { *errcode_ret = CL_INVALID_BUFFER_SIZE };
        }
        return ptr::null_mut();
    }
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_create_sub_buffer(
    buffer: cl_mem,
    _flags: cl_mem_flags,
    _create_type: cl_buffer_create_type,
    _create_info: *const c_void,
    errcode_ret: *mut cl_int,
) -> cl_mem {
    record("clCreateSubBuffer");
    record_handles(&[buffer as usize]);
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_create_image(
    context: cl_context,
    _flags: cl_mem_flags,
    _format: *const cl_image_format,
    desc: *const cl_image_desc,
    _host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_mem {
    record("clCreateImage");
    record_handles(&[context as usize]);
    let buffer = if desc.is_null() { 0 } else { unsafe { (*desc).buffer as usize } };
    with_recorder(|r| r.image_buffer = buffer);
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_get_mem_object_info(
    memobj: cl_mem,
    _param_name: cl_mem_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    record("clGetMemObjectInfo");
    record_handles(&[memobj as usize]);
    unsafe { answer(bytes_of(&64usize), size, value, size_ret) }
}

unsafe extern "system" fn fake_set_mem_object_destructor_callback(
    memobj: cl_mem,
    pfn_notify: MemDestructorNotify,
    user_data: *mut c_void,
) -> cl_int {
    record("clSetMemObjectDestructorCallback");
    let Some(notify) = pfn_notify else {
        return CL_INVALID_VALUE;
    };
    with_recorder(|r| r.pending_destructors.push((memobj, notify, user_data)));
    CL_SUCCESS
}

unsafe extern "system" fn fake_release_mem(memobj: cl_mem) -> cl_int {
    record("clReleaseMemObject");
    record_handles(&[memobj as usize]);
    let due: Vec<_> = with_recorder(|r| {
        let (due, keep): (Vec<_>, Vec<_>) = r.pending_destructors.drain(..).partition(|(m, _, _)| *m == memobj);
        r.pending_destructors = keep;
        due
    });
    for (mem, notify, data) in due {
        unsafe { notify(mem, data) };
    }
    CL_SUCCESS
}

unsafe extern "system" fn fake_create_sampler(
    context: cl_context,
    _normalized: cl_bool,
    _addressing: cl_addressing_mode,
    _filter: cl_filter_mode,
    errcode_ret: *mut cl_int,
) -> cl_sampler {
    record("clCreateSampler");
    record_handles(&[context as usize]);
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_create_program_with_source(
    context: cl_context,
    _count: cl_uint,
    _strings: *const *const c_char,
    _lengths: *const usize,
    errcode_ret: *mut cl_int,
) -> cl_program {
    record("clCreateProgramWithSource");
    record_handles(&[context as usize]);
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_create_program_with_binary(
    _context: cl_context,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    _lengths: *const usize,
    _binaries: *const *const u8,
    _binary_status: *mut cl_int,
    errcode_ret: *mut cl_int,
) -> cl_program {
    record("clCreateProgramWithBinary");
    record_handles(&unsafe { list(device_list, num_devices) });
    unsafe { create(errcode_ret) }
}

unsafe fn record_options(options: *const c_char) {
    let options = if options.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(options) }.to_string_lossy().into_owned())
    };
    with_recorder(|r| r.options = options);
}

unsafe extern "system" fn fake_build_program(
    program: cl_program,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    options: *const c_char,
    pfn_notify: ProgramNotify,
    user_data: *mut c_void,
) -> cl_int {
    record("clBuildProgram");
    record_handles(&unsafe { list(device_list, num_devices) });
    unsafe { record_options(options) };
    if let Some(notify) = pfn_notify {
        unsafe { notify(program, user_data) };
    }
    CL_SUCCESS
}

unsafe extern "system" fn fake_compile_program(
    program: cl_program,
    _num_devices: cl_uint,
    _device_list: *const cl_device_id,
    options: *const c_char,
    num_input_headers: cl_uint,
    input_headers: *const cl_program,
    _header_include_names: *const *const c_char,
    pfn_notify: ProgramNotify,
    user_data: *mut c_void,
) -> cl_int {
    record("clCompileProgram");
    record_handles(&unsafe { list(input_headers, num_input_headers) });
    unsafe { record_options(options) };
    if let Some(notify) = pfn_notify {
        unsafe { notify(program, user_data) };
    }
    CL_SUCCESS
}

unsafe extern "system" fn fake_link_program(
    _context: cl_context,
    _num_devices: cl_uint,
    _device_list: *const cl_device_id,
    options: *const c_char,
    num_input_programs: cl_uint,
    input_programs: *const cl_program,
    pfn_notify: ProgramNotify,
    user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_program {
    record("clLinkProgram");
    record_handles(&unsafe { list(input_programs, num_input_programs) });
    unsafe { record_options(options) };
    let program: cl_program = unsafe { create(errcode_ret) };
    if !program.is_null() {
        if let Some(notify) = pfn_notify {
            unsafe { notify(program, user_data) };
        }
    }
    program
}

unsafe extern "system" fn fake_get_program_build_info(
    program: cl_program,
    device: cl_device_id,
    _param_name: cl_program_build_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    record("clGetProgramBuildInfo");
    record_handles(&[program as usize, device as usize]);
    unsafe { answer(b"build log\0", size, value, size_ret) }
}

unsafe extern "system" fn fake_create_kernel(
    program: cl_program,
    _kernel_name: *const c_char,
    errcode_ret: *mut cl_int,
) -> cl_kernel {
    record("clCreateKernel");
    record_handles(&[program as usize]);
    unsafe { create(errcode_ret) }
}

unsafe extern "system" fn fake_create_kernels_in_program(
    program: cl_program,
    num_kernels: cl_uint,
    kernels: *mut cl_kernel,
    num_kernels_ret: *mut cl_uint,
) -> cl_int {
    record("clCreateKernelsInProgram");
    record_handles(&[program as usize]);
    if !kernels.is_null() {
        for i in 0..num_kernels.min(2) as usize {
            unsafe { *kernels.add(i) = mint() };
        }
    }
    if !num_kernels_ret.is_null() {
        unsafe { *num_kernels_ret = 2 };
    }
    CL_SUCCESS
}

unsafe extern "system" fn fake_set_kernel_arg(
    kernel: cl_kernel,
    arg_index: cl_uint,
    arg_size: usize,
    arg_value: *const c_void,
) -> cl_int {
    record("clSetKernelArg");
    record_handles(&[kernel as usize]);
    let value = if arg_value.is_null() || arg_size != std::mem::size_of::<usize>() {
        None
    } else {
        Some(unsafe { ptr::read_unaligned(arg_value.cast::<usize>()) })
    };
    with_recorder(|r| r.kernel_arg = Some((arg_index, arg_size, value)));
    CL_SUCCESS
}

unsafe extern "system" fn fake_get_kernel_arg_info(
    _kernel: cl_kernel,
    arg_index: cl_uint,
    param_name: cl_kernel_arg_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    let qualifier = match arg_index {
        ARG_GLOBAL => CL_KERNEL_ARG_ADDRESS_GLOBAL,
        ARG_CONSTANT => CL_KERNEL_ARG_ADDRESS_CONSTANT,
        ARG_SAMPLER | ARG_INT => CL_KERNEL_ARG_ADDRESS_PRIVATE,
        _ => return CL_KERNEL_ARG_INFO_NOT_AVAILABLE,
    };
    match param_name {
        CL_KERNEL_ARG_ADDRESS_QUALIFIER => unsafe { answer(bytes_of(&qualifier), size, value, size_ret) },
        CL_KERNEL_ARG_TYPE_NAME => {
            let name: &[u8] = match arg_index {
                ARG_SAMPLER => b"sampler_t\0",
                ARG_INT => b"int\0",
                _ => b"float*\0",
            };
            unsafe { answer(name, size, value, size_ret) }
        }
        _ => CL_INVALID_VALUE,
    }
}

unsafe extern "system" fn fake_get_kernel_work_group_info(
    kernel: cl_kernel,
    device: cl_device_id,
    _param_name: cl_kernel_work_group_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    record("clGetKernelWorkGroupInfo");
    record_handles(&[kernel as usize, device as usize]);
    unsafe { answer(bytes_of(&64usize), size, value, size_ret) }
}

unsafe extern "system" fn fake_wait_for_events(num_events: cl_uint, event_list: *const cl_event) -> cl_int {
    record("clWaitForEvents");
    record_handles(&unsafe { list(event_list, num_events) });
    CL_SUCCESS
}

unsafe extern "system" fn fake_get_event_info(
    event: cl_event,
    _param_name: cl_event_info,
    size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> cl_int {
    record("clGetEventInfo");
    record_handles(&[event as usize]);
    unsafe { answer(bytes_of(&CL_COMPLETE), size, value, size_ret) }
}

unsafe extern "system" fn fake_set_event_callback(
    event: cl_event,
    callback_type: cl_int,
    pfn_notify: EventNotify,
    user_data: *mut c_void,
) -> cl_int {
    record("clSetEventCallback");
    record_handles(&[event as usize]);
    match pfn_notify {
        Some(notify) => {
            unsafe { notify(event, callback_type, user_data) };
            CL_SUCCESS
        }
        None => CL_INVALID_VALUE,
    }
}

unsafe extern "system" fn fake_create_user_event(context: cl_context, errcode_ret: *mut cl_int) -> cl_event {
    record("clCreateUserEvent");
    record_handles(&[context as usize]);
    unsafe { create(errcode_ret) }
}

/// Records an enqueued command and produces its event.
unsafe fn enqueued(
    name: &'static str,
    handles: &[usize],
    num_events: cl_uint,
    wait_list: *const cl_event,
    event: *mut cl_event,
) -> cl_int {
    record(name);
    record_handles(handles);
    let waits = unsafe { list(wait_list, num_events) };
    with_recorder(|r| r.waits = waits);
    if !event.is_null() {
        unsafe { *event = mint() };
    }
    CL_SUCCESS
}

unsafe extern "system" fn fake_enqueue_read_buffer(
    queue: cl_command_queue,
    buffer: cl_mem,
    _blocking: cl_bool,
    _offset: usize,
    _size: usize,
    _host_ptr: *mut c_void,
    num_events: cl_uint,
    wait_list: *const cl_event,
    event: *mut cl_event,
) -> cl_int {
    unsafe { enqueued("clEnqueueReadBuffer", &[queue as usize, buffer as usize], num_events, wait_list, event) }
}

unsafe extern "system" fn fake_enqueue_copy_buffer(
    queue: cl_command_queue,
    src: cl_mem,
    dst: cl_mem,
    _src_offset: usize,
    _dst_offset: usize,
    _size: usize,
    num_events: cl_uint,
    wait_list: *const cl_event,
    event: *mut cl_event,
) -> cl_int {
    unsafe {
        enqueued(
            "clEnqueueCopyBuffer",
            &[queue as usize, src as usize, dst as usize],
            num_events,
            wait_list,
            event,
        )
    }
}

unsafe extern "system" fn fake_enqueue_map_buffer(
    queue: cl_command_queue,
    buffer: cl_mem,
    _blocking: cl_bool,
    _flags: cl_map_flags,
    offset: usize,
    _size: usize,
    num_events: cl_uint,
    wait_list: *const cl_event,
    event: *mut cl_event,
    errcode_ret: *mut cl_int,
) -> *mut c_void {
    let status =
        unsafe { enqueued("clEnqueueMapBuffer", &[queue as usize, buffer as usize], num_events, wait_list, event) };
    if !errcode_ret.is_null() {
        unsafe { *errcode_ret = status };
    }
    (0x7000_0000 + offset) as *mut c_void
}

unsafe extern "system" fn fake_enqueue_unmap(
    queue: cl_command_queue,
    memobj: cl_mem,
    _mapped: *mut c_void,
    num_events: cl_uint,
    wait_list: *const cl_event,
    event: *mut cl_event,
) -> cl_int {
    unsafe { enqueued("clEnqueueUnmapMemObject", &[queue as usize, memobj as usize], num_events, wait_list, event) }
}

unsafe extern "system" fn fake_enqueue_migrate(
    queue: cl_command_queue,
    num_mem_objects: cl_uint,
    mem_objects: *const cl_mem,
    _flags: cl_mem_migration_flags,
    num_events: cl_uint,
    wait_list: *const cl_event,
    event: *mut cl_event,
) -> cl_int {
    let mut handles = vec![queue as usize];
    handles.extend(unsafe { list(mem_objects, num_mem_objects) });
    unsafe { enqueued("clEnqueueMigrateMemObjects", &handles, num_events, wait_list, event) }
}

unsafe extern "system" fn fake_enqueue_nd_range_kernel(
    queue: cl_command_queue,
    kernel: cl_kernel,
    _work_dim: cl_uint,
    _offset: *const usize,
    _global: *const usize,
    _local: *const usize,
    num_events: cl_uint,
    wait_list: *const cl_event,
    event: *mut cl_event,
) -> cl_int {
    unsafe { enqueued("clEnqueueNDRangeKernel", &[queue as usize, kernel as usize], num_events, wait_list, event) }
}

unsafe extern "system" fn fake_enqueue_marker(queue: cl_command_queue, event: *mut cl_event) -> cl_int {
    unsafe { enqueued("clEnqueueMarker", &[queue as usize], 0, ptr::null(), event) }
}

unsafe extern "system" fn fake_enqueue_wait_for_events(
    queue: cl_command_queue,
    num_events: cl_uint,
    event_list: *const cl_event,
) -> cl_int {
    unsafe { enqueued("clEnqueueWaitForEvents", &[queue as usize], num_events, event_list, ptr::null_mut()) }
}

unsafe extern "system" fn fake_enqueue_marker_with_wait_list(
    queue: cl_command_queue,
    num_events: cl_uint,
    wait_list: *const cl_event,
    event: *mut cl_event,
) -> cl_int {
    unsafe { enqueued("clEnqueueMarkerWithWaitList", &[queue as usize], num_events, wait_list, event) }
}

/// The fake's entry points. Slots left empty model an implementation that
/// lacks them.
pub fn fake_table() -> IcdDispatch {
    let mut t = IcdDispatch::EMPTY;
    t.clGetPlatformIDs = Some(fake_get_platform_ids);
    t.clGetPlatformInfo = Some(fake_get_platform_info);
    t.clGetDeviceIDs = Some(fake_get_device_ids);
    t.clGetDeviceInfo = Some(fake_get_device_info);
    t.clRetainDevice = Some(fake_retain_device);
    t.clReleaseDevice = Some(fake_release_device);
    t.clCreateContext = Some(fake_create_context);
    t.clCreateContextFromType = Some(fake_create_context_from_type);
    t.clRetainContext = Some(fake_retain_context);
    t.clReleaseContext = Some(fake_release_context);
    t.clGetContextInfo = Some(fake_get_context_info);
    t.clCreateCommandQueue = Some(fake_create_command_queue);
    t.clRetainCommandQueue = Some(fake_retain_queue);
    t.clReleaseCommandQueue = Some(fake_release_queue);
    t.clGetCommandQueueInfo = Some(fake_get_command_queue_info);
    t.clFlush = Some(fake_flush);
    t.clFinish = Some(fake_finish);
    t.clCreateBuffer = Some(fake_create_buffer);
    t.clCreateSubBuffer = Some(fake_create_sub_buffer);
    t.clCreateImage = Some(fake_create_image);
    t.clRetainMemObject = Some(fake_retain_mem);
    t.clReleaseMemObject = Some(fake_release_mem);
    t.clGetMemObjectInfo = Some(fake_get_mem_object_info);
    t.clSetMemObjectDestructorCallback = Some(fake_set_mem_object_destructor_callback);
    t.clCreateSampler = Some(fake_create_sampler);
    t.clRetainSampler = Some(fake_retain_sampler);
    t.clReleaseSampler = Some(fake_release_sampler);
    t.clCreateProgramWithSource = Some(fake_create_program_with_source);
    t.clCreateProgramWithBinary = Some(fake_create_program_with_binary);
    t.clRetainProgram = Some(fake_retain_program);
    t.clReleaseProgram = Some(fake_release_program);
    t.clBuildProgram = Some(fake_build_program);
    t.clCompileProgram = Some(fake_compile_program);
    t.clLinkProgram = Some(fake_link_program);
    t.clGetProgramBuildInfo = Some(fake_get_program_build_info);
    t.clCreateKernel = Some(fake_create_kernel);
    t.clCreateKernelsInProgram = Some(fake_create_kernels_in_program);
    t.clRetainKernel = Some(fake_retain_kernel);
    t.clReleaseKernel = Some(fake_release_kernel);
    t.clSetKernelArg = Some(fake_set_kernel_arg);
    t.clGetKernelArgInfo = Some(fake_get_kernel_arg_info);
    t.clGetKernelWorkGroupInfo = Some(fake_get_kernel_work_group_info);
    t.clWaitForEvents = Some(fake_wait_for_events);
    t.clGetEventInfo = Some(fake_get_event_info);
    t.clRetainEvent = Some(fake_retain_event);
    t.clReleaseEvent = Some(fake_release_event);
    t.clSetEventCallback = Some(fake_set_event_callback);
    t.clCreateUserEvent = Some(fake_create_user_event);
    t.clEnqueueReadBuffer = Some(fake_enqueue_read_buffer);
    t.clEnqueueCopyBuffer = Some(fake_enqueue_copy_buffer);
    t.clEnqueueMapBuffer = Some(fake_enqueue_map_buffer);
    t.clEnqueueUnmapMemObject = Some(fake_enqueue_unmap);
    t.clEnqueueMigrateMemObjects = Some(fake_enqueue_migrate);
    t.clEnqueueNDRangeKernel = Some(fake_enqueue_nd_range_kernel);
    t.clEnqueueMarker = Some(fake_enqueue_marker);
    t.clEnqueueWaitForEvents = Some(fake_enqueue_wait_for_events);
    t.clEnqueueMarkerWithWaitList = Some(fake_enqueue_marker_with_wait_list);
    t
}

// ── Setup helpers ─────────────────────────────────────────────────────

static INSTALL: Once = Once::new();

/// The driver's platform, backed by the fake implementation.
pub fn platform() -> cl_platform_id {
    INSTALL.call_once(|| {
        assert!(oiw::set_real_driver(RealDriver::from_table(fake_table())));
    });
    let mut platform: cl_platform_id = ptr::null_mut();
    let mut count: cl_uint = 0;
    let rc = unsafe { oiw::clIcdGetPlatformIDsKHR(1, &mut platform, &mut count) };
    assert_eq!(rc, CL_SUCCESS);
    assert_eq!(count, 1);
    platform
}

pub fn devices() -> Vec<cl_device_id> {
    let platform = platform();
    let mut devices = vec![ptr::null_mut(); REAL_DEVICES.len()];
    let rc = cl!(clGetDeviceIDs(
        platform,
        CL_DEVICE_TYPE_ALL,
        devices.len() as cl_uint,
        devices.as_mut_ptr(),
        ptr::null_mut()
    ));
    assert_eq!(rc, CL_SUCCESS);
    devices
}

pub fn context() -> cl_context {
    let devices = devices();
    let mut err = 1;
    let ctx = cl!(clCreateContext(
        ptr::null(),
        devices.len() as cl_uint,
        devices.as_ptr(),
        None,
        ptr::null_mut(),
        &mut err
    ));
    assert_eq!(err, CL_SUCCESS);
    assert!(!ctx.is_null());
    ctx
}

pub fn queue(context: cl_context) -> cl_command_queue {
    let mut err = 1;
    let q = cl!(clCreateCommandQueue(context, devices()[0], 0, &mut err));
    assert_eq!(err, CL_SUCCESS);
    q
}

pub fn buffer(context: cl_context, size: usize) -> cl_mem {
    let mut err = 1;
    let mem = cl!(clCreateBuffer(context, 0, size, ptr::null_mut(), &mut err));
    assert_eq!(err, CL_SUCCESS);
    mem
}

pub fn program(context: cl_context) -> cl_program {
    let source = c"kernel void k(global float* a) {}";
    let strings = [source.as_ptr()];
    let mut err = 1;
    let p = cl!(clCreateProgramWithSource(context, 1, strings.as_ptr(), ptr::null(), &mut err));
    assert_eq!(err, CL_SUCCESS);
    p
}

pub fn kernel(program: cl_program) -> cl_kernel {
    let mut err = 1;
    let k = cl!(clCreateKernel(program, c"k".as_ptr(), &mut err));
    assert_eq!(err, CL_SUCCESS);
    k
}

/// The real handle behind a wrapped one.
pub fn real<T: Wrapped>(handle: T::Handle) -> T::Handle {
    unsafe { T::ref_from(handle) }.expect("wrapped handle").inner()
}

/// Reads a pointer-sized query result.
pub fn query_handle<H>(
    query: unsafe extern "system" fn(H, cl_uint, usize, *mut c_void, *mut usize) -> cl_int,
    handle: H,
    param: cl_uint,
) -> usize {
    let mut out = 0usize;
    let rc = unsafe {
        query(
            handle,
            param,
            std::mem::size_of::<usize>(),
            (&mut out as *mut usize).cast(),
            ptr::null_mut(),
        )
    };
    assert_eq!(rc, CL_SUCCESS);
    out
}
