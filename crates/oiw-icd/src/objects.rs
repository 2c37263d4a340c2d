//! Wrapper records behind every handle this driver returns.
//!
//! Each record is `#[repr(C)]` and starts with an [`IcdBase`], so a pointer
//! to it is a valid ICD handle: the loader finds [`DISPATCH`] in the first
//! pointer-sized slot. Records are reference counted with `Arc`; a handle
//! given to the application owns one strong count, created by
//! [`Wrapped::into_handle`], and parent records are held as `Arc` so they
//! outlive their children.

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::dispatch::{IcdDispatch, DISPATCH};
use crate::driver::RealDriver;
use crate::error::CLResult;
use crate::types::*;

/// Type tag stored after the dispatch pointer.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Platform = 0x6f69_7701,
    Device,
    Context,
    Queue,
    Mem,
    Sampler,
    Program,
    Kernel,
    Event,
}

#[repr(C)]
pub struct IcdBase {
    dispatch: &'static IcdDispatch,
    kind: u32,
}

impl IcdBase {
    fn new(kind: ObjectKind) -> Self {
        Self {
            dispatch: &DISPATCH,
            kind: kind as u32,
        }
    }

    /// Whether `obj` points at one of this driver's records of `kind`.
    ///
    /// # Safety
    /// `obj` must be null or a handle of some OpenCL implementation, whose
    /// first field is a dispatch pointer.
    unsafe fn is(obj: *const c_void, kind: ObjectKind) -> bool {
        if obj.is_null() {
            return false;
        }
        // The tag is only read once the dispatch pointer proves the record
        // is ours; foreign handles may be shorter than an IcdBase.
        let base = obj.cast::<IcdBase>();
        let dispatch = unsafe { ptr::read(ptr::addr_of!((*base).dispatch).cast::<*const IcdDispatch>()) };
        if !ptr::eq(dispatch, &DISPATCH) {
            return false;
        }
        unsafe { (*base).kind == kind as u32 }
    }
}

/// Conversions between a wrapper record and the handle the application sees.
pub trait Wrapped: Sized {
    /// The OpenCL handle type; real and wrapped handles share it.
    type Handle: Copy;
    const KIND: ObjectKind;
    /// Status reported for a null, foreign or mistyped handle.
    const INVALID: cl_int;

    fn from_raw_handle(handle: Self::Handle) -> *const Self;
    fn to_raw_handle(obj: *const Self) -> Self::Handle;

    /// The real handle this record wraps.
    fn inner(&self) -> Self::Handle;
    fn driver(&self) -> &RealDriver;

    /// Borrows the record behind `handle`.
    ///
    /// # Safety
    /// `handle` must be null or a live OpenCL handle.
    unsafe fn ref_from<'a>(handle: Self::Handle) -> CLResult<&'a Self> {
        let obj = Self::from_raw_handle(handle);
        if unsafe { IcdBase::is(obj.cast(), Self::KIND) } {
            Ok(unsafe { &*obj })
        } else {
            Err(Self::INVALID)
        }
    }

    /// Takes a new strong reference to the record behind `handle`.
    ///
    /// # Safety
    /// `handle` must be null or a live OpenCL handle.
    unsafe fn arc_from(handle: Self::Handle) -> CLResult<Arc<Self>> {
        let obj = Self::from_raw_handle(handle);
        if unsafe { IcdBase::is(obj.cast(), Self::KIND) } {
            unsafe {
                Arc::increment_strong_count(obj);
                Ok(Arc::from_raw(obj))
            }
        } else {
            Err(Self::INVALID)
        }
    }

    /// Hands one strong reference to the application.
    fn into_handle(self: Arc<Self>) -> Self::Handle {
        Self::to_raw_handle(Arc::into_raw(self))
    }

    /// The handle of a record without transferring a reference.
    fn handle(self: &Arc<Self>) -> Self::Handle {
        Self::to_raw_handle(Arc::as_ptr(self))
    }

    /// Adds an application reference to an already validated handle.
    ///
    /// # Safety
    /// `handle` must have passed [`Wrapped::ref_from`].
    unsafe fn retain_handle(handle: Self::Handle) {
        unsafe { Arc::increment_strong_count(Self::from_raw_handle(handle)) }
    }

    /// Drops an application reference, freeing the record with the last one.
    ///
    /// # Safety
    /// `handle` must have passed [`Wrapped::ref_from`] and carry a reference
    /// owned by the application.
    unsafe fn release_handle(handle: Self::Handle) {
        unsafe { Arc::decrement_strong_count(Self::from_raw_handle(handle)) }
    }
}

macro_rules! wrapped {
    ($ty:ident, $handle:ty, $kind:ident, $invalid:expr, |$s:ident| $driver:expr) => {
        impl Wrapped for $ty {
            type Handle = $handle;
            const KIND: ObjectKind = ObjectKind::$kind;
            const INVALID: cl_int = $invalid;

            fn from_raw_handle(handle: $handle) -> *const Self {
                handle.cast_const().cast()
            }

            fn to_raw_handle(obj: *const Self) -> $handle {
                obj.cast_mut().cast()
            }

            fn inner(&self) -> $handle {
                self.inner
            }

            fn driver(&$s) -> &RealDriver {
                $driver
            }
        }

        // SAFETY: real handles are only passed back to the real
        // implementation, which is itself thread-safe.
        unsafe impl Send for $ty {}
        unsafe impl Sync for $ty {}
    };
}

// ── Platform ──────────────────────────────────────────────────────────

#[repr(C)]
pub struct Platform {
    pub base: IcdBase,
    pub inner: cl_platform_id,
    driver: Arc<RealDriver>,
    /// Device records by real handle, so a device keeps one wrapper.
    devices: DashMap<usize, Arc<Device>>,
}

wrapped!(Platform, cl_platform_id, Platform, CL_INVALID_PLATFORM, |self| &self.driver);

impl Platform {
    pub fn new(driver: Arc<RealDriver>, inner: cl_platform_id) -> Arc<Self> {
        Arc::new(Self {
            base: IcdBase::new(ObjectKind::Platform),
            inner,
            driver,
            devices: DashMap::new(),
        })
    }

    /// The record for real device `real`, created on first sight.
    ///
    /// Device records live as long as the platform does.
    pub fn device(self: &Arc<Self>, real: cl_device_id) -> Arc<Device> {
        self.devices
            .entry(real as usize)
            .or_insert_with(|| {
                Arc::new(Device {
                    base: IcdBase::new(ObjectKind::Device),
                    inner: real,
                    platform: Arc::clone(self),
                })
            })
            .clone()
    }
}

// ── Device ────────────────────────────────────────────────────────────

#[repr(C)]
pub struct Device {
    pub base: IcdBase,
    pub inner: cl_device_id,
    pub platform: Arc<Platform>,
}

wrapped!(Device, cl_device_id, Device, CL_INVALID_DEVICE, |self| self.platform.driver());

// ── Context ───────────────────────────────────────────────────────────

#[repr(C)]
pub struct Context {
    pub base: IcdBase,
    pub inner: cl_context,
    pub platform: Arc<Platform>,
    /// Devices in the order the context was created with.
    pub devices: Vec<Arc<Device>>,
    /// Property list as the application passed it, terminator included.
    pub properties: Option<Vec<cl_context_properties>>,
}

wrapped!(Context, cl_context, Context, CL_INVALID_CONTEXT, |self| self.platform.driver());

impl Context {
    pub fn new(
        platform: Arc<Platform>,
        inner: cl_context,
        devices: Vec<Arc<Device>>,
        properties: Option<Vec<cl_context_properties>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            base: IcdBase::new(ObjectKind::Context),
            inner,
            platform,
            devices,
            properties,
        })
    }

    pub fn device_handles(&self) -> Vec<cl_device_id> {
        self.devices.iter().map(|d| d.handle()).collect()
    }
}

// ── Command queue ─────────────────────────────────────────────────────

#[repr(C)]
pub struct Queue {
    pub base: IcdBase,
    pub inner: cl_command_queue,
    pub context: Arc<Context>,
    pub device: Arc<Device>,
}

wrapped!(Queue, cl_command_queue, Queue, CL_INVALID_COMMAND_QUEUE, |self| self.context.driver());

impl Queue {
    pub fn new(context: Arc<Context>, device: Arc<Device>, inner: cl_command_queue) -> Arc<Self> {
        Arc::new(Self {
            base: IcdBase::new(ObjectKind::Queue),
            inner,
            context,
            device,
        })
    }
}

// ── Memory object ─────────────────────────────────────────────────────

#[repr(C)]
pub struct Mem {
    pub base: IcdBase,
    pub inner: cl_mem,
    pub context: Arc<Context>,
    /// Buffer a sub-buffer was carved from.
    pub parent: Option<Arc<Mem>>,
    /// Buffer backing an image created from one.
    pub buffer: Option<Arc<Mem>>,
}

wrapped!(Mem, cl_mem, Mem, CL_INVALID_MEM_OBJECT, |self| self.context.driver());

impl Mem {
    pub fn new(
        context: Arc<Context>,
        inner: cl_mem,
        parent: Option<Arc<Mem>>,
        buffer: Option<Arc<Mem>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            base: IcdBase::new(ObjectKind::Mem),
            inner,
            context,
            parent,
            buffer,
        })
    }
}

// ── Sampler ───────────────────────────────────────────────────────────

#[repr(C)]
pub struct Sampler {
    pub base: IcdBase,
    pub inner: cl_sampler,
    pub context: Arc<Context>,
}

wrapped!(Sampler, cl_sampler, Sampler, CL_INVALID_SAMPLER, |self| self.context.driver());

impl Sampler {
    pub fn new(context: Arc<Context>, inner: cl_sampler) -> Arc<Self> {
        Arc::new(Self {
            base: IcdBase::new(ObjectKind::Sampler),
            inner,
            context,
        })
    }
}

// ── Program ───────────────────────────────────────────────────────────

#[repr(C)]
pub struct Program {
    pub base: IcdBase,
    /// Null until a link completes; see `clLinkProgram`.
    inner: AtomicPtr<_cl_program>,
    pub context: Arc<Context>,
    /// Devices named at creation, when the program was not created for the
    /// whole context.
    devices: Option<Vec<Arc<Device>>>,
}

impl Wrapped for Program {
    type Handle = cl_program;
    const KIND: ObjectKind = ObjectKind::Program;
    const INVALID: cl_int = CL_INVALID_PROGRAM;

    fn from_raw_handle(handle: cl_program) -> *const Self {
        handle.cast_const().cast()
    }

    fn to_raw_handle(obj: *const Self) -> cl_program {
        obj.cast_mut().cast()
    }

    fn inner(&self) -> cl_program {
        self.inner.load(Ordering::Acquire)
    }

    fn driver(&self) -> &RealDriver {
        self.context.driver()
    }
}

unsafe impl Send for Program {}
unsafe impl Sync for Program {}

impl Program {
    pub fn new(
        context: Arc<Context>,
        inner: cl_program,
        devices: Option<Vec<Arc<Device>>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            base: IcdBase::new(ObjectKind::Program),
            inner: AtomicPtr::new(inner),
            context,
            devices,
        })
    }

    /// Attach the real program once it is known.
    pub fn bind(&self, inner: cl_program) {
        self.inner.store(inner, Ordering::Release);
    }

    pub fn devices(&self) -> &[Arc<Device>] {
        self.devices.as_deref().unwrap_or(&self.context.devices)
    }
}

// ── Kernel ────────────────────────────────────────────────────────────

#[repr(C)]
pub struct Kernel {
    pub base: IcdBase,
    pub inner: cl_kernel,
    pub program: Arc<Program>,
}

wrapped!(Kernel, cl_kernel, Kernel, CL_INVALID_KERNEL, |self| self.program.driver());

impl Kernel {
    pub fn new(program: Arc<Program>, inner: cl_kernel) -> Arc<Self> {
        Arc::new(Self {
            base: IcdBase::new(ObjectKind::Kernel),
            inner,
            program,
        })
    }
}

// ── Event ─────────────────────────────────────────────────────────────

#[repr(C)]
pub struct Event {
    pub base: IcdBase,
    pub inner: cl_event,
    pub context: Arc<Context>,
    /// Queue the command was enqueued on; `None` for user events.
    pub queue: Option<Arc<Queue>>,
}

wrapped!(Event, cl_event, Event, CL_INVALID_EVENT, |self| self.context.driver());

impl Event {
    pub fn new(context: Arc<Context>, queue: Option<Arc<Queue>>, inner: cl_event) -> Arc<Self> {
        Arc::new(Self {
            base: IcdBase::new(ObjectKind::Event),
            inner,
            context,
            queue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::IcdDispatch;

    fn platform() -> Arc<Platform> {
        let driver = Arc::new(RealDriver::from_table(IcdDispatch::EMPTY));
        Platform::new(driver, 0x9100 as cl_platform_id)
    }

    #[test]
    fn handles_start_with_the_dispatch_table() {
        let platform = platform();
        let handle = platform.handle();
        let first = unsafe { *(handle as *const *const IcdDispatch) };
        assert!(ptr::eq(first, &DISPATCH));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let platform = platform();
        let as_device = platform.handle() as cl_device_id;
        assert_eq!(
            unsafe { Device::ref_from(as_device) }.err(),
            Some(CL_INVALID_DEVICE)
        );
        assert!(unsafe { Platform::ref_from(platform.handle()) }.is_ok());
    }

    #[test]
    fn foreign_and_null_handles_are_rejected() {
        // A "foreign" object: its first word is some other dispatch table.
        let other = IcdDispatch::EMPTY;
        let foreign: [*const IcdDispatch; 2] = [&other, ptr::null()];
        let handle = foreign.as_ptr() as cl_context;
        assert_eq!(unsafe { Context::ref_from(handle) }.err(), Some(CL_INVALID_CONTEXT));
        assert_eq!(
            unsafe { Context::ref_from(ptr::null_mut()) }.err(),
            Some(CL_INVALID_CONTEXT)
        );
    }

    #[test]
    fn device_records_are_shared() {
        let platform = platform();
        let a = platform.device(0xd001 as cl_device_id);
        let b = platform.device(0xd001 as cl_device_id);
        let c = platform.device(0xd002 as cl_device_id);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert!(Arc::ptr_eq(&a.platform, &platform));
    }

    #[test]
    fn application_references_keep_records_alive() {
        let platform = platform();
        let context = Context::new(platform, 0xc001 as cl_context, Vec::new(), None);
        let probe = Arc::downgrade(&context);
        let handle = context.into_handle();

        unsafe { Context::retain_handle(handle) };
        unsafe { Context::release_handle(handle) };
        assert!(probe.upgrade().is_some());

        unsafe { Context::release_handle(handle) };
        assert!(probe.upgrade().is_none());
    }

    #[test]
    fn program_devices_fall_back_to_the_context() {
        let platform = platform();
        let dev = platform.device(0xd001 as cl_device_id);
        let context = Context::new(platform.clone(), 0xc001 as cl_context, vec![dev.clone()], None);

        let whole = Program::new(context.clone(), 0xa001 as cl_program, None);
        assert_eq!(whole.devices().len(), 1);
        assert!(Arc::ptr_eq(&whole.devices()[0], &dev));

        let explicit = Program::new(context, ptr::null_mut(), Some(Vec::new()));
        assert!(explicit.devices().is_empty());
        assert!(explicit.inner().is_null());
        explicit.bind(0xa002 as cl_program);
        assert_eq!(explicit.inner(), 0xa002 as cl_program);
    }
}
