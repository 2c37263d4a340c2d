//! Trampolines for application callbacks that receive handles.
//!
//! The real implementation invokes its callbacks with real handles. Each
//! registration therefore passes one of the trampolines below together with
//! a [`Trampoline`] state as `user_data`; the trampoline swaps in the wrapped
//! handle before calling the application. The state keeps the wrapper record
//! alive until the callback has run.

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::objects::{Event, Mem, Program, Wrapped};
use crate::types::*;

pub type ProgramFn = unsafe extern "system" fn(cl_program, *mut c_void);
pub type EventFn = unsafe extern "system" fn(cl_event, cl_int, *mut c_void);
pub type MemFn = unsafe extern "system" fn(cl_mem, *mut c_void);

/// State of one registered callback.
pub struct Trampoline<T, F> {
    target: Arc<T>,
    notify: F,
    user_data: *mut c_void,
    /// Set by whichever side consumes the reference held for the real
    /// implementation: the callback, or the registering call on failure.
    fired: AtomicBool,
}

// SAFETY: `user_data` is opaque to this driver and only handed back to the
// application's callback, as the real implementation would.
unsafe impl<T: Send + Sync, F: Send> Send for Trampoline<T, F> {}
unsafe impl<T: Send + Sync, F: Sync> Sync for Trampoline<T, F> {}

impl<T: Wrapped, F: Copy> Trampoline<T, F> {
    /// State for `notify`, if the application passed one.
    pub fn arm(target: &Arc<T>, notify: Option<F>, user_data: *mut c_void) -> Option<Arc<Self>> {
        notify.map(|notify| {
            Arc::new(Self {
                target: Arc::clone(target),
                notify,
                user_data,
                fired: AtomicBool::new(false),
            })
        })
    }

    /// `user_data` to register with the real implementation. It carries a
    /// strong reference that the callback consumes.
    pub fn real_user_data(state: &Option<Arc<Self>>) -> *mut c_void {
        match state {
            Some(state) => Arc::into_raw(Arc::clone(state)).cast_mut().cast(),
            None => ptr::null_mut(),
        }
    }

    /// Settles the registration after the real call returned `status`. On
    /// failure the reference held for the real side is reclaimed unless the
    /// callback already ran.
    pub fn settle(state: &Option<Arc<Self>>, status: cl_int) {
        if status == CL_SUCCESS {
            return;
        }
        if let Some(state) = state {
            if !state.fired.swap(true, Ordering::AcqRel) {
                unsafe { Arc::decrement_strong_count(Arc::as_ptr(state)) };
            }
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Takes the state back from `user_data`, at most once.
    ///
    /// # Safety
    /// `user_data` must come from [`Trampoline::real_user_data`].
    unsafe fn claim(user_data: *mut c_void) -> Option<Arc<Self>> {
        let state = user_data.cast_const().cast::<Self>();
        if unsafe { (*state).fired.swap(true, Ordering::AcqRel) } {
            return None;
        }
        Some(unsafe { Arc::from_raw(state) })
    }
}

pub type ProgramTrampoline = Trampoline<Program, ProgramFn>;
pub type EventTrampoline = Trampoline<Event, EventFn>;
pub type MemTrampoline = Trampoline<Mem, MemFn>;

/// Build, compile and link notification.
pub unsafe extern "system" fn program_notify(real: cl_program, user_data: *mut c_void) {
    let Some(state) = (unsafe { ProgramTrampoline::claim(user_data) }) else {
        return;
    };
    // A program being linked gets its real handle here at the earliest.
    if state.target.inner().is_null() {
        state.target.bind(real);
    }
    trace!("program notify");
    unsafe { (state.notify)(state.target.handle(), state.user_data) };
}

/// `clSetEventCallback` notification.
pub unsafe extern "system" fn event_notify(_real: cl_event, status: cl_int, user_data: *mut c_void) {
    let Some(state) = (unsafe { EventTrampoline::claim(user_data) }) else {
        return;
    };
    trace!(status, "event notify");
    unsafe { (state.notify)(state.target.handle(), status, state.user_data) };
}

/// Memory object destructor notification.
pub unsafe extern "system" fn mem_destructor_notify(_real: cl_mem, user_data: *mut c_void) {
    let Some(state) = (unsafe { MemTrampoline::claim(user_data) }) else {
        return;
    };
    trace!("mem destructor notify");
    unsafe { (state.notify)(state.target.handle(), state.user_data) };
}
