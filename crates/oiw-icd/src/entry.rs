//! Macros shared by the entry-point modules.

/// Fetches an entry point of the real implementation, failing the current
/// call with `CL_INVALID_OPERATION` when the implementation lacks it.
macro_rules! real_fn {
    ($api:expr, $name:ident) => {
        match $api.table().$name {
            Some(f) => f,
            None => return Err($crate::driver::missing_entry(stringify!($name))),
        }
    };
}

/// Declares the ABI shell of an entry point around a function returning
/// `CLResult`. The second form is for entry points reporting their status
/// through a trailing `errcode_ret` and returning a handle.
macro_rules! cl_entry {
    ($(#[$meta:meta])* fn $name:ident($($arg:ident: $ty:ty),* $(,)?) => $body:path;) => {
        $(#[$meta])*
        pub unsafe extern "system" fn $name($($arg: $ty),*) -> $crate::types::cl_int {
            $crate::error::status(unsafe { $body($($arg),*) })
        }
    };
    ($(#[$meta:meta])* fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty => $body:path;) => {
        $(#[$meta])*
        pub unsafe extern "system" fn $name(
            $($arg: $ty,)*
            errcode_ret: *mut $crate::types::cl_int,
        ) -> $ret {
            unsafe { $crate::error::with_errcode(errcode_ret, $body($($arg),*)) }
        }
    };
}

/// Declares `clRetainX`/`clReleaseX` for a wrapper type. The wrapper's own
/// count only moves once the real implementation accepted the call, and the
/// record is freed with the last application reference.
macro_rules! refcount_entries {
    ($ty:ident, $retain:ident => $real_retain:ident, $release:ident => $real_release:ident) => {
        pub unsafe extern "system" fn $retain(handle: <$ty as Wrapped>::Handle) -> cl_int {
            $crate::error::status((|| -> CLResult<()> {
                let obj = unsafe { $ty::ref_from(handle) }?;
                let f = real_fn!(obj.driver(), $real_retain);
                check(unsafe { f(obj.inner()) })?;
                unsafe { $ty::retain_handle(handle) };
                Ok(())
            })())
        }

        pub unsafe extern "system" fn $release(handle: <$ty as Wrapped>::Handle) -> cl_int {
            $crate::error::status((|| -> CLResult<()> {
                let obj = unsafe { $ty::ref_from(handle) }?;
                let f = real_fn!(obj.driver(), $real_release);
                check(unsafe { f(obj.inner()) })?;
                unsafe { $ty::release_handle(handle) };
                Ok(())
            })())
        }
    };
}
