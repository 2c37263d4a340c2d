//! Translation of caller arguments into what the real implementation expects.
//!
//! Lists of wrapped handles become owned `Vec`s of real handles that live in
//! the calling frame and are dropped on every return path.

use std::ffi::{c_char, CStr, CString};
use std::ptr;
use std::slice;
use std::sync::Arc;

use crate::error::CLResult;
use crate::objects::{Platform, Wrapped};
use crate::types::*;

/// Compiler flag that keeps kernel argument metadata available for
/// `clSetKernelArg` translation.
pub const ARG_INFO_FLAG: &str = "-cl-kernel-arg-info";

pub(crate) fn reserve<T>(len: usize) -> CLResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| CL_OUT_OF_HOST_MEMORY)?;
    Ok(v)
}

/// Views a caller array; a null pointer or zero count is an empty list.
///
/// # Safety
/// A non-null `list` must be valid for `count` elements.
unsafe fn caller_slice<'a, T>(list: *const T, count: cl_uint) -> &'a [T] {
    if list.is_null() || count == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(list, count as usize) }
    }
}

/// Real handles for a list of wrapped ones.
///
/// # Safety
/// A non-null `list` must be valid for `count` elements.
pub unsafe fn inner_handles<T: Wrapped>(list: *const T::Handle, count: cl_uint) -> CLResult<Vec<T::Handle>> {
    let handles = unsafe { caller_slice(list, count) };
    let mut out = reserve(handles.len())?;
    for &h in handles {
        out.push(unsafe { T::ref_from(h) }?.inner());
    }
    Ok(out)
}

/// Strong references to the records behind a list of handles.
///
/// # Safety
/// A non-null `list` must be valid for `count` elements.
pub unsafe fn records<T: Wrapped>(list: *const T::Handle, count: cl_uint) -> CLResult<Vec<Arc<T>>> {
    let handles = unsafe { caller_slice(list, count) };
    let mut out = reserve(handles.len())?;
    for &h in handles {
        out.push(unsafe { T::arc_from(h) }?);
    }
    Ok(out)
}

/// Real handles of already resolved records.
pub fn inners<T: Wrapped>(records: &[Arc<T>]) -> CLResult<Vec<T::Handle>> {
    let mut out = reserve(records.len())?;
    out.extend(records.iter().map(|r| r.inner()));
    Ok(out)
}

/// Real events of a wait list.
///
/// # Safety
/// A non-null `list` must be valid for `count` elements.
pub unsafe fn wait_list(list: *const cl_event, count: cl_uint) -> CLResult<Vec<cl_event>> {
    unsafe { inner_handles::<crate::objects::Event>(list, count) }
        .map_err(|e| if e == CL_INVALID_EVENT { CL_INVALID_EVENT_WAIT_LIST } else { e })
}

/// Pointer to pass for a translated list; empty lists become null.
pub fn list_ptr<T>(list: &[T]) -> *const T {
    if list.is_empty() {
        ptr::null()
    } else {
        list.as_ptr()
    }
}

/// A context property list in both forms: as the application wrote it and
/// with the platform entry pointing at the real platform.
pub struct ContextProperties {
    pub original: Vec<cl_context_properties>,
    pub rewritten: Vec<cl_context_properties>,
    pub platform: Option<Arc<Platform>>,
}

impl ContextProperties {
    /// Reads a zero-terminated key/value list; a null list is `None`.
    ///
    /// # Safety
    /// A non-null `props` must point to a zero-terminated property list.
    pub unsafe fn parse(props: *const cl_context_properties) -> CLResult<Option<Self>> {
        if props.is_null() {
            return Ok(None);
        }

        let mut len = 0;
        while unsafe { *props.add(len) } != 0 {
            len += 2;
        }
        let src = unsafe { slice::from_raw_parts(props, len + 1) };

        let mut original = reserve(src.len())?;
        let mut rewritten = reserve(src.len())?;
        let mut platform = None;
        for pair in src[..len].chunks_exact(2) {
            let (key, value) = (pair[0], pair[1]);
            original.extend_from_slice(pair);
            if key == CL_CONTEXT_PLATFORM {
                let p = unsafe { Platform::arc_from(value as cl_platform_id) }?;
                rewritten.extend_from_slice(&[key, p.inner as cl_context_properties]);
                platform = Some(p);
            } else {
                rewritten.extend_from_slice(pair);
            }
        }
        original.push(0);
        rewritten.push(0);

        Ok(Some(Self {
            original,
            rewritten,
            platform,
        }))
    }
}

/// The caller's build options with [`ARG_INFO_FLAG`] appended.
///
/// # Safety
/// `options` must be null or a NUL-terminated string.
pub unsafe fn with_arg_info(options: *const c_char) -> CLResult<CString> {
    let user = if options.is_null() {
        &[][..]
    } else {
        unsafe { CStr::from_ptr(options) }.to_bytes()
    };

    let mut out = reserve(user.len() + 1 + ARG_INFO_FLAG.len() + 1)?;
    if !user.is_empty() {
        out.extend_from_slice(user);
        out.push(b' ');
    }
    out.extend_from_slice(ARG_INFO_FLAG.as_bytes());
    CString::new(out).map_err(|_| CL_INVALID_VALUE)
}
