//! Dynamic loading of the real OpenCL implementation.
//!
//! Uses `libloading` to open the system OpenCL library (or the one named in
//! the configuration) and collects its entry points into an [`IcdDispatch`].
//! Two kinds of library are understood: one exporting the standard API
//! (`clGetPlatformIDs` and friends), and a vendor ICD exporting only
//! `clIcdGetPlatformIDsKHR`, whose entry points are read from the dispatch
//! table at the start of its platform handle.

use std::ptr;

use libloading::{Library, Symbol};
use oiw_core::config::DriverConfig;
use tracing::{debug, info, warn};

use crate::dispatch::{IcdDispatch, CORE_TABLE_BYTES};
use crate::error::{check, CLResult, DriverError};
use crate::types::*;

type FnGetPlatformIds = unsafe extern "system" fn(cl_uint, *mut cl_platform_id, *mut cl_uint) -> cl_int;

/// Entry points of the real OpenCL implementation.
pub struct RealDriver {
    table: IcdDispatch,
    /// Platform discovery for vendor ICDs; standard libraries use the table.
    discover: Option<FnGetPlatformIds>,
    /// Library the table was resolved from, kept open for its lifetime.
    _lib: Option<Library>,
}

impl RealDriver {
    /// Load the real implementation named by `config`, or the system one.
    pub fn load(config: &DriverConfig) -> Result<Self, DriverError> {
        let (lib, name) = Self::load_library(config)?;

        let (table, found) = unsafe { IcdDispatch::resolve(&lib) };
        if table.clGetPlatformIDs.is_some() {
            info!(library = %name, entry_points = found, "using OpenCL library");
            return Ok(Self {
                table,
                discover: None,
                _lib: Some(lib),
            });
        }

        let discover: FnGetPlatformIds = unsafe { Self::load_fn(&lib, "clIcdGetPlatformIDsKHR") }
            .ok_or_else(|| DriverError::NoEntryPoint {
                library: name.clone(),
            })?;

        let mut platform: cl_platform_id = ptr::null_mut();
        let status = unsafe { discover(1, &mut platform, ptr::null_mut()) };
        if status != CL_SUCCESS || platform.is_null() {
            return Err(DriverError::NoPlatform {
                library: name,
                status,
            });
        }
        let table = unsafe { Self::vendor_table(platform) };
        info!(library = %name, "using vendor ICD");
        Ok(Self {
            table,
            discover: Some(discover),
            _lib: Some(lib),
        })
    }

    /// Build a driver around an already populated table.
    pub fn from_table(table: IcdDispatch) -> Self {
        Self {
            table,
            discover: None,
            _lib: None,
        }
    }

    pub fn table(&self) -> &IcdDispatch {
        &self.table
    }

    /// Query the real implementation for its platforms.
    pub fn platform_ids(
        &self,
        num_entries: cl_uint,
        platforms: *mut cl_platform_id,
        num_platforms: *mut cl_uint,
    ) -> CLResult<()> {
        let f = match self.discover {
            Some(f) => f,
            None => real_fn!(self, clGetPlatformIDs),
        };
        check(unsafe { f(num_entries, platforms, num_platforms) })
    }

    fn load_library(config: &DriverConfig) -> Result<(Library, String), DriverError> {
        let candidates: Vec<&str> = match config.library.as_deref() {
            Some(library) => vec![library],
            None => oiw_common::platform::default_opencl_libraries().to_vec(),
        };

        let mut last_err = String::new();
        for name in candidates {
            match unsafe { Library::new(name) } {
                Ok(lib) => {
                    debug!("opened {}", name);
                    return Ok((lib, name.to_string()));
                }
                Err(e) => {
                    last_err = format!("{}: {}", name, e);
                    debug!("failed to load {}: {}", name, e);
                }
            }
        }

        Err(DriverError::LibraryNotFound(last_err))
    }

    unsafe fn load_fn<F: Copy>(lib: &Library, name: &str) -> Option<F> {
        unsafe { lib.get(name.as_bytes()) }.ok().map(|s: Symbol<F>| *s)
    }

    /// Copy the OpenCL 1.2 part of the table a vendor handle points at.
    ///
    /// # Safety
    /// `platform` must be a live handle of an ICD-conformant implementation.
    unsafe fn vendor_table(platform: cl_platform_id) -> IcdDispatch {
        let mut table = IcdDispatch::EMPTY;
        unsafe {
            let vendor = *(platform as *const *const IcdDispatch);
            ptr::copy_nonoverlapping(
                vendor.cast::<u8>(),
                (&mut table as *mut IcdDispatch).cast::<u8>(),
                CORE_TABLE_BYTES,
            );
        }
        table
    }
}

/// Status for a call whose real entry point is absent.
pub fn missing_entry(name: &str) -> cl_int {
    warn!(entry_point = name, "real implementation does not provide entry point");
    CL_INVALID_OPERATION
}
