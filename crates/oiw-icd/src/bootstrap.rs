//! Process-wide platform state.

use std::cell::Cell;
use std::ptr;
use std::sync::{Arc, OnceLock};

use oiw_core::OiwConfig;
use parking_lot::Mutex;
use tracing::{error, info};

use crate::driver::RealDriver;
use crate::error::CLResult;
use crate::objects::Platform;
use crate::types::*;

/// Lazily created platform record with retry on failure: a failed
/// initialization leaves the cell empty for the next caller.
pub struct PlatformCell {
    slot: OnceLock<Arc<Platform>>,
    init: Mutex<()>,
}

impl PlatformCell {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
            init: parking_lot::const_mutex(()),
        }
    }

    pub fn get(&self) -> Option<&Arc<Platform>> {
        self.slot.get()
    }

    pub fn get_or_try_init<F>(&self, f: F) -> CLResult<&Arc<Platform>>
    where
        F: FnOnce() -> CLResult<Arc<Platform>>,
    {
        if let Some(platform) = self.slot.get() {
            return Ok(platform);
        }
        let _guard = self.init.lock();
        if let Some(platform) = self.slot.get() {
            return Ok(platform);
        }
        let platform = f()?;
        Ok(self.slot.get_or_init(|| platform))
    }
}

impl Default for PlatformCell {
    fn default() -> Self {
        Self::new()
    }
}

static PLATFORM: PlatformCell = PlatformCell::new();
static DRIVER_OVERRIDE: OnceLock<Arc<RealDriver>> = OnceLock::new();

thread_local! {
    static INITIALIZING: Cell<bool> = const { Cell::new(false) };
}

/// Use `driver` instead of loading the configured library. Only effective
/// before the platform is first enumerated; returns false otherwise.
pub fn set_real_driver(driver: RealDriver) -> bool {
    PLATFORM.get().is_none() && DRIVER_OVERRIDE.set(Arc::new(driver)).is_ok()
}

/// The platform, if it has been created already.
pub fn current() -> Option<&'static Arc<Platform>> {
    PLATFORM.get()
}

/// The platform, created on first use.
pub fn platform() -> CLResult<&'static Arc<Platform>> {
    if let Some(platform) = PLATFORM.get() {
        return Ok(platform);
    }
    // The real library may itself be a loader that enumerates every ICD,
    // this one included, while it is being initialized below.
    if INITIALIZING.with(Cell::get) {
        return Err(CL_PLATFORM_NOT_FOUND_KHR);
    }
    INITIALIZING.with(|f| f.set(true));
    let res = PLATFORM.get_or_try_init(create_platform);
    INITIALIZING.with(|f| f.set(false));
    res
}

fn create_platform() -> CLResult<Arc<Platform>> {
    let driver = match DRIVER_OVERRIDE.get() {
        Some(driver) => Arc::clone(driver),
        None => {
            let config = OiwConfig::from_env();
            oiw_common::logging::init_library_logging(&config.logging.filter);
            match RealDriver::load(&config.driver) {
                Ok(driver) => Arc::new(driver),
                Err(e) => {
                    error!("cannot load the real OpenCL implementation: {}", e);
                    return Err(CL_PLATFORM_NOT_FOUND_KHR);
                }
            }
        }
    };

    let mut real: cl_platform_id = ptr::null_mut();
    driver.platform_ids(1, &mut real, ptr::null_mut())?;
    if real.is_null() {
        return Err(CL_PLATFORM_NOT_FOUND_KHR);
    }

    info!(real_platform = ?real, "platform initialized");
    Ok(Platform::new(driver, real))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::IcdDispatch;

    fn fake_platform() -> Arc<Platform> {
        let driver = Arc::new(RealDriver::from_table(IcdDispatch::EMPTY));
        Platform::new(driver, 0x9100 as cl_platform_id)
    }

    #[test]
    fn failed_initialization_is_retried() {
        let cell = PlatformCell::new();
        assert_eq!(
            cell.get_or_try_init(|| Err(CL_OUT_OF_HOST_MEMORY)).err(),
            Some(CL_OUT_OF_HOST_MEMORY)
        );
        assert!(cell.get().is_none());

        let first = Arc::as_ptr(cell.get_or_try_init(|| Ok(fake_platform())).expect("init"));
        let again = Arc::as_ptr(cell.get_or_try_init(|| Ok(fake_platform())).expect("init"));
        assert_eq!(first, again);
    }

    #[test]
    fn concurrent_first_calls_create_one_platform() {
        let cell = Arc::new(PlatformCell::new());
        let made = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let made = Arc::clone(&made);
                std::thread::spawn(move || {
                    let p = cell
                        .get_or_try_init(|| {
                            made.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                            Ok(fake_platform())
                        })
                        .expect("init");
                    Arc::as_ptr(p) as usize
                })
            })
            .collect();
        let ptrs: Vec<usize> = threads.into_iter().map(|t| t.join().expect("thread")).collect();
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(made.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
