use std::ffi::CStr;
use std::mem;
use std::path::{Path, PathBuf};
use std::ptr;

use libloading::{Library, Symbol};
use oiw::dispatch::IcdDispatch;
use oiw::types::*;
use oiw::RealDriver;
use oiw_core::config::{default_config_path, REAL_LIBRARY_ENV};
use oiw_core::OiwConfig;
use serde::Serialize;

type FnGetPlatformIds = unsafe extern "system" fn(cl_uint, *mut cl_platform_id, *mut cl_uint) -> cl_int;

/// Suffix the wrapper reports for `CL_PLATFORM_ICD_SUFFIX_KHR`.
const EXPECTED_SUFFIX: &str = "oiw";

// ── Check result types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.to_string(),
            details: Vec::new(),
        }
    }

    fn pass(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Pass, message)
    }

    fn fail(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Fail, message)
    }

    fn warn(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Warn, message)
    }

    fn skip(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Skip, message)
    }

    fn detail(mut self, detail: &str) -> Self {
        self.details.push(detail.to_string());
        self
    }
}

// ── Main entry point ────────────────────────────────────────────────────────

pub fn run_verify(icd: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let mut results: Vec<CheckResult> = Vec::new();

    // Check 1: Configuration
    check_config(&mut results);

    // Check 2: Real OpenCL implementation
    check_real_library(&mut results);

    // Check 3: Wrapper library and its exports
    let icd_path = icd.unwrap_or_else(default_icd_path);
    let discover = check_wrapper_library(&icd_path, &mut results);

    // Checks 4-6: Behaviour of the loaded wrapper
    match discover.and_then(|discover| check_discovery(discover, &mut results)) {
        Some(platform) => {
            check_suffix(platform, &mut results);
            check_devices(platform, &mut results);
        }
        None => {
            results.push(CheckResult::skip(
                "Platform queries",
                "No wrapped platform available, cannot query it",
            ));
        }
    }

    // Output
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results_pretty(&results);
    }

    // Exit code 1 if any failures
    if results
        .iter()
        .any(|r| matches!(r.status, CheckStatus::Fail))
    {
        std::process::exit(1);
    }

    Ok(())
}

/// The wrapper library built alongside this binary.
fn default_icd_path() -> PathBuf {
    let file = format!(
        "{}oiw{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    );
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file)))
        .unwrap_or_else(|| PathBuf::from(file))
}

// ── Check 1: Configuration ──────────────────────────────────────────────────

fn check_config(results: &mut Vec<CheckResult>) {
    let path = default_config_path();

    if !path.exists() {
        results.push(
            CheckResult::warn(
                "Configuration",
                &format!("Config file not found: {}", path.display()),
            )
            .detail("Using default configuration")
            .detail("Set OIW_CONFIG or create /etc/oiw/oiw.toml to configure the driver"),
        );
        return;
    }

    match OiwConfig::load(&path) {
        Ok(config) => {
            let library = config
                .driver
                .library
                .as_deref()
                .unwrap_or("system default");
            results.push(
                CheckResult::pass("Configuration", &format!("Loaded from {}", path.display()))
                    .detail(&format!("Real library: {}", library))
                    .detail(&format!("Log filter: {}", config.logging.filter)),
            );
        }
        Err(e) => {
            results.push(
                CheckResult::fail(
                    "Configuration",
                    &format!("Failed to parse {}: {}", path.display(), e),
                )
                .detail("The driver ignores a malformed file and runs with defaults"),
            );
        }
    }
}

// ── Check 2: Real OpenCL implementation ─────────────────────────────────────

fn check_real_library(results: &mut Vec<CheckResult>) {
    let config = OiwConfig::from_env();
    let candidates = match config.driver.library.as_deref() {
        Some(library) => library.to_string(),
        None => oiw_common::platform::default_opencl_libraries().join(", "),
    };

    let driver = match RealDriver::load(&config.driver) {
        Ok(driver) => driver,
        Err(e) => {
            let mut result = CheckResult::fail("Real OpenCL library", &e.to_string())
                .detail(&format!("Tried: {}", candidates));
            if std::env::var(REAL_LIBRARY_ENV).is_err() {
                result = result.detail(&format!(
                    "Set {} or driver.library in oiw.toml to choose a library",
                    REAL_LIBRARY_ENV
                ));
            }
            results.push(result);
            return;
        }
    };

    let mut count: cl_uint = 0;
    match driver.platform_ids(0, ptr::null_mut(), &mut count) {
        Ok(()) if count > 0 => {
            results.push(
                CheckResult::pass("Real OpenCL library", &format!("Loaded from {}", candidates))
                    .detail(&format!("{} real platform(s)", count))
                    .detail("The wrapper uses the first one"),
            );
        }
        Ok(()) => {
            results.push(CheckResult::fail(
                "Real OpenCL library",
                "Library loaded but reports no platforms",
            ));
        }
        Err(status) => {
            results.push(CheckResult::fail(
                "Real OpenCL library",
                &format!("Platform query failed with status {}", status),
            ));
        }
    }
}

// ── Check 3: Wrapper library ────────────────────────────────────────────────

fn check_wrapper_library(path: &Path, results: &mut Vec<CheckResult>) -> Option<FnGetPlatformIds> {
    if !path.exists() {
        results.push(
            CheckResult::fail(
                "Wrapper library",
                &format!("Not found: {}", path.display()),
            )
            .detail("Build it with: cargo build -p oiw-icd")
            .detail("Or point at it with: oiw verify --icd PATH"),
        );
        return None;
    }

    let lib = match unsafe { Library::new(path) } {
        Ok(lib) => lib,
        Err(e) => {
            results.push(CheckResult::fail(
                "Wrapper library",
                &format!("Cannot load {}: {}", path.display(), e),
            ));
            return None;
        }
    };

    let discover: Option<FnGetPlatformIds> = unsafe { lib.get(b"clIcdGetPlatformIDsKHR") }
        .ok()
        .map(|s: Symbol<FnGetPlatformIds>| *s);
    let has_lookup = unsafe { lib.get::<*const ()>(b"clGetExtensionFunctionAddress") }.is_ok();

    let Some(discover) = discover else {
        results.push(CheckResult::fail(
            "Wrapper library",
            &format!("{} does not export clIcdGetPlatformIDsKHR", path.display()),
        ));
        return None;
    };

    let mut result = CheckResult::pass("Wrapper library", &format!("Loaded {}", path.display()))
        .detail("Exports clIcdGetPlatformIDsKHR");
    if has_lookup {
        result = result.detail("Exports clGetExtensionFunctionAddress");
    } else {
        result.status = CheckStatus::Warn;
        result = result.detail("Missing clGetExtensionFunctionAddress: ICD loaders will skip it");
    }
    results.push(result);

    // The platform record and its dispatch table live inside the library,
    // which therefore stays loaded until the process exits.
    mem::forget(lib);
    Some(discover)
}

// ── Check 4: Platform discovery ─────────────────────────────────────────────

fn check_discovery(discover: FnGetPlatformIds, results: &mut Vec<CheckResult>) -> Option<cl_platform_id> {
    let mut count: cl_uint = 0;
    let status = unsafe { discover(0, ptr::null_mut(), &mut count) };
    if status != CL_SUCCESS || count == 0 {
        results.push(
            CheckResult::fail(
                "Platform discovery",
                &format!("No platform (status {}, count {})", status, count),
            )
            .detail("Run with OIW_LOG=debug to see why the real library was rejected"),
        );
        return None;
    }
    if count != 1 {
        results.push(CheckResult::fail(
            "Platform discovery",
            &format!("Expected exactly one platform, got {}", count),
        ));
        return None;
    }

    let mut platform: cl_platform_id = ptr::null_mut();
    let status = unsafe { discover(1, &mut platform, ptr::null_mut()) };
    if status != CL_SUCCESS || platform.is_null() {
        results.push(CheckResult::fail(
            "Platform discovery",
            &format!("Fetching the platform failed with status {}", status),
        ));
        return None;
    }

    results.push(CheckResult::pass("Platform discovery", "One wrapped platform"));
    Some(platform)
}

/// The dispatch table an ICD handle starts with.
///
/// # Safety
/// `handle` must be a live handle of an ICD-conformant driver.
unsafe fn table<'a, H>(handle: *mut H) -> &'a IcdDispatch {
    unsafe { &**(handle as *const *const IcdDispatch) }
}

fn cl_ok(status: cl_int) -> Result<(), cl_int> {
    if status == CL_SUCCESS {
        Ok(())
    } else {
        Err(status)
    }
}

fn platform_string(platform: cl_platform_id, param: cl_platform_info) -> Result<String, cl_int> {
    let f = unsafe { table(platform) }
        .clGetPlatformInfo
        .ok_or(CL_INVALID_OPERATION)?;
    let mut size = 0usize;
    cl_ok(unsafe { f(platform, param, 0, ptr::null_mut(), &mut size) })?;
    let mut buf = vec![0u8; size];
    cl_ok(unsafe { f(platform, param, size, buf.as_mut_ptr().cast(), ptr::null_mut()) })?;
    Ok(text(&buf))
}

fn device_string(device: cl_device_id, param: cl_device_info) -> Result<String, cl_int> {
    let f = unsafe { table(device) }
        .clGetDeviceInfo
        .ok_or(CL_INVALID_OPERATION)?;
    let mut size = 0usize;
    cl_ok(unsafe { f(device, param, 0, ptr::null_mut(), &mut size) })?;
    let mut buf = vec![0u8; size];
    cl_ok(unsafe { f(device, param, size, buf.as_mut_ptr().cast(), ptr::null_mut()) })?;
    Ok(text(&buf))
}

fn text(buf: &[u8]) -> String {
    CStr::from_bytes_until_nul(buf)
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(buf).into_owned())
}

// ── Check 5: ICD suffix ─────────────────────────────────────────────────────

fn check_suffix(platform: cl_platform_id, results: &mut Vec<CheckResult>) {
    match platform_string(platform, CL_PLATFORM_ICD_SUFFIX_KHR) {
        Ok(suffix) if suffix == EXPECTED_SUFFIX => {
            let mut result = CheckResult::pass("ICD suffix", &format!("Platform reports \"{}\"", suffix));
            if let Ok(name) = platform_string(platform, CL_PLATFORM_NAME) {
                result = result.detail(&format!("Real platform: {}", name));
            }
            results.push(result);
        }
        Ok(suffix) => {
            results.push(CheckResult::fail(
                "ICD suffix",
                &format!("Expected \"{}\", got \"{}\"", EXPECTED_SUFFIX, suffix),
            ));
        }
        Err(status) => {
            results.push(CheckResult::fail(
                "ICD suffix",
                &format!("Query failed with status {}", status),
            ));
        }
    }
}

// ── Check 6: Devices ────────────────────────────────────────────────────────

fn check_devices(platform: cl_platform_id, results: &mut Vec<CheckResult>) {
    let Some(get_ids) = (unsafe { table(platform) }.clGetDeviceIDs) else {
        results.push(CheckResult::fail("Devices", "clGetDeviceIDs slot is empty"));
        return;
    };

    let mut count: cl_uint = 0;
    let status = unsafe { get_ids(platform, CL_DEVICE_TYPE_ALL, 0, ptr::null_mut(), &mut count) };
    if status == CL_DEVICE_NOT_FOUND || (status == CL_SUCCESS && count == 0) {
        results.push(CheckResult::warn("Devices", "The real platform has no devices"));
        return;
    }
    if status != CL_SUCCESS {
        results.push(CheckResult::fail(
            "Devices",
            &format!("Device enumeration failed with status {}", status),
        ));
        return;
    }

    let mut devices: Vec<cl_device_id> = vec![ptr::null_mut(); count as usize];
    let status = unsafe { get_ids(platform, CL_DEVICE_TYPE_ALL, count, devices.as_mut_ptr(), ptr::null_mut()) };
    if status != CL_SUCCESS {
        results.push(CheckResult::fail(
            "Devices",
            &format!("Device enumeration failed with status {}", status),
        ));
        return;
    }

    let mut details = Vec::new();
    let mut mismatched = 0;
    for (i, &device) in devices.iter().enumerate() {
        let name = device_string(device, CL_DEVICE_NAME).unwrap_or_else(|s| format!("<status {}>", s));
        match device_platform(device) {
            Ok(owner) if owner == platform => {
                details.push(format!("Device {}: {}", i, name));
            }
            Ok(_) => {
                mismatched += 1;
                details.push(format!("Device {}: {} reports a different platform", i, name));
            }
            Err(status) => {
                mismatched += 1;
                details.push(format!("Device {}: {} platform query failed ({})", i, name, status));
            }
        }
    }

    let mut result = if mismatched == 0 {
        CheckResult::pass(
            "Devices",
            &format!("{} device(s) report the wrapped platform", devices.len()),
        )
    } else {
        CheckResult::fail(
            "Devices",
            &format!("{} of {} device(s) do not report the wrapped platform", mismatched, devices.len()),
        )
    };
    for detail in &details {
        result = result.detail(detail);
    }
    results.push(result);
}

fn device_platform(device: cl_device_id) -> Result<cl_platform_id, cl_int> {
    let f = unsafe { table(device) }
        .clGetDeviceInfo
        .ok_or(CL_INVALID_OPERATION)?;
    let mut owner: cl_platform_id = ptr::null_mut();
    cl_ok(unsafe {
        f(
            device,
            CL_DEVICE_PLATFORM,
            mem::size_of::<cl_platform_id>(),
            (&mut owner as *mut cl_platform_id).cast(),
            ptr::null_mut(),
        )
    })?;
    Ok(owner)
}

// ── Output formatters ───────────────────────────────────────────────────────

fn print_results_pretty(results: &[CheckResult]) {
    println!();
    println!("oiw Installation Verification");
    println!("=============================");
    println!();

    let mut pass_count = 0u32;
    let mut fail_count = 0u32;
    let mut warn_count = 0u32;

    for result in results {
        let (icon, color_start, color_end) = match result.status {
            CheckStatus::Pass => {
                pass_count += 1;
                ("[PASS]", "\x1b[32m", "\x1b[0m")
            }
            CheckStatus::Fail => {
                fail_count += 1;
                ("[FAIL]", "\x1b[31m", "\x1b[0m")
            }
            CheckStatus::Warn => {
                warn_count += 1;
                ("[WARN]", "\x1b[33m", "\x1b[0m")
            }
            CheckStatus::Skip => ("[SKIP]", "\x1b[90m", "\x1b[0m"),
        };

        println!(
            "  {}{}{} {} - {}",
            color_start, icon, color_end, result.name, result.message
        );

        for detail in &result.details {
            println!("         {}", detail);
        }
        println!();
    }

    println!("-----------------------------");
    println!(
        "  {} passed, {} failed, {} warnings",
        pass_count, fail_count, warn_count
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_uses_lowercase_status_and_omits_empty_details() {
        let results = vec![
            CheckResult::pass("Configuration", "Loaded"),
            CheckResult::fail("ICD suffix", "Expected \"oiw\"").detail("status -30"),
        ];
        let value = serde_json::to_value(&results).expect("serialize");
        assert_eq!(value[0]["status"], "pass");
        assert!(value[0].get("details").is_none());
        assert_eq!(value[1]["status"], "fail");
        assert_eq!(value[1]["message"], "Expected \"oiw\"");
        assert_eq!(value[1]["details"][0], "status -30");
    }

    #[test]
    fn query_text_stops_at_the_terminator() {
        assert_eq!(text(b"oiw\0\0\0"), "oiw");
        assert_eq!(text(b"unterminated"), "unterminated");
    }

    #[test]
    fn default_wrapper_path_names_the_driver_library() {
        let path = default_icd_path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.contains("oiw"));
        assert!(name.ends_with(std::env::consts::DLL_SUFFIX));
    }
}
