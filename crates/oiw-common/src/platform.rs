use std::path::PathBuf;

/// File names of the system OpenCL library, in the order they are tried.
pub fn default_opencl_libraries() -> &'static [&'static str] {
    #[cfg(target_os = "windows")]
    {
        &["OpenCL.dll"]
    }
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Frameworks/OpenCL.framework/OpenCL",
            "libOpenCL.dylib",
        ]
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        &["libOpenCL.so.1", "libOpenCL.so"]
    }
}

/// System-wide configuration file location for this platform.
pub fn system_config_path() -> PathBuf {
    #[cfg(windows)]
    {
        let programdata =
            std::env::var("PROGRAMDATA").unwrap_or_else(|_| r"C:\ProgramData".to_string());
        PathBuf::from(programdata).join("OIW").join("oiw.toml")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/etc/oiw/oiw.toml")
    }
}
