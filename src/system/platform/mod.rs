//! Host data sources. Everything OS-specific lives below this module.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod unsupported;

#[cfg(target_os = "linux")]
pub use linux::ProcfsSource as HostSource;
#[cfg(not(target_os = "linux"))]
pub use unsupported::UnsupportedSource as HostSource;
