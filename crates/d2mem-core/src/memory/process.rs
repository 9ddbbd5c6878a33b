//! Process discovery and the live `ReadMemory` implementation.

use serde::Serialize;

use crate::error::Result;
use crate::memory::ReadMemory;

/// Opaque native window handle of the target's main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    pub const NULL: Self = Self(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Identity of a discovered target process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub base_address: u64,
    pub module_size: u64,
    pub window_handle: WindowHandle,
}

/// Discovers the target process and opens it for reading.
pub trait ProcessProvider {
    type Handle: ReadMemory;

    /// Look up the live process with the given executable name.
    fn find_process(&self, name: &str) -> Option<ProcessInfo>;

    /// Open a read handle on a process returned by `find_process`.
    fn open(&self, info: &ProcessInfo) -> Result<Self::Handle>;
}

/// Check an executable name against the configured target name.
///
/// Comparison is ASCII case-insensitive and accepts the target name with or
/// without its `.exe` suffix.
pub fn matches_process_name(exe_name: &str, target: &str) -> bool {
    let strip = |name: &str| -> String {
        let lower = name.to_ascii_lowercase();
        lower
            .strip_suffix(".exe")
            .map(str::to_string)
            .unwrap_or(lower)
    };
    strip(exe_name) == strip(target)
}

/// `ProcessProvider` backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessProvider;

#[cfg(target_os = "windows")]
pub use windows_impl::ProcessHandle;

#[cfg(target_os = "windows")]
mod windows_impl {
    use std::ffi::c_void;

    use tracing::debug;
    use windows::Win32::Foundation::{BOOL, CloseHandle, HANDLE, HWND, LPARAM};
    use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, PROCESSENTRY32W,
        Process32FirstW, Process32NextW, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
        TH32CS_SNAPPROCESS,
    };
    use windows::Win32::System::Threading::{
        OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetWindowThreadProcessId, IsWindowVisible,
    };

    use super::{ProcessInfo, ProcessProvider, SystemProcessProvider, WindowHandle};
    use crate::error::{Error, Result};
    use crate::memory::ReadMemory;

    /// An open read handle on the target process.
    #[derive(Debug)]
    pub struct ProcessHandle {
        handle: HANDLE,
        pub pid: u32,
        pub base_address: u64,
        pub module_size: u64,
    }

    impl ProcessHandle {
        pub fn open(info: &ProcessInfo) -> Result<Self> {
            // SAFETY: OpenProcess has no memory-safety preconditions; the
            // returned handle is owned by ProcessHandle and closed on drop.
            let handle = unsafe {
                OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_INFORMATION, false, info.pid)
            }
            .map_err(|e| Error::ProcessUnavailable(format!("OpenProcess({}): {}", info.pid, e)))?;

            if handle.is_invalid() {
                return Err(Error::ProcessUnavailable(format!(
                    "Invalid handle for PID {}",
                    info.pid
                )));
            }

            Ok(Self {
                handle,
                pid: info.pid,
                base_address: info.base_address,
                module_size: info.module_size,
            })
        }
    }

    impl ReadMemory for ProcessHandle {
        fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
            let mut buffer = vec![0u8; size];
            let mut bytes_read = 0usize;

            // SAFETY: the destination buffer is exactly `size` bytes long and
            // ReadProcessMemory never writes past `size`.
            let result = unsafe {
                ReadProcessMemory(
                    self.handle,
                    address as *const c_void,
                    buffer.as_mut_ptr() as *mut c_void,
                    size,
                    Some(&mut bytes_read),
                )
            };

            if let Err(e) = result {
                return Err(Error::read_failed(address, e.to_string()));
            }
            if bytes_read != size {
                return Err(Error::read_failed(
                    address,
                    format!("partial read ({} of {} bytes)", bytes_read, size),
                ));
            }

            Ok(buffer)
        }

        fn base_address(&self) -> u64 {
            self.base_address
        }

        fn module_size(&self) -> u64 {
            self.module_size
        }
    }

    impl Drop for ProcessHandle {
        fn drop(&mut self) {
            if !self.handle.is_invalid() {
                // SAFETY: the handle was returned by OpenProcess and is closed once.
                unsafe {
                    let _ = CloseHandle(self.handle);
                }
            }
        }
    }

    impl ProcessProvider for SystemProcessProvider {
        type Handle = ProcessHandle;

        fn find_process(&self, name: &str) -> Option<ProcessInfo> {
            let pid = find_pid_by_name(name)?;
            let (base_address, module_size) = match main_module(pid) {
                Ok(module) => module,
                Err(e) => {
                    debug!("Main module lookup failed for PID {}: {}", pid, e);
                    return None;
                }
            };
            let window_handle = find_window_by_pid(pid).unwrap_or(WindowHandle::NULL);

            Some(ProcessInfo {
                pid,
                base_address,
                module_size,
                window_handle,
            })
        }

        fn open(&self, info: &ProcessInfo) -> Result<Self::Handle> {
            ProcessHandle::open(info)
        }
    }

    struct Snapshot(HANDLE);

    impl Drop for Snapshot {
        fn drop(&mut self) {
            // SAFETY: the snapshot handle came from CreateToolhelp32Snapshot.
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }

    fn find_pid_by_name(name: &str) -> Option<u32> {
        // SAFETY: the snapshot handle is owned by `Snapshot` and closed on drop.
        let snapshot = Snapshot(unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }.ok()?);

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        // SAFETY: `entry.dwSize` is initialised as the API requires.
        let mut next = unsafe { Process32FirstW(snapshot.0, &mut entry) };
        while next.is_ok() {
            let len = entry
                .szExeFile
                .iter()
                .position(|&c| c == 0)
                .unwrap_or(entry.szExeFile.len());
            let exe_name = String::from_utf16_lossy(&entry.szExeFile[..len]);
            if super::matches_process_name(&exe_name, name) {
                return Some(entry.th32ProcessID);
            }
            // SAFETY: same snapshot and entry as above.
            next = unsafe { Process32NextW(snapshot.0, &mut entry) };
        }

        None
    }

    fn main_module(pid: u32) -> Result<(u64, u64)> {
        // SAFETY: the snapshot handle is owned by `Snapshot` and closed on drop.
        let snapshot = Snapshot(
            unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }
                .map_err(|e| Error::ProcessUnavailable(format!("module snapshot: {}", e)))?,
        );

        let mut module_entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        // The first module of a process snapshot is the main executable.
        // SAFETY: `module_entry.dwSize` is initialised as the API requires.
        unsafe { Module32FirstW(snapshot.0, &mut module_entry) }
            .map_err(|e| Error::ProcessUnavailable(format!("Module32FirstW: {}", e)))?;

        Ok((
            module_entry.modBaseAddr as u64,
            module_entry.modBaseSize as u64,
        ))
    }

    thread_local! {
        static FOUND_HWND: std::cell::Cell<Option<HWND>> = const { std::cell::Cell::new(None) };
    }

    /// Find the first visible top-level window owned by `target_pid`.
    fn find_window_by_pid(target_pid: u32) -> Option<WindowHandle> {
        FOUND_HWND.with(|cell| cell.set(None));

        // SAFETY: EnumWindows calls the callback synchronously; the LPARAM
        // points at `target_pid`, which outlives the call.
        unsafe {
            let _ = EnumWindows(
                Some(enum_callback),
                LPARAM(&target_pid as *const u32 as isize),
            );
        }

        FOUND_HWND
            .with(|cell| cell.take())
            .map(|hwnd| WindowHandle(hwnd.0 as u64))
    }

    unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let target_pid = unsafe { *(lparam.0 as *const u32) };
        let mut window_pid: u32 = 0;
        unsafe { GetWindowThreadProcessId(hwnd, Some(&mut window_pid)) };

        if window_pid == target_pid && unsafe { IsWindowVisible(hwnd) }.as_bool() {
            FOUND_HWND.with(|cell| cell.set(Some(hwnd)));
            return BOOL(0); // Stop enumeration
        }
        BOOL(1) // Continue enumeration
    }
}

#[cfg(not(target_os = "windows"))]
pub use fallback::ProcessHandle;

#[cfg(not(target_os = "windows"))]
mod fallback {
    use super::{ProcessInfo, ProcessProvider, SystemProcessProvider};
    use crate::error::{Error, Result};
    use crate::memory::ReadMemory;

    /// Placeholder handle; process memory access is only supported on Windows.
    #[derive(Debug)]
    pub struct ProcessHandle {
        pub pid: u32,
        pub base_address: u64,
        pub module_size: u64,
    }

    impl ProcessHandle {
        pub fn open(info: &ProcessInfo) -> Result<Self> {
            Err(Error::ProcessUnavailable(format!(
                "cannot open PID {}: process memory access is only supported on Windows",
                info.pid
            )))
        }
    }

    impl ReadMemory for ProcessHandle {
        fn read_bytes(&self, address: u64, _size: usize) -> Result<Vec<u8>> {
            Err(Error::read_failed(address, "unsupported platform"))
        }

        fn base_address(&self) -> u64 {
            self.base_address
        }

        fn module_size(&self) -> u64 {
            self.module_size
        }
    }

    impl ProcessProvider for SystemProcessProvider {
        type Handle = ProcessHandle;

        fn find_process(&self, _name: &str) -> Option<ProcessInfo> {
            None
        }

        fn open(&self, info: &ProcessInfo) -> Result<Self::Handle> {
            ProcessHandle::open(info)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_name_match_ignores_case_and_extension() {
        assert!(matches_process_name("D2R.exe", "D2R.exe"));
        assert!(matches_process_name("d2r.EXE", "D2R.exe"));
        assert!(matches_process_name("D2R.exe", "D2R"));
        assert!(matches_process_name("D2R", "d2r.exe"));
        assert!(!matches_process_name("D2R-launcher.exe", "D2R.exe"));
    }

    #[test]
    fn test_window_handle_null() {
        assert!(WindowHandle::NULL.is_null());
        assert!(WindowHandle::default().is_null());
        assert!(!WindowHandle(0x1234).is_null());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_system_provider_finds_nothing_off_windows() {
        assert!(SystemProcessProvider.find_process("D2R.exe").is_none());
    }
}
