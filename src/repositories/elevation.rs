//! Elevation helpers.

use crate::domain::Result;

/// Check if the current process is running with admin privileges
#[must_use]
pub fn is_elevated() -> bool {
    #[cfg(windows)]
    {
        use windows::Win32::Foundation::{CloseHandle, HANDLE};
        use windows::Win32::Security::{
            GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
        };
        use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

        unsafe {
            let mut token = HANDLE::default();

            if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &raw mut token).is_err() {
                return false;
            }

            let mut elevation = TOKEN_ELEVATION::default();
            let mut return_length = 0u32;

            #[allow(clippy::cast_possible_truncation)]
            let result = GetTokenInformation(
                token,
                TokenElevation,
                Some((&raw mut elevation).cast()),
                std::mem::size_of::<TOKEN_ELEVATION>() as u32,
                &raw mut return_length,
            );

            let _ = CloseHandle(token);

            result.is_ok() && elevation.TokenIsElevated != 0
        }
    }

    #[cfg(not(windows))]
    {
        false
    }
}

/// Relaunch the current executable elevated and exit this process.
///
/// # Errors
///
/// Returns error if the executable path cannot be determined or PowerShell
/// fails to spawn the elevated process. Always fails off Windows.
pub fn restart_as_admin() -> Result<()> {
    #[cfg(windows)]
    {
        use crate::domain::AppError;

        let exe_path = std::env::current_exe()
            .map_err(|e| AppError::Elevation(format!("failed to get executable path: {e}")))?;

        std::process::Command::new("powershell")
            .args([
                "-Command",
                &format!(
                    "Start-Process -FilePath '{}' -Verb RunAs",
                    exe_path.display()
                ),
            ])
            .spawn()
            .map_err(|e| AppError::Elevation(e.to_string()))?;

        tracing::info!("relaunching elevated");
        std::process::exit(0);
    }

    #[cfg(not(windows))]
    {
        Err(crate::domain::AppError::Elevation(
            "only supported on Windows".into(),
        ))
    }
}
