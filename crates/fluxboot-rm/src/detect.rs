//! Detection of the resource manager available on the host.

use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::debug;
use tracing::trace;

use crate::ManagerError;
use crate::ManagerKind;
use crate::Result;
use crate::manager::flux::FLUX_URI_ENV;

/// The order in which resource manager programs are probed on `PATH`.
pub const DETECTION_ORDER: [ManagerKind; 3] =
    [ManagerKind::Lsf, ManagerKind::Slurm, ManagerKind::Cobalt];

/// Determines if an executable named `program` exists in any directory of
/// `path`.
fn on_path(program: &str, path: &OsStr) -> bool {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match which::which_in(program, Some(path), cwd) {
        Ok(found) => {
            trace!(program, path = %found.display(), "found program");
            true
        }
        Err(_) => {
            trace!(program, "program not found");
            false
        }
    }
}

/// Detects the resource manager from the given environment values.
///
/// A configured Flux endpoint takes precedence over everything on `path`;
/// otherwise the first manager in [`DETECTION_ORDER`] whose program is found
/// is chosen.
pub fn detect_manager_in(flux_uri: Option<&OsStr>, path: Option<&OsStr>) -> Result<ManagerKind> {
    if flux_uri.is_some() {
        debug!("found `{FLUX_URI_ENV}` in the environment");
        return Ok(ManagerKind::Flux);
    }

    let path = path.ok_or(ManagerError::NoResourceManagerDetected)?;
    DETECTION_ORDER
        .into_iter()
        .find(|kind| kind.program().is_some_and(|p| on_path(p, path)))
        .inspect(|kind| debug!(%kind, "detected resource manager"))
        .ok_or(ManagerError::NoResourceManagerDetected)
}

/// Detects the resource manager from the process environment.
///
/// Detection only reads the environment and the file system.
pub fn detect_manager() -> Result<ManagerKind> {
    let flux_uri = env::var_os(FLUX_URI_ENV);
    let path = env::var_os("PATH");
    detect_manager_in(flux_uri.as_deref(), path.as_deref())
}
