//! Calls `statvfs` on a configured mount point to derive storage usage.

use std::ffi::CString;
use std::path::PathBuf;

use chrono::Utc;

use crate::scheduler::SignalProvider;
use crate::types::Sample;

const SIGNAL_ID: &str = "storage";

pub struct StorageProvider {
    mount_point: PathBuf,
}

impl StorageProvider {
    pub fn new(mount_point: impl Into<PathBuf>) -> Self {
        Self { mount_point: mount_point.into() }
    }

    fn statvfs(&self) -> Option<(u64, u64)> {
        let path = CString::new(self.mount_point.to_str()?).ok()?;
        // SAFETY: `stat` is zero-initialized and `statvfs` only writes into
        // it; `path` is a valid NUL-terminated C string for the call's
        // duration.
        unsafe {
            let mut stat: libc::statvfs = std::mem::zeroed();
            if libc::statvfs(path.as_ptr(), &mut stat) != 0 {
                return None;
            }
            let total = stat.f_blocks.saturating_mul(stat.f_frsize);
            let available = stat.f_bavail.saturating_mul(stat.f_frsize);
            Some((total, available))
        }
    }
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SignalProvider for StorageProvider {
    fn id(&self) -> &str {
        SIGNAL_ID
    }

    fn read(&mut self) -> Sample {
        let now = Utc::now();
        match self.statvfs() {
            Some((total, _)) if total == 0 => Sample::invalid(SIGNAL_ID, now),
            Some((total, available)) => {
                let used = 1.0 - (available as f64 / total as f64);
                Sample::valid(SIGNAL_ID, used.clamp(0.0, 1.0), now)
            }
            None => Sample::invalid(SIGNAL_ID, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_real_root_filesystem() {
        let mut provider = StorageProvider::new("/");
        let sample = provider.read();
        assert!(sample.valid);
        assert!(sample.value >= 0.0 && sample.value <= 1.0);
    }

    #[test]
    fn nonexistent_mount_point_reports_invalid_not_panic() {
        let mut provider = StorageProvider::new("/nonexistent/mount/point/kestrel-test");
        assert!(!provider.read().valid);
    }
}
