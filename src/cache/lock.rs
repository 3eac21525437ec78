//! Advisory directory lock
//!
//! Cross-process mutual exclusion keyed by a directory path: an `fs2`
//! exclusive lock (`flock(2)` on Unix) on a read-only handle to the directory
//! itself. The lock lives
//! exactly as long as the `DirLock` value: dropping it closes the handle, and
//! the kernel releases the lock with it (also on process exit or crash).

use crate::error::{HnError, HnResult};
use fs2::FileExt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive advisory lock held on a directory
#[derive(Debug)]
pub struct DirLock {
    path: PathBuf,
    // Closing the handle releases the lock.
    _handle: File,
}

/// Outcome of a non-blocking lock attempt
#[derive(Debug)]
pub enum TryLock {
    /// The lock was granted immediately
    Acquired(DirLock),
    /// Another holder has it; the handle is returned for a blocking retry
    Contended(PendingLock),
}

/// An opened directory handle that has not been granted the lock yet
#[derive(Debug)]
pub struct PendingLock {
    path: PathBuf,
    handle: File,
}

impl DirLock {
    /// Try to take the lock without blocking
    pub fn try_acquire(dir: &Path) -> HnResult<TryLock> {
        let handle = File::open(dir).map_err(|e| HnError::CacheLock {
            path: dir.to_path_buf(),
            source: e,
        })?;

        match handle.try_lock_exclusive() {
            Ok(()) => {
                debug!("Locked {}", dir.display());
                Ok(TryLock::Acquired(DirLock {
                    path: dir.to_path_buf(),
                    _handle: handle,
                }))
            }
            Err(e) if is_contended(&e) => {
                debug!("Lock on {} is held elsewhere", dir.display());
                Ok(TryLock::Contended(PendingLock {
                    path: dir.to_path_buf(),
                    handle,
                }))
            }
            Err(e) => Err(HnError::CacheLock {
                path: dir.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Take the lock, blocking while another holder has it
    pub fn acquire(dir: &Path) -> HnResult<DirLock> {
        match Self::try_acquire(dir)? {
            TryLock::Acquired(lock) => Ok(lock),
            TryLock::Contended(pending) => pending.wait(),
        }
    }

    /// Path of the locked directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PendingLock {
    /// Block until the lock is granted
    ///
    /// There is no timeout: this returns only once the current holder
    /// releases the lock or its process exits.
    pub fn wait(self) -> HnResult<DirLock> {
        self.handle.lock_exclusive().map_err(|e| HnError::CacheLock {
            path: self.path.clone(),
            source: e,
        })?;
        debug!("Locked {} after waiting", self.path.display());
        Ok(DirLock {
            path: self.path,
            _handle: self.handle,
        })
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
