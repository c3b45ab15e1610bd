//! Resource ceilings for spawned children.
//!
//! Ceilings are applied inside the child between fork and exec, so a runaway
//! submission is terminated by the kernel instead of hanging the harness.

use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;

use nix::sys::resource::{setrlimit, Resource};

/// CPU-time and address-space bounds applied to every child process.
#[derive(Clone, Copy, Debug)]
pub struct ResourceCeilings {
    /// Soft CPU ceiling in seconds. The soft limit delivers SIGXCPU; the
    /// hard limit is one second above it and delivers SIGKILL.
    pub cpu_seconds: u64,
    /// Address-space ceiling in bytes.
    pub address_space_bytes: u64,
}

impl ResourceCeilings {
    /// Contest-wide defaults: 300 seconds of CPU, 16 GiB of address space.
    pub const fn contest_default() -> Self {
        ResourceCeilings {
            cpu_seconds: 300,
            address_space_bytes: 16 * 1024 * 1024 * 1024,
        }
    }

    /// Arrange for the ceilings to be applied in the child of `cmd`.
    pub fn install(self, cmd: &mut Command) {
        unsafe {
            cmd.pre_exec(move || self.apply());
        }
    }

    fn apply(self) -> io::Result<()> {
        setrlimit(Resource::RLIMIT_CPU, self.cpu_seconds, self.cpu_seconds + 1)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("RLIMIT_CPU: {e}")))?;
        setrlimit(
            Resource::RLIMIT_AS,
            self.address_space_bytes,
            self.address_space_bytes,
        )
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("RLIMIT_AS: {e}")))?;
        Ok(())
    }
}

/// True when `signal` is one the kernel delivers for a breached ceiling.
pub fn is_limit_signal(signal: i32) -> bool {
    signal == libc::SIGXCPU || signal == libc::SIGKILL
}
