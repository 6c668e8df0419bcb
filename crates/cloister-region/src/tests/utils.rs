// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for cloister-region.

use crate::{LibcPlatform, PlatformProfile, SecretRegionAllocator};

/// Check if seccomp is available by forking a child process that attempts to load a filter.
/// Returns true if seccomp works, false if running under QEMU or seccomp is unavailable.
pub fn is_seccomp_available() -> bool {
    use libseccomp::{ScmpAction, ScmpFilterContext};

    match unsafe { libc::fork() } {
        -1 => {
            eprintln!("Failed to fork for seccomp check");
            false
        }
        0 => {
            let result = ScmpFilterContext::new(ScmpAction::Allow).and_then(|filter| filter.load());

            std::process::exit(if result.is_ok() { 0 } else { 1 });
        }
        child_pid => {
            let mut status: libc::c_int = 0;
            unsafe {
                libc::waitpid(child_pid, &mut status, 0);
            }

            libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0
        }
    }
}

/// Returns true if the running kernel hands out secret memory.
///
/// Kernels booted without `secretmem.enable=1`, and sandboxes that filter
/// unknown syscalls, make this false.
pub fn is_secret_memory_available() -> bool {
    let allocator = SecretRegionAllocator::new(LibcPlatform::new());

    match allocator.create(1) {
        Ok(region) => {
            allocator.release(region);
            true
        }
        Err(e) => {
            eprintln!("secret memory unavailable: {e}");
            false
        }
    }
}

/// Number of descriptors currently open in this process.
pub fn open_descriptor_count() -> usize {
    std::fs::read_dir("/proc/self/fd")
        .expect("Failed to read_dir(/proc/self/fd)")
        .count()
}

/// Runs an ignored test as a subprocess and returns its exit code.
pub fn run_test_as_subprocess(test_name: &str) -> Option<i32> {
    let exe = std::env::current_exe().expect("Failed to current_exe()");
    let status = std::process::Command::new(exe)
        .args([
            "--exact",
            test_name,
            "--ignored",
            "--test-threads=1",
            "--nocapture",
        ])
        .status()
        .expect("Failed to run subprocess");

    status.code()
}

fn block_syscall(syscall: libseccomp::ScmpSyscall, errno: i32) {
    use libseccomp::{ScmpAction, ScmpFilterContext};

    let mut filter = ScmpFilterContext::new(ScmpAction::Allow).expect("Failed to create filter");
    filter
        .add_rule(ScmpAction::Errno(errno), syscall)
        .expect("Failed to add rule");
    filter.load().expect("Failed to load seccomp filter");
}

/// Makes `memfd_secret` fail with `ENOSYS`, as on a kernel built without it.
pub fn block_memfd_secret() {
    let number = PlatformProfile::detect()
        .secret_memory_syscall()
        .expect("Failed to secret_memory_syscall()");

    block_syscall(libseccomp::ScmpSyscall::from(number as i32), libc::ENOSYS);
}

/// Makes `ftruncate` fail with `EPERM`.
pub fn block_ftruncate() {
    block_syscall(
        libseccomp::ScmpSyscall::from_name("ftruncate").expect("Failed to from_name(..)"),
        libc::EPERM,
    );
}
