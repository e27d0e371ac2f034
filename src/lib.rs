//! arclight: a tiny single-user kernel shell.
//!
//! A password gate sits in front of a line-oriented command shell, and the
//! shell works on SSFS, a volatile file table kept entirely in memory.
//!
//! The session, dispatcher and file table are plain `alloc` code and run on
//! the host. Hardware bring-up (GDT/IDT, heap, VGA terminal, keyboard task)
//! is compiled only with the `kernel` feature.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "kernel", feature(abi_x86_interrupt))]

extern crate alloc;

pub mod boundary;
pub mod config;
pub mod error;
pub mod fs;
pub mod kernel;
pub mod session;
pub mod shell;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(feature = "kernel")]
pub mod allocator;
#[cfg(feature = "kernel")]
pub mod gdt;
#[cfg(feature = "kernel")]
pub mod interrupts;
#[cfg(feature = "kernel")]
pub mod memory;
#[cfg(feature = "kernel")]
pub mod repl;
#[cfg(feature = "kernel")]
pub mod serial;
#[cfg(feature = "kernel")]
pub mod sys;
#[cfg(feature = "kernel")]
pub mod task;
#[cfg(feature = "kernel")]
pub mod terminal;

pub use boundary::{Console, PageAllocator, PageGrant};
pub use config::KernelConfig;
pub use error::{FsError, KernelError, OutOfMemory, PageError};
pub use fs::{FileId, FileRecord, FileTable};
pub use kernel::{Flow, Kernel};
pub use session::{CredentialVerifier, DigestVerifier, Session, SessionStatus};

/// Bring up the CPU tables, the interrupt controllers and the serial logger.
#[cfg(feature = "kernel")]
pub fn init() {
    serial::init_logger();
    gdt::init();
    interrupts::init_idt();
    unsafe { interrupts::PICS.lock().initialize() };
    x86_64::instructions::interrupts::enable();
}

#[cfg(feature = "kernel")]
pub fn hlt_loop() -> ! {
    loop {
        x86_64::instructions::hlt();
    }
}
