use x86_64::instructions::{hlt, interrupts};

/// Stop the machine for good: no more interrupts, no more input.
pub fn halt() -> ! {
    log::info!("sys: CPU halted");
    interrupts::disable();
    loop {
        hlt();
    }
}
