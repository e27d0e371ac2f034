#![no_std]
#![no_main]

extern crate alloc;

use arclight::memory::{self, BootInfoFrameAllocator, HeapPageAllocator};
use arclight::repl::arclight_repl;
use arclight::task::{Task, executor::Executor};
use arclight::{Kernel, KernelConfig, allocator, serial_println};
use bootloader::{BootInfo, entry_point};
use core::panic::PanicInfo;
use x86_64::VirtAddr;

entry_point!(kernel_main);

fn kernel_main(boot_info: &'static BootInfo) -> ! {
    arclight::init();

    // prove the IDT answers before anything else relies on it
    x86_64::instructions::interrupts::int3();

    let phys_mem_offset = VirtAddr::new(boot_info.physical_memory_offset);
    let mut mapper = unsafe { memory::init(phys_mem_offset) };
    let mut frame_allocator = unsafe { BootInfoFrameAllocator::init(&boot_info.memory_map) };
    allocator::init_heap(&mut mapper, &mut frame_allocator)
        .expect("heap initialization failed");

    let kernel = Kernel::new(KernelConfig::default());
    let pages = HeapPageAllocator::new(mapper);

    let mut executor = Executor::new();
    executor.spawn(Task::new("repl", arclight_repl(kernel, pages)));
    executor.run();
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    serial_println!("{}", info);
    arclight::hlt_loop();
}
