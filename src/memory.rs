use core::alloc::Layout;

use bootloader::bootinfo::{MemoryMap, MemoryRegionType};
use x86_64::structures::paging::{
    FrameAllocator, OffsetPageTable, PageTable, PhysFrame, Size4KiB, Translate,
};
use x86_64::{PhysAddr, VirtAddr};

use crate::boundary::{PageAllocator, PageGrant};
use crate::error::{OutOfMemory, PageError};

/// Initialize a new OffsetPageTable.
///
/// # Safety
///
/// The complete physical memory must be mapped at `physical_memory_offset`,
/// and this must be called only once.
pub unsafe fn init(physical_memory_offset: VirtAddr) -> OffsetPageTable<'static> {
    unsafe {
        let level_4_table = active_level_4_table(physical_memory_offset);
        OffsetPageTable::new(level_4_table, physical_memory_offset)
    }
}

unsafe fn active_level_4_table(physical_memory_offset: VirtAddr) -> &'static mut PageTable {
    use x86_64::registers::control::Cr3;

    let (level_4_table_frame, _) = Cr3::read();

    let phys = level_4_table_frame.start_address();
    let virt = physical_memory_offset + phys.as_u64();
    let page_table_ptr: *mut PageTable = virt.as_mut_ptr();

    unsafe { &mut *page_table_ptr }
}

/// Hands out usable frames from the bootloader's memory map.
pub struct BootInfoFrameAllocator {
    memory_map: &'static MemoryMap,
    next: usize,
}

impl BootInfoFrameAllocator {
    /// # Safety
    ///
    /// Every frame marked `USABLE` in `memory_map` must really be unused.
    pub unsafe fn init(memory_map: &'static MemoryMap) -> Self {
        BootInfoFrameAllocator {
            memory_map,
            next: 0,
        }
    }

    fn usable_frames(&self) -> impl Iterator<Item = PhysFrame> {
        let memory_map = self.memory_map;
        memory_map
            .iter()
            .filter(|r| r.region_type == MemoryRegionType::Usable)
            .map(|r| r.range.start_addr()..r.range.end_addr())
            .flat_map(|r| r.step_by(4096))
            .map(|addr| PhysFrame::containing_address(PhysAddr::new(addr)))
    }
}

unsafe impl FrameAllocator<Size4KiB> for BootInfoFrameAllocator {
    fn allocate_frame(&mut self) -> Option<PhysFrame> {
        let frame = self.usable_frames().nth(self.next);
        self.next += 1;
        frame
    }
}

/// The `PAGE` command's allocator: blocks come from the kernel heap and are
/// never freed. The physical address is looked up in the active page table.
pub struct HeapPageAllocator {
    mapper: OffsetPageTable<'static>,
}

impl HeapPageAllocator {
    pub fn new(mapper: OffsetPageTable<'static>) -> Self {
        Self { mapper }
    }
}

impl PageAllocator for HeapPageAllocator {
    fn allocate(&mut self, size: usize, align: usize) -> Result<PageGrant, PageError> {
        let oom = OutOfMemory { size, align };
        let layout = Layout::from_size_align(size.max(1), align.max(1)).map_err(|_| oom)?;

        let ptr = unsafe { alloc::alloc::alloc(layout) };
        if ptr.is_null() {
            return Err(oom.into());
        }

        let logical = VirtAddr::from_ptr(ptr);
        match self.mapper.translate_addr(logical) {
            Some(physical) => Ok(PageGrant {
                logical: logical.as_u64(),
                physical: physical.as_u64(),
            }),
            None => {
                log::warn!("memory: heap block {:#x} is not mapped", logical.as_u64());
                unsafe { alloc::alloc::dealloc(ptr, layout) };
                Err(PageError::Unmapped {
                    logical: logical.as_u64(),
                })
            }
        }
    }
}
