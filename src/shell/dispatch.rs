use alloc::format;
use alloc::string::String;

use super::Command;
use crate::boundary::{Console, PageAllocator, PageGrant};
use crate::config::KernelConfig;
use crate::error::KernelError;
use crate::fs::FileTable;

/// What the kernel has to do once a command has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Return the session to the password gate.
    Lock,
    /// Stop the machine. Nothing else is printed.
    Halt,
}

/// Run one shell line and print its output followed by the prompt.
pub fn dispatch<C, P>(
    line: &str,
    files: &mut FileTable,
    pages: &mut P,
    console: &mut C,
    config: &KernelConfig,
) -> Outcome
where
    C: Console + ?Sized,
    P: PageAllocator + ?Sized,
{
    let command = Command::parse(line);
    let mut outcome = Outcome::Continue;

    match command {
        Command::End => {
            console.write_str("Stopping the CPU. Bye!\n");
            log::info!("shell: halt requested");
            return Outcome::Halt;
        }

        Command::Page => match request_page(pages, config) {
            Ok(grant) => console.write_str(&format!(
                "Page: {:#x}, physical address: {:#x}\n",
                grant.logical, grant.physical
            )),
            Err(err) => report(console, "PAGE", err),
        },

        Command::List => list_files(console, files),

        Command::Create(name) => match files.create(name) {
            Ok(_) => console.write_str(&format!("{} was created.", name)),
            Err(err) => report(console, "CREATE", err.into()),
        },

        Command::Read(name) => match read_file(files, name) {
            Ok(text) => console.write_str(&text),
            Err(err) => report(console, "READ", err),
        },

        Command::Write { filename, payload } => {
            if let Err(err) = write_file(files, filename, payload) {
                report(console, "WRITE", err);
            }
        }

        Command::Lock => outcome = Outcome::Lock,

        Command::Unknown(token) => {
            console.write_str(&format!("{} is not a command !", token));
        }
    }

    console.write_char('\n');
    console.write_str(config.prompt);
    outcome
}

fn request_page<P>(pages: &mut P, config: &KernelConfig) -> Result<PageGrant, KernelError>
where
    P: PageAllocator + ?Sized,
{
    let grant = pages.allocate(config.page_request_size, config.page_request_align)?;
    log::debug!("shell: page at {:#x} (phys {:#x})", grant.logical, grant.physical);
    Ok(grant)
}

fn list_files<C: Console + ?Sized>(console: &mut C, files: &FileTable) {
    let (names, count) = files.list();
    console.write_str("Files on the system : \n");
    for name in names {
        console.write_str("    ");
        console.write_str(name);
        console.write_char('\n');
    }
    console.write_str(&format!("{} files.", count));
}

/// Opens the file, creating it on a miss, and renders its content.
fn read_file(files: &mut FileTable, name: &str) -> Result<String, KernelError> {
    let id = files.open_or_create(name)?;
    let content = files.read(id)?;
    Ok(String::from_utf8_lossy(content).into_owned())
}

fn write_file(files: &mut FileTable, name: &str, payload: &str) -> Result<(), KernelError> {
    let id = files.open_or_create(name)?;
    files.write(id, payload.as_bytes())?;
    Ok(())
}

fn report<C: Console + ?Sized>(console: &mut C, command: &str, err: KernelError) {
    log::warn!("shell: {} failed: {}", command, err);
    console.write_str(&format!("{} failed: {}", command, err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageError;
    use crate::testing::{BumpPageAllocator, MemoryConsole};
    use alloc::vec::Vec;

    struct Rig {
        files: FileTable,
        pages: BumpPageAllocator,
        console: MemoryConsole,
        config: KernelConfig,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                files: FileTable::init(),
                pages: BumpPageAllocator::default(),
                console: MemoryConsole::new(),
                config: KernelConfig::default(),
            }
        }

        fn run(&mut self, line: &str) -> (Outcome, String) {
            let outcome = dispatch(
                line,
                &mut self.files,
                &mut self.pages,
                &mut self.console,
                &self.config,
            );
            (outcome, self.console.take())
        }
    }

    #[test]
    fn create_echoes_the_name() {
        let mut rig = Rig::new();
        let (outcome, out) = rig.run("CREATE notes");
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(out, "notes was created.\n> ");
        assert_eq!(rig.files.names().collect::<Vec<_>>(), ["notes"]);
    }

    #[test]
    fn write_is_silent_and_read_prints_content() {
        let mut rig = Rig::new();
        assert_eq!(rig.run("WRITE notes hello there").1, "\n> ");
        assert_eq!(rig.run("READ notes").1, "hello there\n> ");
    }

    #[test]
    fn read_of_a_missing_file_creates_it_empty() {
        let mut rig = Rig::new();
        assert_eq!(rig.run("READ ghost").1, "\n> ");
        assert!(rig.files.find("ghost").is_some());
    }

    #[test]
    fn list_prints_names_and_count() {
        let mut rig = Rig::new();
        rig.run("CREATE A");
        rig.run("CREATE B");
        assert_eq!(
            rig.run("LIST").1,
            "Files on the system : \n    A\n    B\n2 files.\n> "
        );
    }

    #[test]
    fn list_of_an_empty_table() {
        let mut rig = Rig::new();
        assert_eq!(rig.run("LIST").1, "Files on the system : \n0 files.\n> ");
    }

    #[test]
    fn page_prints_both_addresses() {
        let mut rig = Rig::new();
        let (_, out) = rig.run("PAGE");
        let logical = BumpPageAllocator::DEFAULT_BASE;
        let physical = logical - BumpPageAllocator::DEFAULT_PHYS_OFFSET;
        assert_eq!(
            out,
            format!("Page: {:#x}, physical address: {:#x}\n\n> ", logical, physical)
        );
    }

    struct UnmappedPages;

    impl PageAllocator for UnmappedPages {
        fn allocate(&mut self, _size: usize, _align: usize) -> Result<PageGrant, PageError> {
            Err(PageError::Unmapped { logical: 0x5000 })
        }
    }

    #[test]
    fn page_reports_missing_mapping_apart_from_exhaustion() {
        let mut rig = Rig::new();
        let outcome = dispatch(
            "PAGE",
            &mut rig.files,
            &mut UnmappedPages,
            &mut rig.console,
            &rig.config,
        );
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            rig.console.take(),
            "PAGE failed: allocator: block at 0x5000 has no physical mapping\n> "
        );
    }

    #[test]
    fn page_reports_exhaustion() {
        let mut rig = Rig::new();
        rig.pages = BumpPageAllocator::with_capacity(10);
        let (outcome, out) = rig.run("PAGE");
        assert_eq!(outcome, Outcome::Continue);
        assert!(out.starts_with("PAGE failed: allocator: out of memory"));
        assert!(out.ends_with("\n> "));
    }

    #[test]
    fn unknown_command_is_echoed_and_changes_nothing() {
        let mut rig = Rig::new();
        rig.run("CREATE keep");
        let before = rig.files.to_image().unwrap();

        let (outcome, out) = rig.run("FOO bar");
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(out, "FOO is not a command !\n> ");
        assert_eq!(rig.files.to_image().unwrap(), before);
    }

    #[test]
    fn end_halts_without_a_prompt() {
        let mut rig = Rig::new();
        let (outcome, out) = rig.run("END");
        assert_eq!(outcome, Outcome::Halt);
        assert_eq!(out, "Stopping the CPU. Bye!\n");
    }

    #[test]
    fn lock_prints_only_the_prompt() {
        let mut rig = Rig::new();
        let (outcome, out) = rig.run("LOCK");
        assert_eq!(outcome, Outcome::Lock);
        assert_eq!(out, "\n> ");
    }
}
