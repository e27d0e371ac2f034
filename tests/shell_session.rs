use arclight::testing::{BumpPageAllocator, MemoryConsole};
use arclight::{Flow, Kernel, KernelConfig, SessionStatus};

struct Machine {
    kernel: Kernel,
    console: MemoryConsole,
    pages: BumpPageAllocator,
}

impl Machine {
    fn boot() -> Self {
        let mut kernel = Kernel::new(KernelConfig::default());
        let mut console = MemoryConsole::new();
        kernel.boot(&mut console);
        console.take();
        Self {
            kernel,
            console,
            pages: BumpPageAllocator::default(),
        }
    }

    fn logged_in() -> Self {
        let mut machine = Self::boot();
        machine.type_line("1234");
        machine
    }

    fn type_line(&mut self, line: &str) -> String {
        self.kernel
            .handle_line(line, &mut self.console, &mut self.pages);
        self.console.take()
    }
}

#[test]
fn login_then_work_with_files() {
    let mut m = Machine::boot();

    assert_eq!(m.type_line("letmein"), "Wrong password\n> ");
    assert!(m.type_line("1234").contains("LOCK"));

    assert_eq!(m.type_line("CREATE todo"), "todo was created.\n> ");
    assert_eq!(m.type_line("WRITE todo buy milk"), "\n> ");
    assert_eq!(m.type_line("READ todo"), "buy milk\n> ");
    assert_eq!(m.type_line("WRITE todo done"), "\n> ");
    assert_eq!(m.type_line("READ todo"), "done\n> ");

    assert_eq!(
        m.type_line("LIST"),
        "Files on the system : \n    PASSWORD\n    todo\n2 files.\n> "
    );
}

#[test]
fn password_file_is_never_consulted() {
    let mut m = Machine::logged_in();
    m.type_line("WRITE PASSWORD hunter2");
    m.type_line("LOCK");

    assert_eq!(m.type_line("hunter2"), "Wrong password\n> ");
    assert!(m.type_line("1234").starts_with("Type something"));
}

#[test]
fn lock_round_trip() {
    let mut m = Machine::logged_in();
    assert_eq!(m.type_line("LOCK"), "\n> ");
    assert_eq!(m.kernel.session().status(), SessionStatus::Locked);

    // a command while locked is only a bad password
    assert_eq!(m.type_line("LIST"), "Wrong password\n> ");
    m.type_line("1234");
    assert!(m.type_line("LIST").ends_with("1 files.\n> "));
}

#[test]
fn unknown_command_leaves_the_store_alone() {
    let mut m = Machine::logged_in();
    m.type_line("WRITE a 1");
    let before = m.kernel.files().to_image().unwrap();

    let out = m.type_line("FOO bar");
    assert!(out.trim_end_matches("\n> ").ends_with("FOO is not a command !"));
    assert_eq!(m.kernel.files().to_image().unwrap(), before);
}

#[test]
fn read_of_unknown_file_creates_it() {
    let mut m = Machine::logged_in();
    assert_eq!(m.type_line("READ nothing"), "\n> ");
    assert!(m.type_line("LIST").contains("    nothing\n"));
}

#[test]
fn duplicate_creates_show_twice() {
    let mut m = Machine::logged_in();
    m.type_line("CREATE F");
    m.type_line("CREATE F");
    let listing = m.type_line("LIST");
    assert_eq!(listing.matches("    F\n").count(), 2);
    assert!(listing.contains("3 files."));
}

#[test]
fn end_stops_accepting_input() {
    let mut m = Machine::logged_in();
    assert_eq!(m.type_line("END"), "Stopping the CPU. Bye!\n");
    assert!(m.kernel.is_halted());

    let flow = m
        .kernel
        .handle_line("LIST", &mut m.console, &mut m.pages);
    assert_eq!(flow, Flow::Halt);
    assert_eq!(m.console.output(), "");
}

#[test]
fn page_reports_distinct_blocks() {
    let mut m = Machine::logged_in();
    let first = m.type_line("PAGE");
    let second = m.type_line("PAGE");
    assert!(first.starts_with("Page: 0x"));
    assert!(first.contains(", physical address: 0x"));
    assert_ne!(first, second);
}

fn page_address(out: &str) -> u64 {
    let hex = out
        .strip_prefix("Page: 0x")
        .and_then(|rest| rest.split(',').next())
        .unwrap();
    u64::from_str_radix(hex, 16).unwrap()
}

#[test]
fn page_blocks_start_on_page_boundaries() {
    let mut m = Machine::logged_in();
    let first = page_address(&m.type_line("PAGE"));
    let second = page_address(&m.type_line("PAGE"));

    assert_eq!(first % 0x1000, 0);
    assert_eq!(second % 0x1000, 0);
    assert_ne!(first, second);
}

#[test]
fn page_exhaustion_is_recoverable() {
    let mut m = Machine::logged_in();
    m.pages = BumpPageAllocator::with_capacity(1500);
    assert!(m.type_line("PAGE").starts_with("Page: "));
    assert!(m.type_line("PAGE").starts_with("PAGE failed: "));
    assert_eq!(m.type_line("CREATE still_here"), "still_here was created.\n> ");
}

#[test]
fn custom_secret_from_config() {
    let config = KernelConfig {
        default_secret: "open sesame",
        ..KernelConfig::default()
    };
    let mut kernel = Kernel::new(config);
    let mut console = MemoryConsole::new();
    let mut pages = BumpPageAllocator::default();
    kernel.boot(&mut console);

    kernel.handle_line("1234", &mut console, &mut pages);
    assert_eq!(kernel.session().status(), SessionStatus::Locked);
    kernel.handle_line("open sesame", &mut console, &mut pages);
    assert_eq!(kernel.session().status(), SessionStatus::Unlocked);
}

#[test]
fn crlf_terminated_lines_are_accepted() {
    let mut m = Machine::boot();
    assert!(m.type_line("1234\r\n").starts_with("Type something"));
    assert_eq!(m.type_line("CREATE x\r\n"), "x was created.\n> ");
}
