//! The kernel-session context: password gate, shell and file table.

use crate::boundary::{Console, PageAllocator};
use crate::config::{KernelConfig, PASSWORD_FILE};
use crate::error::KernelError;
use crate::fs::FileTable;
use crate::session::{CredentialVerifier, DigestVerifier, Session};
use crate::shell::{self, Outcome};

/// Whether the input loop should keep feeding lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

const LOGGED_IN_BANNER: &str = "Type something, it will go through the kernel\n\
Commands: END, PAGE, LIST, CREATE <file>, READ <file>, WRITE <file> <text>, LOCK\n";

pub struct Kernel<V: CredentialVerifier = DigestVerifier> {
    session: Session<V>,
    files: FileTable,
    config: KernelConfig,
    halted: bool,
}

impl Kernel<DigestVerifier> {
    /// A kernel whose gate accepts `config.default_secret`.
    pub fn new(config: KernelConfig) -> Self {
        let verifier = DigestVerifier::new(config.default_secret.as_bytes());
        Self::with_verifier(config, verifier)
    }
}

impl Default for Kernel<DigestVerifier> {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

impl<V: CredentialVerifier> Kernel<V> {
    /// Build a kernel with an empty file table (root sentinel only).
    pub fn with_verifier(config: KernelConfig, verifier: V) -> Self {
        Self {
            session: Session::new(verifier),
            files: FileTable::init(),
            config,
            halted: false,
        }
    }

    /// Seed `PASSWORD`, clear the screen and ask for the password.
    pub fn boot<C: Console + ?Sized>(&mut self, console: &mut C) {
        if self.config.seed_password_file {
            match self.seed_password_file() {
                Ok(()) => log::info!("boot: seeded {}", PASSWORD_FILE),
                Err(err) => log::warn!("boot: could not seed {}: {}", PASSWORD_FILE, err),
            }
        }

        console.clear_screen();
        console.write_str("Welcome to arclight!\nPlease enter the password : \n");
        console.write_str(self.config.prompt);
        log::info!("boot: waiting for credentials");
    }

    /// Route one completed input line through the gate or the shell.
    ///
    /// Once the kernel has halted every further line is ignored.
    pub fn handle_line<C, P>(&mut self, line: &str, console: &mut C, pages: &mut P) -> Flow
    where
        C: Console + ?Sized,
        P: PageAllocator + ?Sized,
    {
        if self.halted {
            return Flow::Halt;
        }
        let line = shell::strip_line_ending(line);

        if !self.session.is_unlocked() {
            self.login(line, console);
            return Flow::Continue;
        }

        match shell::dispatch(line, &mut self.files, pages, console, &self.config) {
            Outcome::Continue => Flow::Continue,
            Outcome::Lock => {
                self.session.lock();
                Flow::Continue
            }
            Outcome::Halt => {
                self.session.lock();
                self.halted = true;
                Flow::Halt
            }
        }
    }

    pub fn session(&self) -> &Session<V> {
        &self.session
    }

    pub fn files(&self) -> &FileTable {
        &self.files
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn login<C: Console + ?Sized>(&mut self, attempt: &str, console: &mut C) {
        if self.session.submit_credential(attempt) {
            console.write_str(LOGGED_IN_BANNER);
        } else {
            console.write_str("Wrong password\n");
        }
        console.write_str(self.config.prompt);
    }

    fn seed_password_file(&mut self) -> Result<(), KernelError> {
        self.files.create(PASSWORD_FILE)?;
        let id = self.files.open_or_create(PASSWORD_FILE)?;
        self.files.write(id, self.config.default_secret.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStatus;
    use crate::testing::{BumpPageAllocator, MemoryConsole};

    fn booted() -> (Kernel, MemoryConsole, BumpPageAllocator) {
        let mut kernel = Kernel::default();
        let mut console = MemoryConsole::new();
        kernel.boot(&mut console);
        (kernel, console, BumpPageAllocator::default())
    }

    #[test]
    fn boot_seeds_password_and_prompts() {
        let (kernel, console, _) = booted();
        assert_eq!(console.clears(), 1);
        assert!(console.output().ends_with("Please enter the password : \n> "));

        let files = kernel.files();
        let id = files.find(PASSWORD_FILE).unwrap();
        assert_eq!(files.read(id).unwrap(), b"1234");
        assert_eq!(kernel.session().status(), SessionStatus::Locked);
    }

    #[test]
    fn seeding_can_be_turned_off() {
        let config = KernelConfig {
            seed_password_file: false,
            ..KernelConfig::default()
        };
        let mut kernel = Kernel::new(config);
        kernel.boot(&mut MemoryConsole::new());
        assert!(kernel.files().is_empty());
    }

    #[test]
    fn wrong_password_reprompts() {
        let (mut kernel, mut console, mut pages) = booted();
        console.take();
        assert_eq!(kernel.handle_line("LIST", &mut console, &mut pages), Flow::Continue);
        assert_eq!(console.take(), "Wrong password\n> ");
        assert_eq!(kernel.session().status(), SessionStatus::Locked);
    }

    #[test]
    fn right_password_shows_the_banner() {
        let (mut kernel, mut console, mut pages) = booted();
        console.take();
        kernel.handle_line("1234\n", &mut console, &mut pages);
        let out = console.take();
        assert!(out.starts_with("Type something"));
        assert!(out.ends_with("> "));
        assert!(kernel.session().is_unlocked());
    }

    #[test]
    fn lock_sends_the_next_line_to_the_gate() {
        let (mut kernel, mut console, mut pages) = booted();
        kernel.handle_line("1234", &mut console, &mut pages);
        kernel.handle_line("LOCK", &mut console, &mut pages);
        assert_eq!(kernel.session().status(), SessionStatus::Locked);

        console.take();
        kernel.handle_line("CREATE sneaky", &mut console, &mut pages);
        assert_eq!(console.take(), "Wrong password\n> ");
        assert!(kernel.files().find("sneaky").is_none());
    }

    #[test]
    fn halt_is_terminal() {
        let (mut kernel, mut console, mut pages) = booted();
        kernel.handle_line("1234", &mut console, &mut pages);
        assert_eq!(kernel.handle_line("END", &mut console, &mut pages), Flow::Halt);
        assert!(kernel.is_halted());

        console.take();
        assert_eq!(kernel.handle_line("1234", &mut console, &mut pages), Flow::Halt);
        assert_eq!(kernel.handle_line("LIST", &mut console, &mut pages), Flow::Halt);
        assert_eq!(console.output(), "");
    }

    #[test]
    fn end_while_locked_is_just_a_wrong_password() {
        let (mut kernel, mut console, mut pages) = booted();
        assert_eq!(kernel.handle_line("END", &mut console, &mut pages), Flow::Continue);
        assert!(!kernel.is_halted());
    }
}
