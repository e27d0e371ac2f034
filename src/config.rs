/// Secret accepted by the password gate unless a build overrides it.
pub const DEFAULT_SECRET: &str = "1234";

/// Name of the file seeded at boot with a copy of the secret.
pub const PASSWORD_FILE: &str = "PASSWORD";

/// Size of the block handed out by the `PAGE` command.
pub const PAGE_REQUEST_SIZE: usize = 1000;

/// Every `PAGE` block starts on its own 4 KiB page.
pub const PAGE_ALIGN: usize = 0x1000;

pub const PROMPT: &str = "> ";

/// Compile-time knobs of one kernel session.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    pub default_secret: &'static str,
    pub page_request_size: usize,
    pub page_request_align: usize,
    pub prompt: &'static str,
    /// Mirror the secret into `PASSWORD` at boot as a write-path smoke test.
    pub seed_password_file: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            default_secret: DEFAULT_SECRET,
            page_request_size: PAGE_REQUEST_SIZE,
            page_request_align: PAGE_ALIGN,
            prompt: PROMPT,
            seed_password_file: true,
        }
    }
}
