//! Shared test utilities.
//!
//! Gated behind the `test-support` feature so the crate's own
//! integration tests (which see the library as an external dependency)
//! can use them alongside unit tests.

use crate::error::Result;
use crate::exec::CommandExecutor;
use std::process::Output;
use std::sync::Mutex;

/// A scripted [`CommandExecutor`] that records every invocation.
///
/// Each call is appended to the invocation log as `[cmd, args...]`.
/// Commands listed via [`ScriptedExecutor::fail_command`] return a
/// non-zero exit status with the given stderr; everything else
/// succeeds with empty output.
#[derive(Default)]
pub struct ScriptedExecutor {
    invocations: Mutex<Vec<Vec<String>>>,
    failures: Mutex<Vec<(String, String)>>,
}

impl ScriptedExecutor {
    /// Create an executor where every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make invocations of `cmd` fail with `stderr`.
    pub fn fail_command(&self, cmd: &str, stderr: &str) {
        self.failures
            .lock()
            .expect("failures lock")
            .push((cmd.to_owned(), stderr.to_owned()));
    }

    /// The recorded invocations, each as `[cmd, args...]`.
    #[must_use]
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().expect("invocations lock").clone()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut invocation = vec![cmd.to_owned()];
        invocation.extend(args.iter().map(|arg| (*arg).to_owned()));
        self.invocations
            .lock()
            .expect("invocations lock")
            .push(invocation);

        let failure = self
            .failures
            .lock()
            .expect("failures lock")
            .iter()
            .find(|(failing, _)| failing == cmd)
            .map(|(_, stderr)| stderr.clone());

        Ok(match failure {
            Some(stderr) => output(1, stderr.as_bytes()),
            None => output(0, b""),
        })
    }
}

#[cfg(unix)]
fn output(code: i32, stderr: &[u8]) -> Output {
    use std::os::unix::process::ExitStatusExt;

    Output {
        status: std::process::ExitStatus::from_raw(code << 8),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

/// Magic bytes of a 64-bit little-endian ELF header, padded so the
/// file is plausibly executable-sized.
#[must_use]
pub fn fake_elf_bytes() -> Vec<u8> {
    let mut bytes = vec![0x7f, b'E', b'L', b'F', 0x02, 0x01, 0x01, 0x00];
    bytes.resize(64, 0);
    bytes
}

/// Magic bytes of a fat (universal) Mach-O header.
#[must_use]
pub fn fake_universal_macho_bytes() -> Vec<u8> {
    let mut bytes = vec![0xca, 0xfe, 0xba, 0xbe, 0x00, 0x00, 0x00, 0x02];
    bytes.resize(64, 0);
    bytes
}
