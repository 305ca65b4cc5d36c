//! Shared test infrastructure for end-to-end action runs.
//!
//! Each harness runs the compiled action binary against a stub `bdy` shell
//! script (via `BDY_PATH`, so no install is attempted) with runner-style
//! `INPUT_*` variables and temp `GITHUB_OUTPUT` / `GITHUB_ENV` files.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub const TEST_TOKEN: &str = "tok-test-123";
pub const TEST_ENDPOINT: &str = "https://api.buddy.works";

pub struct ActionHarness {
    dir: TempDir,
    command: Command,
}

impl ActionHarness {
    /// Stage a stub `bdy` with the given shell body. The stub records its
    /// argument vector, one per line, next to itself before the body runs.
    pub fn with_stub(stub_body: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let stub = dir.path().join("bdy");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args\"\n{stub_body}\n"
        );
        fs::write(&stub, script).expect("write stub bdy");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).expect("chmod stub");
        }

        let mut command = Command::new(env!("CARGO_BIN_EXE_buddy-pipeline-run"));
        command
            .env("BDY_PATH", &stub)
            .env("BUDDY_TOKEN", TEST_TOKEN)
            .env("BUDDY_API_ENDPOINT", TEST_ENDPOINT)
            .env("GITHUB_OUTPUT", dir.path().join("github_output"))
            .env("GITHUB_ENV", dir.path().join("github_env"));
        Self { dir, command }
    }

    pub fn input(mut self, name: &str, value: &str) -> Self {
        self.command
            .env(format!("INPUT_{}", name.to_uppercase()), value);
        self
    }

    pub fn without_env(mut self, name: &str) -> Self {
        self.command.env_remove(name);
        self
    }

    pub fn run(mut self) -> ActionResult {
        let output = self.command.output().expect("run action binary");
        ActionResult {
            output,
            dir: self.dir,
        }
    }
}

pub struct ActionResult {
    output: Output,
    dir: TempDir,
}

impl ActionResult {
    pub fn exit_code(&self) -> i32 {
        self.output.status.code().expect("exit code")
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Argument vector the stub `bdy` was invoked with.
    pub fn bdy_args(&self) -> Vec<String> {
        let recorded = fs::read_to_string(self.file("args")).expect("stub was not invoked");
        recorded.lines().map(str::to_string).collect()
    }

    pub fn bdy_was_invoked(&self) -> bool {
        self.file("args").exists()
    }

    pub fn github_output(&self) -> String {
        fs::read_to_string(self.file("github_output")).unwrap_or_default()
    }

    pub fn github_env(&self) -> String {
        fs::read_to_string(self.file("github_env")).unwrap_or_default()
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
