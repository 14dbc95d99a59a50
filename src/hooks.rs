//! Pre and post copy hooks.
//! A hook is a shell invocation plus a script body. The script is fed to the
//! shell on standard input and runs inside the destination directory.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use log::{debug, warn};

use crate::error::{Error, Result};

/// One `{shell: script}` entry of a template's `pre` or `post` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    /// Program and arguments, e.g. `bash -e`.
    pub shell: String,
    /// Script text written to the program's stdin.
    pub script: String,
}

/// Runs a single hook to completion.
///
/// Output of the hook is captured and forwarded to this process' stdout and
/// stderr once it finishes.
///
/// # Returns
/// * `Result<bool>` - Whether the hook exited successfully
///
/// # Errors
/// * `Error::HookError` if the shell string is empty or the program cannot be started
pub fn run_hook<P: AsRef<Path>>(hook: &Hook, working_dir: P) -> Result<bool> {
    let mut parts = hook.shell.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::HookError("empty shell invocation".to_string()))?;

    debug!("Running hook '{}' in {}", hook.shell, working_dir.as_ref().display());

    let mut child = Command::new(program)
        .args(parts)
        .current_dir(working_dir.as_ref())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::HookError(format!("failed to start '{}': {}", hook.shell, e)))?;

    // The script is fed from its own thread so a hook printing more than a pipe
    // buffer cannot block on us while we block on its stdin.
    let writer = child.stdin.take().map(|mut stdin| {
        let script = hook.script.clone();
        thread::spawn(move || stdin.write_all(script.as_bytes()))
    });

    let output = child.wait_with_output()?;

    if let Some(writer) = writer {
        match writer.join() {
            // A shell that exits early closes its end of the pipe; that is not our error.
            Ok(Err(e)) if e.kind() != io::ErrorKind::BrokenPipe => return Err(Error::IoError(e)),
            Ok(_) => {}
            Err(_) => return Err(Error::HookError("stdin writer panicked".to_string())),
        }
    }

    io::stdout().write_all(&output.stdout)?;
    io::stderr().write_all(&output.stderr)?;

    if !output.status.success() {
        warn!("Hook '{}' exited with {}.", hook.shell, output.status);
    }
    Ok(output.status.success())
}

/// Runs hooks sequentially, reporting failures without stopping.
pub fn run_hooks<P: AsRef<Path>>(hooks: &[Hook], working_dir: P) {
    for hook in hooks {
        if let Err(e) = run_hook(hook, working_dir.as_ref()) {
            warn!("{e}");
        }
    }
}
