//! Clipboard and browser helpers
//!
//! Copying goes through two backends: the system clipboard (`arboard`) and a
//! platform clipboard command fed on stdin. Child processes are waited on
//! every path. The `arboard` handle lives as long as the [`Clipboard`] that
//! owns it, because on X11 the copied text is served by the owning process and
//! is lost when the handle is dropped. On Linux the command (`wl-copy`,
//! `xclip`, `xsel`) is tried first since it keeps serving the text on its own.

use crate::error::{AppxError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

pub trait ClipboardBackend {
    fn name(&self) -> &'static str;
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard through `arboard`, opened on first use
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        let handle = match &mut self.handle {
            Some(handle) => handle,
            slot => slot.insert(
                arboard::Clipboard::new().map_err(|e| AppxError::Clipboard(e.to_string()))?,
            ),
        };
        let result = handle
            .set_text(text.to_owned())
            .map_err(|e| AppxError::Clipboard(e.to_string()));
        if result.is_err() {
            // Reopen next time
            self.handle = None;
        }
        result
    }
}

/// Pipes the text into the first clipboard command that can be spawned
pub struct CommandClipboard {
    candidates: Vec<(&'static str, Vec<&'static str>)>,
}

impl Default for CommandClipboard {
    fn default() -> Self {
        let candidates = if cfg!(windows) {
            vec![("clip", vec![])]
        } else if cfg!(target_os = "macos") {
            vec![("pbcopy", vec![])]
        } else {
            vec![
                ("wl-copy", vec![]),
                ("xclip", vec!["-selection", "clipboard"]),
                ("xsel", vec!["--clipboard", "--input"]),
            ]
        };
        Self { candidates }
    }
}

impl CommandClipboard {
    pub fn with_candidates(candidates: Vec<(&'static str, Vec<&'static str>)>) -> Self {
        Self { candidates }
    }

    fn pipe_into(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Err(std::io::Error::other("stdin not captured")),
        };
        // stdin is closed here so the command sees EOF

        if let Err(e) = written {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!("{} exited with {}", program, status)))
        }
    }
}

impl ClipboardBackend for CommandClipboard {
    fn name(&self) -> &'static str {
        "command"
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut last_error = String::from("no clipboard command available");
        for (program, args) in &self.candidates {
            match Self::pipe_into(program, args, text) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(program, error = %e, "clipboard command failed");
                    last_error = format!("{}: {}", program, e);
                }
            }
        }
        Err(AppxError::Clipboard(last_error))
    }
}

/// Copy `text` with the first backend that succeeds; returns its name.
pub fn copy_with(text: &str, backends: &mut [&mut dyn ClipboardBackend]) -> Result<&'static str> {
    let mut failures = Vec::new();
    for backend in backends.iter_mut() {
        match backend.set_text(text) {
            Ok(()) => return Ok(backend.name()),
            Err(e) => {
                tracing::debug!(backend = backend.name(), error = %e, "copy attempt failed");
                failures.push(format!("{}: {}", backend.name(), e));
            }
        }
    }
    let reason = failures.join("; ");
    tracing::warn!(%reason, "failed to copy to clipboard");
    Err(AppxError::Clipboard(reason))
}

/// Clipboard owned by the browser for its whole run
pub struct Clipboard {
    system: SystemClipboard,
    command: CommandClipboard,
    command_first: bool,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::with_command(CommandClipboard::default())
    }
}

impl Clipboard {
    pub fn with_command(command: CommandClipboard) -> Self {
        Self {
            system: SystemClipboard::default(),
            command,
            command_first: cfg!(all(unix, not(target_os = "macos"))),
        }
    }

    /// Copy `text`, falling back to the second backend; returns the one used
    pub fn copy_to_clipboard(&mut self, text: &str) -> Result<&'static str> {
        let mut backends: [&mut dyn ClipboardBackend; 2] = if self.command_first {
            [&mut self.command, &mut self.system]
        } else {
            [&mut self.system, &mut self.command]
        };
        copy_with(text, &mut backends)
    }
}

/// Open an API endpoint in the default browser
pub fn open_url(url: &str) -> Result<()> {
    open::that(url).map_err(|e| {
        tracing::warn!(url, error = %e, "failed to open url");
        AppxError::IoError(e)
    })
}
