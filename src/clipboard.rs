//! Clipboard access for share links
//!
//! Backends are tried in order: the native clipboard, then the configured
//! `clipboard_command` (text is written to its stdin). When neither works the
//! caller shows the link itself.

use std::io::Write;
use std::process::{Command, Stdio};

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to access clipboard: {0}")]
    Native(String),

    #[error("failed to run '{command}': {source}")]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}")]
    Exited {
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("clipboard command is empty")]
    EmptyCommand,
}

/// Something that can take text onto a clipboard
pub trait ClipboardAccess: Send {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Native clipboard implementation using arboard
///
/// Kept alive for the whole session: on X11 the selection is served by this
/// process and disappears when the handle is dropped.
pub struct NativeClipboard {
    clipboard: Clipboard,
}

impl NativeClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let clipboard = Clipboard::new().map_err(|e| ClipboardError::Native(e.to_string()))?;
        Ok(Self { clipboard })
    }
}

impl ClipboardAccess for NativeClipboard {
    fn name(&self) -> &str {
        "native"
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Native(e.to_string()))
    }
}

/// User-configured clipboard program, e.g. `wl-copy` or `xclip -selection clipboard`
pub struct CommandClipboard {
    command: String,
}

impl CommandClipboard {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl ClipboardAccess for CommandClipboard {
    fn name(&self) -> &str {
        &self.command
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(ClipboardError::EmptyCommand)?;
        let to_error = |source: std::io::Error| ClipboardError::Command {
            command: self.command.clone(),
            source,
        };

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(to_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = stdin.write_all(text.as_bytes());
            // Close stdin to signal EOF
            drop(stdin);
            if let Err(e) = written {
                let _ = child.wait();
                return Err(to_error(e));
            }
        }

        // Tools like xclip exit non-zero when there is no display
        let status = child.wait().map_err(to_error)?;
        if !status.success() {
            return Err(ClipboardError::Exited {
                command: self.command.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// How a copy request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { via: String },
    /// Nothing accepted the text; show it instead
    Unavailable { text: String },
}

/// Ordered list of clipboard backends
pub struct ClipboardChain {
    backends: Vec<Box<dyn ClipboardAccess>>,
}

impl ClipboardChain {
    /// Native clipboard (when the display allows it), then `command` if set
    pub fn new(command: Option<&str>) -> Self {
        let mut backends: Vec<Box<dyn ClipboardAccess>> = Vec::new();

        match NativeClipboard::new() {
            Ok(native) => backends.push(Box::new(native)),
            Err(e) => tracing::debug!(error = %e, "native clipboard unavailable"),
        }
        if let Some(command) = command.filter(|c| !c.trim().is_empty()) {
            backends.push(Box::new(CommandClipboard::new(command)));
        }

        Self { backends }
    }

    pub fn with_backends(backends: Vec<Box<dyn ClipboardAccess>>) -> Self {
        Self { backends }
    }

    pub fn copy(&mut self, text: &str) -> CopyOutcome {
        for backend in self.backends.iter_mut() {
            match backend.set_text(text) {
                Ok(()) => {
                    tracing::debug!(via = backend.name(), "copied to clipboard");
                    return CopyOutcome::Copied {
                        via: backend.name().to_string(),
                    };
                }
                Err(e) => tracing::warn!(via = backend.name(), error = %e, "clipboard copy failed"),
            }
        }

        CopyOutcome::Unavailable {
            text: text.to_string(),
        }
    }
}
