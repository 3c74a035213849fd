//! GPU error channel.
//!
//! Rendering failures never unwind through the frame loop. Every GPU-facing
//! object receives an [`ErrorSink`] at construction and reports through it;
//! the object itself then stays in a durably unusable state (a failed program,
//! a mesh that is never drawn) and callers observe that through boolean
//! returns.

use std::fmt;
use std::rc::Rc;

/// Classification of a reported GPU event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Informational event; not a failure.
    Info,
    /// No usable GPU context could be created.
    ContextUnsupported,
    /// A shader stage failed to parse or validate.
    ShaderCompile,
    /// Stages could not be linked into one program.
    ProgramLink,
    /// A declared uniform was not found in the linked program.
    UniformUnresolved,
    /// Vertex/index data could not be packed or allocated.
    BufferAllocation,
    /// Image data could not be uploaded (no texture path uses this yet).
    TextureUpload,
    /// A draw was requested that cannot be issued.
    DrawCall,
}

impl ErrorKind {
    #[inline]
    pub fn is_failure(self) -> bool {
        self != ErrorKind::Info
    }

    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Info => "info",
            ErrorKind::ContextUnsupported => "context unsupported",
            ErrorKind::ShaderCompile => "shader compilation failed",
            ErrorKind::ProgramLink => "program link failed",
            ErrorKind::UniformUnresolved => "uniform unresolved",
            ErrorKind::BufferAllocation => "buffer allocation failed",
            ErrorKind::TextureUpload => "texture upload failed",
            ErrorKind::DrawCall => "draw call failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single report delivered to an [`ErrorSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuError {
    pub kind: ErrorKind,
    /// Backend error code. wgpu and naga report errors as typed values with
    /// no numeric code, so reports raised inside this crate leave it `None`;
    /// embedders forwarding errors from an API that has codes attach them
    /// with [`GpuError::with_code`].
    pub native_code: Option<u32>,
    /// Diagnostic text (compiler log, offending name, ...).
    pub message: Option<String>,
}

impl GpuError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            native_code: None,
            message: Some(message.into()),
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.native_code = Some(code);
        self
    }
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(code) = self.native_code {
            write!(f, " (code {code})")?;
        }
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for GpuError {}

/// Injected, fire-and-forget error callback.
///
/// Cloning is cheap; all clones call the same handler. Rendering is
/// single-threaded, so the handler is not required to be `Send`.
#[derive(Clone)]
pub struct ErrorSink {
    handler: Rc<dyn Fn(&GpuError)>,
}

impl ErrorSink {
    pub fn new(handler: impl Fn(&GpuError) + 'static) -> Self {
        Self {
            handler: Rc::new(handler),
        }
    }

    /// Sink that forwards every report to the `log` facade.
    pub fn logging() -> Self {
        Self::new(|err| {
            if err.kind.is_failure() {
                log::error!("{err}");
            } else if let Some(msg) = &err.message {
                log::info!("{msg}");
            }
        })
    }

    /// Sink that drops every report.
    pub fn silent() -> Self {
        Self::new(|_| {})
    }

    pub fn report(&self, err: GpuError) {
        (self.handler)(&err);
    }

    /// Shorthand for `report(GpuError::new(kind, message))`.
    pub fn emit(&self, kind: ErrorKind, message: impl Into<String>) {
        self.report(GpuError::new(kind, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(ErrorKind::Info, message);
    }
}

impl Default for ErrorSink {
    fn default() -> Self {
        Self::logging()
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn display_includes_kind_code_and_message() {
        let err = GpuError::new(ErrorKind::UniformUnresolved, "`model`").with_code(7);
        assert_eq!(err.to_string(), "uniform unresolved (code 7): `model`");
    }

    #[test]
    fn display_without_message() {
        let err = GpuError {
            kind: ErrorKind::DrawCall,
            native_code: None,
            message: None,
        };
        assert_eq!(err.to_string(), "draw call failed");
    }

    #[test]
    fn clones_share_one_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = Rc::clone(&seen);
            ErrorSink::new(move |e| seen.borrow_mut().push(e.kind))
        };
        let other = sink.clone();

        sink.emit(ErrorKind::ShaderCompile, "a");
        other.info("b");

        assert_eq!(*seen.borrow(), vec![ErrorKind::ShaderCompile, ErrorKind::Info]);
    }

    #[test]
    fn info_is_not_a_failure() {
        assert!(!ErrorKind::Info.is_failure());
        assert!(ErrorKind::ProgramLink.is_failure());
    }
}
