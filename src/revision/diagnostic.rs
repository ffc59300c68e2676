/// Audit trail for revisions the resolver leaves untouched.
use super::kind::WdRevisionType;
use std::fmt;
use std::io::Write;

/// One unresolved revision.
///
/// `position` is the 1-based progress count at which the revision was met,
/// which stays meaningful after the live list has shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// Known revision type with no safe generic resolution.
    Unhandled {
        position: usize,
        kind: WdRevisionType,
    },
    /// Revision type code outside `WdRevisionType`.
    Unexpected { position: usize, raw: i32 },
}

impl Diagnostic {
    /// Progress count at which the revision was met.
    #[inline]
    pub fn position(&self) -> usize {
        match self {
            Self::Unhandled { position, .. } | Self::Unexpected { position, .. } => *position,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unhandled { kind, .. } => write!(f, "Unhandled revision: {}", kind),
            Self::Unexpected { raw, .. } => write!(f, "Unexpected revision type: {}", raw),
        }
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Writes one line per diagnostic to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        // A closed stderr has nowhere left to report to
        let _ = writeln!(std::io::stderr().lock(), "{}", diagnostic);
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    #[inline]
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    #[inline]
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
