//! Recoverable compile diagnostics, collected apart from the build result.

use std::fmt;
use std::path::PathBuf;

/// A recoverable problem found while compiling.
///
/// Diagnostics never change the shape of the output beyond the documented
/// fallback node; aborting is reserved for unreadable input and unwritable
/// destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An asset file whose content is not an integer id.
    NonNumericAsset { path: PathBuf, content: String },
    /// A script source that failed the best-effort syntax scan.
    SyntaxIssue {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NonNumericAsset { path, content } => {
                write!(
                    f,
                    "{}: asset content \"{}\" is not a numeric id, using 0",
                    path.display(),
                    content
                )
            }
            Diagnostic::SyntaxIssue { path, line, message } => {
                write!(f, "{}:{}: {}", path.display(), line, message)
            }
        }
    }
}

/// Collecting sink for diagnostics.
///
/// Reports are mirrored to the log as they happen so interactive runs see
/// warnings immediately; tests assert on the collected list instead of
/// capturing process output.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_accumulate_in_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.report(Diagnostic::NonNumericAsset {
            path: PathBuf::from("icon.asset"),
            content: "abc".to_string(),
        });
        diagnostics.report(Diagnostic::SyntaxIssue {
            path: PathBuf::from("main.server.lua"),
            line: 3,
            message: "unterminated string".to_string(),
        });

        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(diagnostics.items()[0], Diagnostic::NonNumericAsset { .. }));
        assert!(matches!(diagnostics.items()[1], Diagnostic::SyntaxIssue { line: 3, .. }));
    }

    #[test]
    fn display_names_the_offending_path() {
        let diagnostic = Diagnostic::SyntaxIssue {
            path: PathBuf::from("src/broken.server.lua"),
            line: 7,
            message: "unclosed `(`".to_string(),
        };
        let rendered = diagnostic.to_string();
        assert!(rendered.contains("broken.server.lua"));
        assert!(rendered.contains(":7:"));
        assert!(rendered.contains("unclosed `(`"));
    }
}
