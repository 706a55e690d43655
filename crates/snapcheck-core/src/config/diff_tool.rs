use std::fmt;
use std::path::Path;
use std::sync::Arc;

type FormatFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// How mismatch messages point at the reference and failure files
#[derive(Clone, Default)]
pub enum DiffTool {
    /// `file://` URLs of both files
    #[default]
    Default,
    /// A Kaleidoscope command line
    Ksdiff,
    /// Any formatter taking `(reference, failure)` paths
    Custom(FormatFn),
}

impl DiffTool {
    /// ```
    /// use snapcheck_core::config::DiffTool;
    ///
    /// let tool = DiffTool::custom(|r, f| format!("meld {} {}", r, f));
    /// assert_eq!(tool.format("/a".as_ref(), "/b".as_ref()), "meld /a /b");
    /// ```
    pub fn custom(format: impl Fn(&str, &str) -> String + Send + Sync + 'static) -> Self {
        DiffTool::Custom(Arc::new(format))
    }

    pub fn format(&self, reference: &Path, failure: &Path) -> String {
        let reference = reference.display().to_string();
        let failure = failure.display().to_string();
        match self {
            DiffTool::Default => format!(
                "@\u{2212}\n\"file://{}\"\n@+\n\"file://{}\"",
                reference, failure
            ),
            DiffTool::Ksdiff => format!("ksdiff \"{}\" \"{}\"", reference, failure),
            DiffTool::Custom(format) => format(&reference, &failure),
        }
    }
}

impl fmt::Debug for DiffTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffTool::Default => f.write_str("DiffTool::Default"),
            DiffTool::Ksdiff => f.write_str("DiffTool::Ksdiff"),
            DiffTool::Custom(_) => f.write_str("DiffTool::Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renders_file_urls() {
        let text = DiffTool::Default.format(Path::new("/r/a.png"), Path::new("/t/a.png"));
        assert!(text.contains("\"file:///r/a.png\""));
        assert!(text.contains("\"file:///t/a.png\""));
    }

    #[test]
    fn test_ksdiff_command_line() {
        let text = DiffTool::Ksdiff.format(Path::new("/r/a.png"), Path::new("/t/a.png"));
        assert_eq!(text, "ksdiff \"/r/a.png\" \"/t/a.png\"");
    }
}
