use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::identity::call_site::CallSite;
use crate::identity::counter::CounterRegistry;

/// Directory holding references, created next to the test source
pub const SNAPSHOTS_DIR: &str = "__Snapshots__";

/// Stable identity of one snapshot reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotIdentity {
    pub directory: PathBuf,
    /// `{function}.{name or ordinal}`, already sanitized
    pub base_name: String,
    pub extension: Option<String>,
    /// Stem of the test source file, used to mirror artifacts
    pub test_file_stem: String,
}

impl SnapshotIdentity {
    /// File name of the reference: `base_name[.extension]`
    pub fn file_name(&self) -> String {
        match &self.extension {
            Some(extension) => format!("{}.{}", self.base_name, extension),
            None => self.base_name.clone(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }
}

impl std::fmt::Display for SnapshotIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.test_file_stem, self.file_name())
    }
}

/// Replace each run of non-word characters with `-`, then trim `-`
///
/// ```
/// use snapcheck_core::identity::sanitize_path_component;
///
/// assert_eq!(sanitize_path_component("renders header (dark)"), "renders-header-dark");
/// ```
pub fn sanitize_path_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_separator = false;
    for c in raw.chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
            in_separator = false;
        } else if !in_separator {
            out.push('-');
            in_separator = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// `{dir of source}/__Snapshots__/{source file stem}`
pub fn default_directory(site: &CallSite) -> PathBuf {
    let parent = site
        .file_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    parent.join(SNAPSHOTS_DIR).join(site.file_stem())
}

/// Maps call sites to snapshot identities
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    registry: Arc<CounterRegistry>,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(CounterRegistry::global())
    }
}

impl IdentityResolver {
    pub fn new(registry: Arc<CounterRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<CounterRegistry> {
        &self.registry
    }

    /// Resolve the identity of one assertion
    ///
    /// Named snapshots never touch the counter. An empty name is treated as
    /// no name. `directory` replaces the default `__Snapshots__` location.
    pub fn resolve(
        &self,
        site: &CallSite,
        name: Option<&str>,
        extension: Option<&str>,
        directory: Option<&Path>,
    ) -> SnapshotIdentity {
        let identifier = match name.filter(|n| !n.is_empty()) {
            Some(name) => sanitize_path_component(name),
            None => self.registry.next_ordinal(site).to_string(),
        };
        let base_name = format!("{}.{}", sanitize_path_component(&site.function), identifier);

        SnapshotIdentity {
            directory: directory
                .map(Path::to_path_buf)
                .unwrap_or_else(|| default_directory(site)),
            base_name,
            extension: extension.map(str::to_string),
            test_file_stem: site.file_stem(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(line: u32) -> CallSite {
        CallSite::new(
            "krate::render_tests",
            "/work/krate/tests/render_tests.rs",
            "renders_header",
            line,
            5,
        )
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_path_component("a b"), "a-b");
        assert_eq!(sanitize_path_component("--a//b--"), "a-b");
        assert_eq!(sanitize_path_component("snake_case_9"), "snake_case_9");
        assert_eq!(sanitize_path_component("é€x"), "é-x");
        assert_eq!(sanitize_path_component("!!!"), "");
    }

    #[test]
    fn test_unnamed_identity_uses_ordinal_and_default_directory() {
        let resolver = IdentityResolver::new(Arc::new(CounterRegistry::new()));
        let first = resolver.resolve(&site(10), None, Some("txt"), None);
        let second = resolver.resolve(&site(11), None, Some("txt"), None);

        assert_eq!(first.base_name, "renders_header.1");
        assert_eq!(second.base_name, "renders_header.2");
        assert_eq!(
            first.path(),
            PathBuf::from("/work/krate/tests/__Snapshots__/render_tests/renders_header.1.txt")
        );
        assert_eq!(first.test_file_stem, "render_tests");
        assert_eq!(first.to_string(), "render_tests/renders_header.1.txt");
    }

    #[test]
    fn test_named_identity_skips_counter() {
        let registry = Arc::new(CounterRegistry::new());
        let resolver = IdentityResolver::new(Arc::clone(&registry));

        let named = resolver.resolve(&site(10), Some("dark mode"), Some("png"), None);
        assert_eq!(named.base_name, "renders_header.dark-mode");

        let unnamed = resolver.resolve(&site(12), Some(""), None, None);
        assert_eq!(unnamed.base_name, "renders_header.1");
        assert_eq!(unnamed.file_name(), "renders_header.1");
    }

    #[test]
    fn test_explicit_directory_override() {
        let resolver = IdentityResolver::new(Arc::new(CounterRegistry::new()));
        let identity = resolver.resolve(&site(1), Some("x"), Some("json"), Some(Path::new("/refs")));
        assert_eq!(identity.path(), PathBuf::from("/refs/renders_header.x.json"));
    }
}
