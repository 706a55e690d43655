use std::path::{Path, PathBuf};

/// Where an assertion was written
///
/// Usually captured with [`call_site!`](crate::call_site) so that every
/// field is known at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Module path of the caller, e.g. `my_crate::tests`
    pub file_id: String,
    /// Absolute path of the caller's source file
    pub file_path: PathBuf,
    /// Innermost named function enclosing the call
    pub function: String,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    pub fn new(
        file_id: impl Into<String>,
        file_path: impl Into<PathBuf>,
        function: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_path: file_path.into(),
            function: function.into(),
            line,
            column,
        }
    }

    /// Stem of the source file, e.g. `render_tests` for `tests/render_tests.rs`
    pub fn file_stem(&self) -> String {
        self.file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Make `file!()` absolute
///
/// `file!()` is relative to whichever directory rustc was invoked from
/// (the workspace root under cargo), so the manifest directory and each of
/// its ancestors are tried until one contains the file.
pub fn resolve_source_path(manifest_dir: &str, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        return file.to_path_buf();
    }
    let manifest_dir = Path::new(manifest_dir);
    manifest_dir
        .ancestors()
        .map(|dir| dir.join(file))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| manifest_dir.join(file))
}

/// Reduce a marker's type name to the enclosing function's name
///
/// `krate::tests::renders::{{closure}}::__marker` becomes `renders`.
pub fn function_from_type_name(type_name: &str) -> String {
    let path = type_name
        .rsplit_once("::")
        .map(|(enclosing, _marker)| enclosing)
        .unwrap_or(type_name);
    path.split("::")
        .filter(|segment| !segment.starts_with("{{"))
        .last()
        .unwrap_or(path)
        .to_string()
}

/// Name of the function this macro is expanded in
///
/// ```
/// fn renders_header() -> String {
///     snapcheck_core::function_name!()
/// }
/// assert_eq!(renders_header(), "renders_header");
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __snapcheck_marker() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::identity::call_site::function_from_type_name(__type_name_of(__snapcheck_marker))
    }};
}

/// Capture the current [`CallSite`]
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::identity::CallSite::new(
            module_path!(),
            $crate::identity::call_site::resolve_source_path(env!("CARGO_MANIFEST_DIR"), file!()),
            $crate::function_name!(),
            line!(),
            column!(),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_from_type_name() {
        assert_eq!(
            function_from_type_name("krate::tests::renders::__snapcheck_marker"),
            "renders"
        );
        assert_eq!(
            function_from_type_name("krate::tests::renders::{{closure}}::{{closure}}::__snapcheck_marker"),
            "renders"
        );
        assert_eq!(function_from_type_name("main::__snapcheck_marker"), "main");
    }

    #[test]
    fn test_function_name_macro() {
        assert_eq!(crate::function_name!(), "test_function_name_macro");
        let in_closure = || crate::function_name!();
        assert_eq!(in_closure(), "test_function_name_macro");
    }

    #[test]
    fn test_call_site_macro_resolves_real_file() {
        let site = crate::call_site!();
        assert!(site.file_path.is_absolute());
        assert!(site.file_path.is_file());
        assert_eq!(site.file_stem(), "call_site");
        assert_eq!(site.function, "test_call_site_macro_resolves_real_file");
        assert_eq!(site.file_id, module_path!());
    }

    #[test]
    fn test_absolute_file_is_kept() {
        let path = resolve_source_path("/nowhere", "/abs/file.rs");
        assert_eq!(path, PathBuf::from("/abs/file.rs"));
    }
}
