//! Display forms of source file paths.

use alloc::string::String;

use crate::{Settings, util::push_escaped};

/// Collapses `//`, `/./` and `/dir/../` until none are left.
pub fn normalize_path(path: &str) -> String {
    let mut path = String::from(path);
    loop {
        let before = path.len();
        while let Some(at) = path.find("//") {
            path.replace_range(at..at + 2, "/");
        }
        while let Some(at) = path.find("/./") {
            path.replace_range(at..at + 3, "/");
        }
        if let Some(at) = path.find("/../")
            && let Some(parent) = path[..at].rfind('/')
        {
            path.replace_range(parent..at + 4, "/");
        }
        if path.len() == before {
            return path;
        }
    }
}

/// Cuts the machine-specific prefix of a path inside a package registry or
/// toolchain checkout.
fn strip_registry_prefix(path: &str) -> Option<&str> {
    if let Some(at) = path.find("/registry/src/") {
        let rest = &path[at + "/registry/src/".len()..];
        return rest.split_once('/').map(|(_index, rest)| rest);
    }
    if let Some(at) = path.find("/rustc/") {
        let rest = &path[at + "/rustc/".len()..];
        return rest.split_once('/').map(|(_hash, rest)| rest);
    }
    path.find("/vendor/").map(|at| &path[at + 1..])
}

/// Shortens a source path for display.
///
/// The path is normalized, the [`path_map`](Settings::path_map) prefix
/// rewrites are applied in order, and the result is made relative to the
/// [`project_root`](Settings::project_root). Paths outside the project
/// that point into a package registry lose their machine-specific prefix.
pub fn shorten_path(path: &str, settings: &Settings) -> String {
    let mut path = normalize_path(path);
    for (from, to) in &settings.path_map {
        if let Some(rest) = path.strip_prefix(from.as_str()) {
            path = alloc::format!("{to}{rest}");
        }
    }

    if let Some(root) = settings.project_root.as_deref().filter(|root| !root.is_empty())
        && let Some(rest) = path.strip_prefix(root.trim_end_matches('/'))
        && let Some(relative) = rest.strip_prefix('/')
    {
        return relative.into();
    }
    match strip_registry_prefix(&path) {
        Some(short) => short.into(),
        None => path,
    }
}

/// Escapes an error message for HTML, replacing every `<path>...</path>`
/// span with the bold, shortened path.
pub fn process_message(message: &str, settings: &Settings) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(start) = rest.find("<path>") {
        let after = &rest[start + "<path>".len()..];
        let Some(end) = after.find("</path>").filter(|end| !after[..*end].contains('<')) else {
            push_escaped(&mut out, &rest[..start + 1]);
            rest = &rest[start + 1..];
            continue;
        };
        push_escaped(&mut out, &rest[..start]);
        out.push_str("<b>");
        push_escaped(&mut out, &shorten_path(&after[..end], settings));
        out.push_str("</b>");
        rest = &after[end + "</path>".len()..];
    }
    push_escaped(&mut out, rest);
    out
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/a//b/./c"), "/a/b/c");
        assert_eq!(normalize_path("/a/b/../c/x.rs"), "/a/c/x.rs");
        assert_eq!(normalize_path("/a/b/c/../../d"), "/a/d");
        assert_eq!(normalize_path("src/lib.rs"), "src/lib.rs");
    }

    #[test]
    fn test_shorten_path() {
        let mut settings = Settings::default();
        settings.project_root = Some("/home/dev/app/".to_string());
        assert_eq!(shorten_path("/home/dev/app/src/main.rs", &settings), "src/main.rs");
        assert_eq!(
            shorten_path(
                "/home/dev/.cargo/registry/src/index.crates.io-1949cf8c6b5b557f/tokio-1.0.0/src/lib.rs",
                &settings
            ),
            "tokio-1.0.0/src/lib.rs"
        );
        assert_eq!(
            shorten_path("/rustc/90b35a6239c3d8bdabc530a6a0816f7ff89a0aaf/library/core/src/ops/function.rs", &settings),
            "library/core/src/ops/function.rs"
        );
        assert_eq!(shorten_path("/opt/vendor/x/y.rs", &settings), "vendor/x/y.rs");
        assert_eq!(shorten_path("/elsewhere/z.rs", &settings), "/elsewhere/z.rs");
    }

    #[test]
    fn test_path_map() {
        let mut settings = Settings::default();
        settings.path_map = vec![("/container/app".to_string(), "/home/dev/app".to_string())];
        settings.project_root = Some("/home/dev/app".to_string());
        assert_eq!(shorten_path("/container/app/src/a.rs", &settings), "src/a.rs");
    }

    #[test]
    fn test_process_message() {
        let mut settings = Settings::default();
        settings.project_root = Some("/srv".to_string());
        assert_eq!(
            process_message("File <path>/srv/data/x.txt</path> is < 1 KB", &settings),
            "File <b>data/x.txt</b> is &lt; 1 KB"
        );
        assert_eq!(process_message("<path>unclosed", &settings), "&lt;path&gt;unclosed");
    }
}
