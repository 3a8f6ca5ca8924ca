//! Lexical path algebra.
//!
//! These helpers never touch the filesystem: `..` is folded textually and
//! symlinks are not followed, matching how bundlers compare module ids.

use std::path::{Component, Path, PathBuf};

/// Replace Windows separators with `/`.
#[inline]
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Render a path as a `/`-separated string.
pub fn to_slash_string(path: &Path) -> String {
    normalize_slashes(&path.to_string_lossy())
}

/// Fold `.` and `..` components without consulting the filesystem.
///
/// `..` above the root is dropped, a leading `..` on a relative path is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Resolve `path` against `base`. Absolute inputs ignore `base`.
pub fn resolve(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base.join(path))
    }
}

/// Concatenate `path` onto `base`, even when `path` is itself rooted.
pub fn join(base: &Path, path: &str) -> PathBuf {
    let trimmed = path.trim_start_matches(['/', '\\']);
    normalize_lexically(&base.join(trimmed))
}

/// Compute the relative path that leads from `from` to `to`.
///
/// Both inputs are normalized first. Equal paths yield an empty path.
pub fn relative(from: &Path, to: &Path) -> PathBuf {
    let from = normalize_lexically(from);
    let to = normalize_lexically(to);

    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for component in &from_parts[common..] {
        if !matches!(component, Component::CurDir) {
            out.push("..");
        }
    }
    for component in &to_parts[common..] {
        out.push(component.as_os_str());
    }
    out
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize_lexically(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_lexically(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_resolve() {
        let base = Path::new("/project");
        assert_eq!(resolve(base, "./src/App.vue"), PathBuf::from("/project/src/App.vue"));
        assert_eq!(resolve(base, "../lib/x.vue"), PathBuf::from("/lib/x.vue"));
        assert_eq!(resolve(base, "/abs/y.vue"), PathBuf::from("/abs/y.vue"));
    }

    #[test]
    fn test_join_keeps_rooted_segments() {
        let base = Path::new("/project");
        assert_eq!(join(base, "src/A.vue"), PathBuf::from("/project/src/A.vue"));
        assert_eq!(join(base, "/other/A.vue"), PathBuf::from("/project/other/A.vue"));
    }

    #[test]
    fn test_relative() {
        assert_eq!(
            relative(Path::new("/project"), Path::new("/project/src/Foo.vue")),
            PathBuf::from("src/Foo.vue")
        );
        assert_eq!(
            relative(Path::new("/project/app"), Path::new("/project/lib/Foo.vue")),
            PathBuf::from("../lib/Foo.vue")
        );
        assert_eq!(
            relative(Path::new("/project"), Path::new("/project")),
            PathBuf::new()
        );
    }

    #[test]
    fn test_to_slash_string() {
        assert_eq!(normalize_slashes("src\\components\\A.vue"), "src/components/A.vue");
        assert_eq!(to_slash_string(Path::new("/a/b")), "/a/b");
    }
}
