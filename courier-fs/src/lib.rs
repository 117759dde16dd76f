//! UTF-8 file helpers for request and result files, built on `cap-std` and
//! `camino`.
//!
//! Every operation opens the containing directory with ambient authority and
//! then works relative to it, so callers pass ordinary paths while the actual
//! file access stays capability-scoped.
#![forbid(unsafe_code)]

use std::io::{self, Read};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Read a whole UTF-8 file, such as a JSON request, into a string.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Write `contents` to `path`, creating missing parent directories first.
pub fn write_string(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_parent(path)?;
    dir.write(name.as_str(), contents)
}

/// Return whether `path` is a regular file.
///
/// Fails with [`io::ErrorKind::NotFound`] when the path, or its parent
/// directory, does not exist.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_parent(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Open the directory containing `path` and return it with the file name.
fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Create the parent directory of `path` and any missing ancestors.
fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = split_at_root(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Split `parent` into an ambient base directory and the path below it.
///
/// Absolute paths are anchored at their root (or drive prefix on Windows);
/// relative paths at the current directory.
fn split_at_root(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if base == Utf8Path::new(".") {
        parent.to_path_buf()
    } else {
        parent
            .strip_prefix(&base)
            .map_err(|_| io::Error::other("failed to strip root from parent path"))?
            .to_path_buf()
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path")
    }

    #[rstest]
    fn writes_into_new_nested_directories(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("out/nested/route.json");

        write_string(&path, "{\"ok\":true}").expect("write file");

        assert_eq!(read_to_string(&path).expect("read back"), "{\"ok\":true}");
        assert!(is_regular_file(&path).expect("stat file"));
    }

    #[rstest]
    fn directories_are_not_regular_files(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let nested = root.join("folder");
        std::fs::create_dir(&nested).expect("create folder");

        assert!(!is_regular_file(&nested).expect("stat folder"));
    }

    #[rstest]
    #[case("missing.json")]
    #[case("absent/missing.json")]
    fn missing_paths_report_not_found(temp_dir: TempDir, #[case] relative: &str) {
        let path = utf8(&temp_dir).join(relative);
        let err = is_regular_file(&path).expect_err("path is missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn reading_a_missing_file_fails(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("missing.json");
        let err = read_to_string(&path).expect_err("file is missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
