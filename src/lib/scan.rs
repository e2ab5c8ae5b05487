//! Finds `.fpp` sources below a path
use std::fs;
use std::path::{Path, PathBuf};

pub const EXTENSION: &str = "fpp";

fn readable(path: &Path) -> bool { fs::File::open(path).is_ok() }

fn visit_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %dir.display(), %err, "skipping unreadable directory");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        // links to directories are not descended into
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(_) => continue,
        };
        if file_type.is_dir() {
            visit_files(&path, out);
        } else if path.extension().map_or(false, |ext| ext == EXTENSION) && path.is_file() && readable(&path) {
            out.push(path);
        }
    }
}

/// A readable file is returned as is. A directory is walked recursively for
/// readable `.fpp` files, sorted by path. Anything else yields nothing.
pub fn scan<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let root = root.as_ref();
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {
            let mut out = Vec::new();
            visit_files(root, &mut out);
            out.sort();
            out
        }
        Ok(_) if readable(root) => vec![root.to_path_buf()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn walks_directories_for_fpp_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("b").join("c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("z.fpp"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(nested.join("a.fpp"), "").unwrap();
        fs::write(dir.path().join("b").join("a.fpp.bak"), "").unwrap();

        let found = scan(dir.path());
        assert_eq!(found, vec![nested.join("a.fpp"), dir.path().join("z.fpp")]);
    }

    #[cfg(unix)]
    #[test]
    fn directory_links_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("z.fpp"), "namespace Foo { int Age; }").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("z.fpp"), dir.path().join("alias.fpp")).unwrap();

        let found = scan(dir.path());
        assert_eq!(found, vec![dir.path().join("alias.fpp"), dir.path().join("z.fpp")]);
    }

    #[test]
    fn file_is_returned_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("types.txt");
        fs::write(&file, "").unwrap();
        assert_eq!(scan(&file), vec![file]);
    }

    #[test]
    fn missing_path_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan(dir.path().join("missing")).is_empty());
    }
}
