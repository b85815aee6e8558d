use log::trace;
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::{
    constants::{AUTHORING_EXTENSION, BARREL_FILES, EXECUTABLE_EXTENSION},
    store::FileStore,
};

/// Finds the concrete file a relative stem points at.
///
/// Candidates are tried in a fixed order: the stem as given, the stem with a
/// `.js` suffix swapped for `.ts`, the stem with `.ts` appended, the stem with
/// `.js` appended. The first candidate that is a regular file under `base_dir`
/// is returned as written (still relative to `base_dir`).
///
/// `None` means the stem is not a file, so the caller should look for a barrel.
pub fn detect_extension(store: &dyn FileStore, base_dir: &Path, stem: &str) -> Option<String> {
    let js_suffix = format!(".{}", EXECUTABLE_EXTENSION);
    let mut candidates = vec![stem.to_string()];
    if let Some(base) = stem.strip_suffix(&js_suffix) {
        candidates.push(format!("{}.{}", base, AUTHORING_EXTENSION));
    }
    candidates.push(format!("{}.{}", stem, AUTHORING_EXTENSION));
    candidates.push(format!("{}.{}", stem, EXECUTABLE_EXTENSION));

    let found = candidates.into_iter().find(|candidate| {
        let absolute = base_dir.join(candidate);
        trace!("Probing {}", absolute.display());
        store.is_file(&absolute)
    });
    if found.is_none() {
        trace!("No file matches stem '{}' in {}", stem, base_dir.display());
    }
    found
}

/// Returns the absolute path of the barrel file inside `base_dir/destination`, if any.
pub fn find_barrel(store: &dyn FileStore, base_dir: &Path, destination: &str) -> Option<PathBuf> {
    let dir = clean(base_dir.join(destination));
    if !store.exists(&dir) {
        trace!("No directory at {}", dir.display());
        return None;
    }
    BARREL_FILES.iter().map(|name| dir.join(name)).find(|candidate| store.is_file(candidate))
}

/// Joins a relative `target` onto a relative `dir`, normalising `.` and `..` segments.
pub fn join_relative(dir: &str, target: &str) -> String {
    to_slash(&clean(Path::new(dir).join(target)))
}

/// Formats a normalised relative path the way import destinations are written.
pub fn as_import_path(relative: &str) -> String {
    if relative == ".." || relative.starts_with("../") || relative.starts_with("./") {
        relative.to_string()
    } else if relative == "." {
        "./".to_string()
    } else {
        format!("./{}", relative)
    }
}

/// Replaces a trailing authoring extension with the executable one.
pub fn to_executable_extension(path: &str) -> String {
    let ts_suffix = format!(".{}", AUTHORING_EXTENSION);
    match path.strip_suffix(&ts_suffix) {
        Some(base) => format!("{}.{}", base, EXECUTABLE_EXTENSION),
        None => path.to_string(),
    }
}

/// True if the path ends in an authoring or executable extension
pub fn has_known_extension(path: &str) -> bool {
    path.ends_with(&format!(".{}", AUTHORING_EXTENSION))
        || path.ends_with(&format!(".{}", EXECUTABLE_EXTENSION))
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
