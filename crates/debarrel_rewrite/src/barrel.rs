use dashmap::DashSet;
use debarrel_core::{
    FileStore, as_import_path, detect_extension, find_barrel, join_relative,
    to_executable_extension,
};
use log::{debug, trace, warn};
use regex::Regex;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use crate::{
    error::{RewriteError, RewriteResult},
    symbols::find_declared,
};

static REEXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\b[^;]*?\bfrom\s+'(\.[^']*)'\s*;").expect("re-export pattern is valid")
});

/// A barrel re-exporting itself
const SELF_REEXPORT: &str = "./";

/// Symbols that now import straight from the file declaring them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Relative to the importing file, with the executable extension
    pub destination: String,
    pub symbols: Vec<String>,
}

/// Expands barrel modules into the concrete files that declare each symbol.
///
/// Every barrel visited is recorded in `touched`, even when resolution later
/// fails, so the driver can delete them once all files are rewritten.
pub struct BarrelResolver<'a> {
    store: &'a dyn FileStore,
    touched: &'a DashSet<PathBuf>,
}

impl<'a> BarrelResolver<'a> {
    pub fn new(store: &'a dyn FileStore, touched: &'a DashSet<PathBuf>) -> Self {
        Self { store, touched }
    }

    /// Resolves `requested` through the barrel at `base_dir/destination`.
    ///
    /// Re-export targets are searched in file order and the first file declaring
    /// a symbol wins. Succeeds only if every requested symbol was located.
    pub fn resolve(
        &self,
        base_dir: &Path,
        destination: &str,
        requested: &[String],
    ) -> RewriteResult<Vec<Replacement>> {
        let barrel = find_barrel(self.store, base_dir, destination).ok_or_else(|| {
            RewriteError::UnresolvedDestination { destination: destination.to_string() }
        })?;

        let mut remaining = requested.to_vec();
        let mut path = HashSet::new();
        let replacements = self.expand(base_dir, destination, &barrel, &mut remaining, &mut path)?;

        if replacements.is_empty() || !remaining.is_empty() {
            return Err(RewriteError::SymbolNotFound { symbols: remaining, barrel });
        }
        debug!(
            "Resolved {} symbols through {} into {} imports",
            requested.len(),
            barrel.display(),
            replacements.len()
        );
        Ok(replacements)
    }

    /// One barrel level. `destination` is the barrel's directory relative to
    /// `base_dir`; `path` holds the barrels currently being expanded.
    fn expand(
        &self,
        base_dir: &Path,
        destination: &str,
        barrel: &Path,
        remaining: &mut Vec<String>,
        path: &mut HashSet<PathBuf>,
    ) -> RewriteResult<Vec<Replacement>> {
        if !path.insert(barrel.to_path_buf()) {
            return Err(RewriteError::CyclicBarrel { barrel: barrel.to_path_buf() });
        }
        self.touched.insert(barrel.to_path_buf());
        trace!("Expanding barrel {}", barrel.display());

        let text = self.read(barrel)?;
        let mut replacements = Vec::new();

        for target in reexport_targets(&text) {
            if target == SELF_REEXPORT {
                trace!("Skipping self re-export in {}", barrel.display());
                continue;
            }
            let module = join_relative(destination, target);

            match detect_extension(self.store, base_dir, &module) {
                Some(found) => {
                    if remaining.is_empty() {
                        continue;
                    }
                    let content = self.read(&base_dir.join(&found))?;
                    let declared = find_declared(&content, remaining.as_slice());
                    if declared.is_empty() {
                        continue;
                    }
                    remaining.retain(|symbol| !declared.contains(symbol));
                    trace!("Found {:?} in {}", declared, found);
                    replacements.push(Replacement {
                        destination: as_import_path(&to_executable_extension(&found)),
                        symbols: declared,
                    });
                }
                None => match find_barrel(self.store, base_dir, &module) {
                    Some(nested) => {
                        let nested =
                            self.expand(base_dir, &module, &nested, remaining, path)?;
                        replacements.extend(nested);
                    }
                    None => {
                        warn!(
                            "The file doesn't exist in {} (re-exported by {})",
                            module,
                            barrel.display()
                        );
                    }
                },
            }
        }

        path.remove(barrel);
        Ok(replacements)
    }

    fn read(&self, file: &Path) -> RewriteResult<String> {
        self.store.read_to_string(file).map_err(|e| RewriteError::Unreadable {
            path: file.to_path_buf(),
            reason: format!("{:#}", e),
        })
    }
}

/// Relative targets of every `export ... from '<target>';` declaration, in file order.
pub fn reexport_targets(text: &str) -> Vec<&str> {
    REEXPORT_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}
