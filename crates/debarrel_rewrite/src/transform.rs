use anyhow::{Result, anyhow};
use dashmap::DashSet;
use debarrel_core::{FileStore, detect_extension, has_known_extension, to_executable_extension};
use log::{debug, error, info, trace, warn};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use crate::{
    barrel::BarrelResolver,
    error::RewriteResult,
    statement::{Binding, ImportStatement},
    types::{IssueKind, StatementIssue},
};

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bimport\b[^;]*?\bfrom\s+'([^']*)'\s*;").expect("import pattern is valid")
});

/// The new text for one import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStatement {
    pub text: String,
    /// Rewritten destinations carrying neither `.ts` nor `.js`
    pub missing_extension: Vec<String>,
}

/// Result of rewriting one file in memory.
#[derive(Debug, Clone)]
pub struct FileRewrite {
    pub path: PathBuf,
    pub original: String,
    pub rewritten: String,
    pub statements_rewritten: usize,
    pub issues: Vec<StatementIssue>,
}

impl FileRewrite {
    pub fn changed(&self) -> bool {
        self.original != self.rewritten
    }
}

/// Rewrites every relative import of a file onto concrete, extension-qualified paths.
pub struct Transformer<'a> {
    store: &'a dyn FileStore,
    barrels: BarrelResolver<'a>,
    /// Prefix stripped from paths in issues
    root: &'a Path,
}

impl<'a> Transformer<'a> {
    pub fn new(store: &'a dyn FileStore, touched: &'a DashSet<PathBuf>, root: &'a Path) -> Self {
        Self { store, barrels: BarrelResolver::new(store, touched), root }
    }

    /// Reads `file` and computes its rewritten text. Nothing is written.
    pub fn transform_file(&self, file: &Path) -> Result<FileRewrite> {
        let text = self.store.read_to_string(file)?;
        self.transform_source(file, text)
    }

    pub fn transform_source(&self, file: &Path, text: String) -> Result<FileRewrite> {
        let base_dir =
            file.parent().ok_or_else(|| anyhow!("{} has no parent directory", file.display()))?;
        let rel_file = file.strip_prefix(self.root).unwrap_or(file).to_string_lossy().to_string();

        let statements: Vec<String> = IMPORT_RE
            .captures_iter(&text)
            .filter(|caps| caps.get(1).is_some_and(|d| d.as_str().starts_with('.')))
            .filter_map(|caps| caps.get(0).map(|m| m.as_str().to_string()))
            .collect();
        if statements.is_empty() {
            debug!("{} No relative import statements found", file.display());
        }

        let mut data = text.clone();
        let mut statements_rewritten = 0;
        let mut issues = Vec::new();

        for raw in statements {
            trace!("{}: fixing {}", file.display(), raw);
            match self.fix_statement(base_dir, &raw) {
                Ok(fixed) => {
                    for destination in &fixed.missing_extension {
                        warn!(
                            "{}: The file doesn't have an extension {}",
                            file.display(),
                            destination
                        );
                        issues.push(StatementIssue {
                            file: rel_file.clone(),
                            statement: raw.clone(),
                            kind: IssueKind::MissingExtension,
                            message: format!("the file doesn't have an extension {}", destination),
                        });
                    }
                    if fixed.text != raw {
                        data = data.replacen(&raw, &fixed.text, 1);
                        statements_rewritten += 1;
                    }
                }
                Err(err) => {
                    let Some(kind) = IssueKind::of(&err) else {
                        return Err(anyhow::Error::new(err)
                            .context(format!("Failed to rewrite {}", file.display())));
                    };
                    if err.is_error() {
                        error!("{}: {}", file.display(), err);
                    } else {
                        warn!("{}: {} -> {}", file.display(), err, raw);
                    }
                    issues.push(StatementIssue {
                        file: rel_file.clone(),
                        statement: raw,
                        kind,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!("{} Updated file ({} statements)", file.display(), statements_rewritten);
        Ok(FileRewrite {
            path: file.to_path_buf(),
            original: text,
            rewritten: data,
            statements_rewritten,
            issues,
        })
    }

    /// Resolves one relative import statement found in a file under `base_dir`.
    pub fn fix_statement(&self, base_dir: &Path, raw: &str) -> RewriteResult<FixedStatement> {
        let stmt = ImportStatement::parse(raw)?;

        let fixed = match detect_extension(self.store, base_dir, &stmt.destination) {
            Some(found) => vec![stmt.with_destination(found)],
            None => self
                .barrels
                .resolve(base_dir, &stmt.destination, stmt.symbols())?
                .into_iter()
                .map(|r| ImportStatement {
                    type_only: stmt.type_only,
                    binding: Binding::Named(r.symbols),
                    destination: r.destination,
                })
                .collect(),
        };

        let missing_extension = fixed
            .iter()
            .map(|s| to_executable_extension(&s.destination))
            .filter(|d| !has_known_extension(d))
            .collect();
        let text = fixed.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
        Ok(FixedStatement { text, missing_extension })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewriteError;
    use debarrel_core::FsStore;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn transform(root: &Path, file: &Path) -> (FileRewrite, DashSet<PathBuf>) {
        let touched = DashSet::new();
        let rewrite = Transformer::new(&FsStore, &touched, root).transform_file(file).unwrap();
        (rewrite, touched)
    }

    #[test]
    fn test_direct_file_gets_executable_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "util.ts", "export const helper = 1;\n");
        let main =
            create_test_file(root, "main.ts", "import { helper } from './util';\n\nhelper;\n");

        let (rewrite, touched) = transform(root, &main);
        assert_eq!(rewrite.rewritten, "import { helper } from './util.js';\n\nhelper;\n");
        assert_eq!(rewrite.statements_rewritten, 1);
        assert!(rewrite.issues.is_empty());
        assert!(touched.is_empty());
    }

    #[test]
    fn test_commented_specifier_stays_valid() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "util.ts", "export const A = 1;\nexport const B = 2;\n");
        let main = create_test_file(
            root,
            "main.ts",
            "import {\n  A, // first\n  B,\n} from './util';\n\nA + B;\n",
        );

        let (rewrite, _) = transform(root, &main);
        assert_eq!(rewrite.rewritten, "import { A, B } from './util.js';\n\nA + B;\n");
        assert!(rewrite.issues.is_empty());
    }

    #[test]
    fn test_import_without_space_before_brace() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "a.ts", "export const A = 1;\n");
        let main = create_test_file(root, "main.ts", "import{ A } from './a';\n");

        let (rewrite, _) = transform(root, &main);
        assert_eq!(rewrite.rewritten, "import { A } from './a.js';\n");
        assert_eq!(rewrite.statements_rewritten, 1);
    }

    #[test]
    fn test_barrel_import_is_split() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let barrel =
            create_test_file(root, "b/index.ts", "export * from './a';\nexport * from './c';\n");
        create_test_file(root, "b/a.ts", "export const Foo = 1;\n");
        create_test_file(root, "b/c.ts", "export type Bar = string;\n");
        let main = create_test_file(root, "main.ts", "import { Foo, Bar } from './b';\n");

        let (rewrite, touched) = transform(root, &main);
        assert_eq!(
            rewrite.rewritten,
            "import { Foo } from './b/a.js';\nimport { Bar } from './b/c.js';\n"
        );
        assert!(touched.contains(&barrel));
    }

    #[test]
    fn test_type_only_barrel_import_keeps_keyword() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "types/index.ts", "export * from './user';\n");
        create_test_file(root, "types/user.ts", "export interface User {}\n");
        let main = create_test_file(root, "main.ts", "import type { User } from './types';\n");

        let (rewrite, _) = transform(root, &main);
        assert_eq!(rewrite.rewritten, "import type { User } from './types/user.js';\n");
    }

    #[test]
    fn test_unresolved_symbol_leaves_statement_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "b/index.ts", "export * from './a';\n");
        create_test_file(root, "b/a.ts", "export const Foo = 1;\n");
        let source = "import { Foo, Missing } from './b';\n";
        let main = create_test_file(root, "main.ts", source);

        let (rewrite, touched) = transform(root, &main);
        assert_eq!(rewrite.rewritten, source);
        assert!(!rewrite.changed());
        assert_eq!(rewrite.issues.len(), 1);
        assert_eq!(rewrite.issues[0].kind, IssueKind::SymbolNotFound);
        assert_eq!(rewrite.issues[0].file, "main.ts");
        assert_eq!(touched.len(), 1);
    }

    #[test]
    fn test_package_imports_are_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let source = "import { ref } from 'vue';\nimport * as path from 'node:path';\n";
        let main = create_test_file(root, "main.ts", source);

        let (rewrite, _) = transform(root, &main);
        assert_eq!(rewrite.rewritten, source);
        assert!(rewrite.issues.is_empty());
    }

    #[test]
    fn test_unresolved_destination_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let source = "import { Gone } from './gone';\n";
        let main = create_test_file(root, "main.ts", source);

        let (rewrite, _) = transform(root, &main);
        assert_eq!(rewrite.rewritten, source);
        assert_eq!(rewrite.issues[0].kind, IssueKind::UnresolvedDestination);
    }

    #[test]
    fn test_one_bad_statement_does_not_stop_the_rest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "ok.ts", "export const Ok = 1;\n");
        let main = create_test_file(
            root,
            "main.ts",
            "import { Gone } from './gone';\nimport { Ok } from './ok';\n",
        );

        let (rewrite, _) = transform(root, &main);
        assert_eq!(
            rewrite.rewritten,
            "import { Gone } from './gone';\nimport { Ok } from './ok.js';\n"
        );
        assert_eq!(rewrite.issues.len(), 1);
    }

    #[test]
    fn test_missing_extension_still_rewrites() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "Makefile", "");
        let main = create_test_file(root, "main.ts", "import raw from './Makefile';\n");

        let (rewrite, _) = transform(root, &main);
        assert_eq!(rewrite.rewritten, "import raw from './Makefile';\n");
        assert_eq!(rewrite.issues.len(), 1);
        assert_eq!(rewrite.issues[0].kind, IssueKind::MissingExtension);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "util.ts", "export const helper = 1;\n");
        let main = create_test_file(root, "main.ts", "import { helper } from './util';\n");

        let (first, _) = transform(root, &main);
        fs::write(&main, &first.rewritten).unwrap();
        let (second, _) = transform(root, &main);
        assert!(!second.changed());
        assert_eq!(second.statements_rewritten, 0);
    }

    #[test]
    fn test_fix_statement_rejects_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let touched = DashSet::new();
        let transformer = Transformer::new(&FsStore, &touched, temp_dir.path());
        let err = transformer.fix_statement(temp_dir.path(), "import from './x';").unwrap_err();
        assert!(matches!(err, RewriteError::MalformedStatement { .. }));
    }
}
