use debarrel_core::to_executable_extension;
use regex::Regex;
use std::{fmt, sync::LazyLock};

use crate::error::{RewriteError, RewriteResult};

static STATEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*import\b\s*(type\b\s*)?(\S.*?)\s*\bfrom\s+'(\.[^']*)'\s*;\s*$")
        .expect("statement pattern is valid")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("comment pattern is valid"));

static NESTED_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bimport\b").expect("nested import pattern is valid"));

/// What an import statement binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `{ A, B as C, type D }`, one entry per specifier
    Named(Vec<String>),
    /// `* as ns`, `Default`, or any other unbraced clause, kept verbatim
    NamespaceOrDefault(String),
}

/// One relative `import ... from '...';` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub type_only: bool,
    pub binding: Binding,
    pub destination: String,
}

impl ImportStatement {
    pub fn parse(raw: &str) -> RewriteResult<Self> {
        let malformed = || RewriteError::MalformedStatement { statement: raw.to_string() };

        let caps = STATEMENT_RE.captures(raw).ok_or_else(malformed)?;
        let type_only = caps.get(1).is_some();
        let clause = caps.get(2).map(|m| m.as_str()).ok_or_else(malformed)?;
        // Comments inside a multi-line clause would swallow what follows once it is re-joined
        let clause = COMMENT_RE.replace_all(clause, "");
        let clause = clause.trim();
        let destination = caps.get(3).map(|m| m.as_str().to_string()).ok_or_else(malformed)?;

        // A clause that swallowed a second statement
        if NESTED_IMPORT_RE.is_match(clause) {
            return Err(malformed());
        }

        let binding = if clause.starts_with('{') && clause.ends_with('}') {
            Binding::Named(split_symbols(clause))
        } else {
            Binding::NamespaceOrDefault(clause.to_string())
        };

        Ok(Self { type_only, binding, destination })
    }

    /// Named specifiers, empty for namespace and default imports
    pub fn symbols(&self) -> &[String] {
        match &self.binding {
            Binding::Named(symbols) => symbols,
            Binding::NamespaceOrDefault(_) => &[],
        }
    }

    pub fn with_destination(&self, destination: impl Into<String>) -> Self {
        Self { destination: destination.into(), ..self.clone() }
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import ")?;
        if self.type_only {
            write!(f, "type ")?;
        }
        match &self.binding {
            Binding::Named(symbols) if symbols.is_empty() => write!(f, "{{}}")?,
            Binding::Named(symbols) => write!(f, "{{ {} }}", symbols.join(", "))?,
            Binding::NamespaceOrDefault(raw) => write!(f, "{}", raw)?,
        }
        write!(f, " from '{}';", to_executable_extension(&self.destination))
    }
}

/// Splits a braced clause into specifiers, dropping braces, blanks and lone `*`.
pub fn split_symbols(clause: &str) -> Vec<String> {
    clause
        .split(',')
        .map(|symbol| symbol.trim().trim_start_matches('{').trim_end_matches('}').trim())
        .filter(|symbol| !symbol.is_empty() && *symbol != "*")
        .map(|symbol| symbol.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        let stmt = ImportStatement::parse("import { Foo, Bar } from './models';").unwrap();
        assert!(!stmt.type_only);
        assert_eq!(stmt.binding, Binding::Named(vec!["Foo".into(), "Bar".into()]));
        assert_eq!(stmt.destination, "./models");
    }

    #[test]
    fn test_parse_type_only() {
        let stmt = ImportStatement::parse("import type { Foo } from '../types';").unwrap();
        assert!(stmt.type_only);
        assert_eq!(stmt.symbols(), ["Foo".to_string()]);
        assert_eq!(stmt.destination, "../types");
    }

    #[test]
    fn test_parse_multiline_named() {
        let raw = "import {\n    Foo,\n    Bar,\n} from './models';";
        let stmt = ImportStatement::parse(raw).unwrap();
        assert_eq!(stmt.symbols(), ["Foo".to_string(), "Bar".to_string()]);
    }

    #[test]
    fn test_parse_drops_comments_in_braces() {
        let raw = "import {\n  A, // first\n  /* second */ B,\n  // C,\n} from './util';";
        let stmt = ImportStatement::parse(raw).unwrap();
        assert_eq!(stmt.symbols(), ["A".to_string(), "B".to_string()]);
        assert_eq!(stmt.to_string(), "import { A, B } from './util';");
    }

    #[test]
    fn test_parse_without_space_before_brace() {
        let stmt = ImportStatement::parse("import{ A } from './a';").unwrap();
        assert_eq!(stmt.symbols(), ["A".to_string()]);

        let typed = ImportStatement::parse("import type{A} from './a';").unwrap();
        assert!(typed.type_only);
        assert_eq!(typed.symbols(), ["A".to_string()]);

        let named_type = ImportStatement::parse("import type from './type';").unwrap();
        assert!(!named_type.type_only);
        assert_eq!(named_type.binding, Binding::NamespaceOrDefault("type".into()));
    }

    #[test]
    fn test_parse_namespace_and_default() {
        let ns = ImportStatement::parse("import * as utils from './utils';").unwrap();
        assert_eq!(ns.binding, Binding::NamespaceOrDefault("* as utils".into()));
        assert!(ns.symbols().is_empty());

        let default = ImportStatement::parse("import Widget from './widget';").unwrap();
        assert_eq!(default.binding, Binding::NamespaceOrDefault("Widget".into()));
    }

    #[test]
    fn test_parse_rejects_non_matching_text() {
        let err = ImportStatement::parse("import './side-effect';").unwrap_err();
        assert!(matches!(err, RewriteError::MalformedStatement { .. }));
        assert!(err.is_error());

        let empty = ImportStatement::parse("import from './x';").unwrap_err();
        assert!(matches!(empty, RewriteError::MalformedStatement { .. }));
    }

    #[test]
    fn test_parse_rejects_swallowed_statement() {
        let raw = "import './polyfill';\nimport { Foo } from './foo';";
        let err = ImportStatement::parse(raw).unwrap_err();
        assert!(matches!(err, RewriteError::MalformedStatement { .. }));
    }

    #[test]
    fn test_parse_allows_import_prefixed_symbol() {
        let stmt = ImportStatement::parse("import { importer } from './io';").unwrap();
        assert_eq!(stmt.symbols(), ["importer".to_string()]);
    }

    #[test]
    fn test_split_symbols_drops_noise() {
        assert_eq!(split_symbols("{ A, , B as C,* }"), vec!["A".to_string(), "B as C".to_string()]);
        assert!(split_symbols("{ }").is_empty());
    }

    #[test]
    fn test_format_normalises_extension() {
        let stmt = ImportStatement::parse("import { Foo } from './foo';").unwrap();
        assert_eq!(stmt.with_destination("./foo.ts").to_string(), "import { Foo } from './foo.js';");
    }

    #[test]
    fn test_format_keeps_braces_only_when_named() {
        let stmt = ImportStatement::parse("import type { Foo } from './foo';").unwrap();
        assert_eq!(stmt.to_string(), "import type { Foo } from './foo';");

        let ns = ImportStatement::parse("import * as foo from './foo.ts';").unwrap();
        assert_eq!(ns.to_string(), "import * as foo from './foo.js';");
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let stmt = ImportStatement::parse("import {\n  A,\n  B\n} from './ab.js';").unwrap();
        let formatted = stmt.to_string();
        assert_eq!(formatted, "import { A, B } from './ab.js';");
        assert_eq!(ImportStatement::parse(&formatted).unwrap(), stmt);
    }
}
