use log::trace;
use regex::Regex;
use std::collections::HashSet;

const DECLARATION_KEYWORDS: &str = "class|type|enum|const|let|var|interface";

/// Returns the requested specifiers that `text` declares, in request order.
///
/// This is a textual heuristic: a keyword, whitespace, the exact identifier,
/// then whitespace or `<`. It does not check that the declaration is exported
/// or top-level.
pub fn find_declared(text: &str, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        return Vec::new();
    }

    let mut names: Vec<String> =
        requested.iter().map(|specifier| regex::escape(imported_name(specifier))).collect();
    names.sort();
    names.dedup();
    let pattern = format!(r"\b(?:{})\s+({})[\s<]", DECLARATION_KEYWORDS, names.join("|"));
    let re = Regex::new(&pattern).expect("escaped identifiers form a valid pattern");

    let declared: HashSet<&str> =
        re.captures_iter(text).filter_map(|caps| caps.get(1).map(|m| m.as_str())).collect();
    trace!("Declared {:?} of {} requested symbols", declared, requested.len());

    requested
        .iter()
        .filter(|specifier| declared.contains(imported_name(specifier)))
        .cloned()
        .collect()
}

/// The name a specifier imports: `type Foo` and `Foo as Bar` both import `Foo`.
pub fn imported_name(specifier: &str) -> &str {
    let name = specifier.trim();
    let name = name.strip_prefix("type ").map(str::trim_start).unwrap_or(name);
    match name.split_once(" as ") {
        Some((imported, _)) => imported.trim_end(),
        None => name,
    }
}
