//! Rule attribute name handling.
//!
//! Fully qualified rule attribute names look like `Style$import.attr`: an
//! optional style prefix ended by `$`, optional import prefixes separated by
//! `.`, and the attribute's base name.

use rustc_hash::FxHashMap;

pub const STYLE_DELIMITER: char = '$';
pub const IMPORT_DELIMITER: char = '.';

const HOST_SEPARATOR: char = '_';

/// Style prefix of `fq_name`, empty if there is none.
#[must_use]
pub fn style(fq_name: &str) -> &str {
    match fq_name.find(STYLE_DELIMITER) {
        Some(pos) if pos > 0 => &fq_name[..pos],
        _ => "",
    }
}

/// `fq_name` without its style prefix.
#[must_use]
pub fn remove_style(fq_name: &str) -> &str {
    fq_name
        .find(STYLE_DELIMITER)
        .map_or(fq_name, |pos| &fq_name[pos + STYLE_DELIMITER.len_utf8()..])
}

/// Import prefix of `fq_name` (without style), empty if the attribute
/// belongs to the start rule file.
#[must_use]
pub fn import(fq_name: &str) -> &str {
    let name = remove_style(fq_name);
    name.rfind(IMPORT_DELIMITER).map_or("", |pos| &name[..pos])
}

/// Attribute name without style and import prefixes.
#[must_use]
pub fn base_name(fq_name: &str) -> &str {
    let name = remove_style(fq_name);
    name.rfind(IMPORT_DELIMITER)
        .map_or(name, |pos| &name[pos + IMPORT_DELIMITER.len_utf8()..])
}

/// Builds the fully qualified name of `key` in the style and import scope
/// of `fq_name`.
#[must_use]
pub fn sibling_name(fq_name: &str, key: &str) -> String {
    let style = style(fq_name);
    let import = import(fq_name);
    let mut name = String::with_capacity(style.len() + import.len() + key.len() + 2);
    name.push_str(style);
    name.push(STYLE_DELIMITER);
    if !import.is_empty() {
        name.push_str(import);
        name.push(IMPORT_DELIMITER);
    }
    name.push_str(key);
    name
}

/// Replaces characters the host does not accept in attribute names.
///
/// Only `[A-Za-z0-9_]` survive; a leading digit gets a `_` prefix.
#[must_use]
pub fn clean_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == HOST_SEPARATOR { c } else { HOST_SEPARATOR })
        .collect();
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{HOST_SEPARATOR}{cleaned}")
    } else {
        cleaned
    }
}

/// Appends `_N` where `N` counts previous occurrences of `name` in `counts`.
#[must_use]
pub fn with_duplicate_suffix(name: &str, counts: &mut FxHashMap<String, u32>) -> String {
    let count = counts
        .entry(name.to_string())
        .and_modify(|c| *c += 1)
        .or_insert(0);
    format!("{name}{HOST_SEPARATOR}{count}")
}
