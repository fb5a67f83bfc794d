use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fallback identifier for labels that normalize to nothing.
pub const EMPTY_NAME_FALLBACK: &str = "q0";

/// Turns a human label into a wire-safe identifier.
///
/// Lowercases, strips diacritics, maps anything outside `[a-z0-9_]` to `_`,
/// collapses runs of `_` and trims them from both ends. A leading digit gets a
/// `q` prefix and an empty result becomes `q0`. The function is idempotent.
///
/// ```
/// use clauseflow::compiler::normalize_state_name;
///
/// assert_eq!(normalize_state_name("État n°1!"), "etat_n_1");
/// assert_eq!(normalize_state_name("1st payment"), "q1st_payment");
/// assert_eq!(normalize_state_name("!!!"), "q0");
/// ```
pub fn normalize_state_name(label: &str) -> String {
    let mut normalized = String::with_capacity(label.len());
    for c in label.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase) {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '_'
        };
        if c == '_' && (normalized.is_empty() || normalized.ends_with('_')) {
            continue;
        }
        normalized.push(c);
    }
    while normalized.ends_with('_') {
        normalized.pop();
    }

    if normalized.is_empty() {
        return EMPTY_NAME_FALLBACK.to_string();
    }
    if normalized.starts_with(|c: char| c.is_ascii_digit()) {
        normalized.insert(0, 'q');
    }
    normalized
}
