use crate::domain::FormatError;

/// Turn a camelCase field name into a header label.
///
/// The first character is upper-cased, then the name must split completely
/// into runs of one ASCII capital followed by at least one ASCII lowercase
/// letter. The runs are joined with single spaces: `userName` -> `User Name`.
///
/// This is stricter than a global `[A-Z][a-z]+` search, which would keep the
/// matching runs and drop the rest (`userID` -> `User`). Here any leftover
/// character, such as a second capital, a digit or an underscore, is a
/// `FormatError` at the byte offset where it occurs.
pub fn humanize_field_name(field_name: &str) -> Result<String, FormatError> {
    let capitalized = capitalize_first(field_name);
    let runs = split_word_runs(&capitalized).map_err(|position| FormatError {
        field: field_name.to_string(),
        position,
    })?;
    Ok(runs.join(" "))
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split into `[A-Z][a-z]+` runs, or return the byte offset where no run starts.
fn split_word_runs(s: &str) -> Result<Vec<&str>, usize> {
    let bytes = s.as_bytes();
    let mut runs = Vec::new();
    let mut start = 0;

    if bytes.is_empty() {
        return Err(0);
    }
    while start < bytes.len() {
        if !bytes[start].is_ascii_uppercase() {
            return Err(start);
        }
        let mut end = start + 1;
        while end < bytes.len() && bytes[end].is_ascii_lowercase() {
            end += 1;
        }
        if end == start + 1 {
            return Err(start);
        }
        runs.push(&s[start..end]);
        start = end;
    }
    Ok(runs)
}
