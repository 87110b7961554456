/// Canonical form shared by registered templates and request paths.
///
/// Drops any `?query` or `#fragment` suffix, guarantees one leading `/`,
/// collapses runs of `/` and strips a trailing `/` unless the result is
/// exactly `/`.
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    collapse(&path[..end])
}

/// Same as [`normalize_path`] for a route template: a `?` inside a
/// `{name?}` placeholder does not start a query string.
pub fn normalize_template(template: &str) -> String {
    let mut depth = 0usize;
    let mut end = template.len();
    for (i, c) in template.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '?' | '#' if depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    collapse(&template[..end])
}

fn collapse(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for part in path.split('/').filter(|part| !part.is_empty()) {
        normalized.push('/');
        normalized.push_str(part);
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}
