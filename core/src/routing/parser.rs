use crate::errors::RouterError;
use crate::routing::types::RouteParams;
use regex::Regex;

/// Longest template the compiler accepts.
pub const MAX_PATTERN_LENGTH: usize = 2048;

/// One piece of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param { name: String, optional: bool },
}

/// Compiled form of a path template such as `/archive/{year}/{month?}`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    regex: Regex,
    segments: Vec<Segment>,
    param_names: Vec<String>,
}

impl PathPattern {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn is_static(&self) -> bool {
        self.param_names.is_empty()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Captures parameter values from `path`. An optional parameter that
    /// did not participate in the match is bound to the empty string.
    pub fn captures(&self, path: &str) -> Option<RouteParams> {
        let captures = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = captures.get(i + 1).map_or("", |m| m.as_str());
                    (name.clone(), value.to_string())
                })
                .collect(),
        )
    }
}

/// Splits a template into literal and placeholder segments.
///
/// Placeholders are `{name}` or `{name?}`; names are ASCII alphanumerics
/// and underscores. Literal text is kept verbatim.
pub fn tokenize(template: &str) -> Result<Vec<Segment>, RouterError> {
    let invalid = |reason: String| RouterError::InvalidPattern {
        pattern: template.to_string(),
        reason,
    };

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices();

    while let Some((start, c)) = chars.next() {
        match c {
            '{' => {
                let mut raw = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(invalid(format!("nested '{{' at offset {}", start))),
                        _ => raw.push(inner),
                    }
                }
                if !closed {
                    return Err(invalid(format!("unclosed placeholder at offset {}", start)));
                }

                let (name, optional) = match raw.strip_suffix('?') {
                    Some(name) => (name, true),
                    None => (raw.as_str(), false),
                };
                if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
                    return Err(invalid(format!("invalid parameter name '{}'", raw)));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Param {
                    name: name.to_string(),
                    optional,
                });
            }
            '}' => return Err(invalid(format!("unmatched '}}' at offset {}", start))),
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Whether the placeholder at `index` is optional and fills a whole path
/// segment: preceded by a `/` and followed by the end of the template or
/// by another `/`. Such a placeholder takes the slash before it along when
/// it is absent.
pub(crate) fn owns_leading_slash(segments: &[Segment], index: usize) -> bool {
    let optional = matches!(segments.get(index), Some(Segment::Param { optional: true, .. }));
    let after_slash = index > 0
        && matches!(&segments[index - 1], Segment::Literal(text) if text.ends_with('/'));
    let segment_ends = match segments.get(index + 1) {
        None => true,
        Some(Segment::Literal(text)) => text.starts_with('/'),
        Some(Segment::Param { .. }) => false,
    };
    optional && after_slash && segment_ends
}

/// Compiles a template into an anchored pattern.
///
/// Each literal segment is escaped on its own, so characters in literal
/// text never interact with placeholder syntax. `{name}` matches one or
/// more non-`/` characters, `{name?}` zero or more. When an optional
/// placeholder fills a whole segment, the slash before it is optional
/// too, so `/archive/{year}/{month?}` accepts `/archive/2024`. Inside a
/// segment (`/files/{name?}.json`) the slash stays mandatory.
pub fn compile_pattern(template: &str) -> Result<PathPattern, RouterError> {
    if !template.starts_with('/') {
        return Err(RouterError::InvalidPattern {
            pattern: template.to_string(),
            reason: "template must start with '/'".to_string(),
        });
    }
    if template.len() > MAX_PATTERN_LENGTH {
        return Err(RouterError::InvalidPattern {
            pattern: template.to_string(),
            reason: format!("template exceeds maximum length ({})", MAX_PATTERN_LENGTH),
        });
    }

    let segments = tokenize(template)?;
    let mut regex_pattern = String::from("^");
    let mut param_names: Vec<String> = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Literal(text) => {
                let text = match text.strip_suffix('/') {
                    Some(head) if owns_leading_slash(&segments, i + 1) => head,
                    _ => text.as_str(),
                };
                regex_pattern.push_str(&regex::escape(text));
            }
            Segment::Param { name, optional } => {
                if param_names.iter().any(|existing| existing == name) {
                    return Err(RouterError::DuplicateParameter {
                        pattern: template.to_string(),
                        name: name.clone(),
                    });
                }
                param_names.push(name.clone());

                if owns_leading_slash(&segments, i) {
                    regex_pattern.push_str(r"(?:/([^/]*))?");
                } else if *optional {
                    regex_pattern.push_str(r"([^/]*)");
                } else {
                    regex_pattern.push_str(r"([^/]+)");
                }
            }
        }
    }
    regex_pattern.push('$');

    let regex = Regex::new(&regex_pattern).map_err(|e| RouterError::InvalidPattern {
        pattern: template.to_string(),
        reason: e.to_string(),
    })?;

    Ok(PathPattern {
        template: template.to_string(),
        regex,
        segments,
        param_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_template() {
        let pattern = compile_pattern("/posts/new").unwrap();
        assert!(pattern.is_static());
        assert!(pattern.is_match("/posts/new"));
        assert!(!pattern.is_match("/posts/new/extra"));
        assert!(!pattern.is_match("/api/posts/new"));
    }

    #[test]
    fn test_required_params_in_order() {
        let pattern = compile_pattern("/users/{user_id}/posts/{post_id}").unwrap();
        assert_eq!(pattern.param_names(), &["user_id", "post_id"]);

        let params = pattern.captures("/users/7/posts/99").unwrap();
        assert_eq!(params.values(), vec!["7", "99"]);
        assert!(pattern.captures("/users//posts/99").is_none());
        assert!(pattern.captures("/users/7/8/posts/99").is_none());
    }

    #[test]
    fn test_optional_trailing_segment() {
        let pattern = compile_pattern("/archive/{year}/{month?}").unwrap();

        let params = pattern.captures("/archive/2024").unwrap();
        assert_eq!(params.get("year"), Some("2024"));
        assert_eq!(params.get("month"), Some(""));

        let params = pattern.captures("/archive/2024/05").unwrap();
        assert_eq!(params.get("month"), Some("05"));
    }

    #[test]
    fn test_optional_inside_segment() {
        let pattern = compile_pattern("/files/report{suffix?}").unwrap();
        assert_eq!(pattern.captures("/files/report").unwrap().get("suffix"), Some(""));
        assert_eq!(
            pattern.captures("/files/report-2024").unwrap().get("suffix"),
            Some("-2024")
        );
    }

    #[test]
    fn test_optional_before_suffix_keeps_slash() {
        let pattern = compile_pattern("/files/{name?}.json").unwrap();
        assert_eq!(pattern.captures("/files/.json").unwrap().get("name"), Some(""));
        assert_eq!(pattern.captures("/files/x.json").unwrap().get("name"), Some("x"));
        assert!(!pattern.is_match("/files.json"));
    }

    #[test]
    fn test_optional_middle_segment() {
        let pattern = compile_pattern("/reports/{year?}/summary").unwrap();
        assert_eq!(pattern.captures("/reports/summary").unwrap().get("year"), Some(""));
        assert_eq!(
            pattern.captures("/reports/2024/summary").unwrap().get("year"),
            Some("2024")
        );
    }

    #[test]
    fn test_literal_metacharacters_are_escaped() {
        let pattern = compile_pattern("/files/{name}.json").unwrap();
        assert!(pattern.is_match("/files/data.json"));
        assert!(!pattern.is_match("/files/dataXjson"));

        let pattern = compile_pattern("/a+b/(c)").unwrap();
        assert!(pattern.is_match("/a+b/(c)"));
        assert!(!pattern.is_match("/aab/c"));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        match compile_pattern("/pair/{id}/{id}") {
            Err(RouterError::DuplicateParameter { name, .. }) => assert_eq!(name, "id"),
            other => panic!("Expected DuplicateParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_templates_rejected() {
        for template in ["/posts/{id", "/posts/id}", "/posts/{}", "/posts/{a-b}", "/x/{{id}}", "posts"] {
            assert!(
                matches!(compile_pattern(template), Err(RouterError::InvalidPattern { .. })),
                "{} should be rejected",
                template
            );
        }
    }

    #[test]
    fn test_tokenize_segments() {
        let segments = tokenize("/posts/{id}/edit").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("/posts/".to_string()),
                Segment::Param {
                    name: "id".to_string(),
                    optional: false
                },
                Segment::Literal("/edit".to_string()),
            ]
        );
    }
}
