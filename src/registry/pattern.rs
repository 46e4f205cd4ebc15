use super::value::ParamType;
use super::RegistryError;

/// One segment of a parsed identifier pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Variable { name: String, ty: ParamType },
}

/// A parsed addressable identifier, possibly containing variable slots.
///
/// Resource patterns look like `users://{user_id}/profile`: a scheme,
/// then `/`-separated segments where `{name}` or `{name:type}` marks a
/// variable slot. Tool and prompt identifiers are plain literal names
/// with no scheme and no slots.
#[derive(Debug, Clone)]
pub struct UriPattern {
    raw: String,
    scheme: Option<String>,
    segments: Vec<Segment>,
}

impl UriPattern {
    /// Parse a resource pattern of the form `scheme://seg/{var}/seg`.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let malformed = |reason: &str| RegistryError::MalformedPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let (scheme, path) = raw
            .split_once("://")
            .ok_or_else(|| malformed("missing scheme delimiter"))?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(malformed("invalid scheme"));
        }
        if path.is_empty() {
            return Err(malformed("empty path"));
        }

        let mut segments = Vec::new();
        let mut seen_vars: Vec<&str> = Vec::new();

        for part in path.split('/') {
            if part.is_empty() {
                return Err(malformed("empty segment"));
            }

            if let Some(inner) = part.strip_prefix('{') {
                let inner = inner
                    .strip_suffix('}')
                    .ok_or_else(|| malformed("unbalanced braces"))?;
                if inner.contains(['{', '}']) {
                    return Err(malformed("nested braces"));
                }
                let (name, ty) = match inner.split_once(':') {
                    Some((name, ty_name)) => {
                        let ty = ParamType::from_name(ty_name).ok_or_else(|| {
                            RegistryError::UnsupportedType {
                                pattern: raw.to_string(),
                                ty: ty_name.to_string(),
                            }
                        })?;
                        (name, ty)
                    }
                    None => (inner, ParamType::String),
                };
                if !is_identifier(name) {
                    return Err(malformed("variable name is not identifier-safe"));
                }
                if seen_vars.contains(&name) {
                    return Err(malformed("duplicate variable name"));
                }
                seen_vars.push(name);
                segments.push(Segment::Variable {
                    name: name.to_string(),
                    ty,
                });
            } else if part.contains(['{', '}']) {
                return Err(malformed("braces inside literal segment"));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            scheme: Some(scheme.to_string()),
            segments,
        })
    }

    /// Build the pattern for a literal tool or prompt name.
    ///
    /// Names are single identifiers (dots allowed, e.g. `context.resolve`);
    /// braces and separators are rejected so a literal name can never be
    /// mistaken for a template.
    pub fn literal(name: &str) -> Result<Self, RegistryError> {
        let malformed = |reason: &str| RegistryError::MalformedPattern {
            pattern: name.to_string(),
            reason: reason.to_string(),
        };
        if name.is_empty() {
            return Err(malformed("empty identifier"));
        }
        if name.contains(['{', '}']) {
            return Err(malformed("literal identifiers cannot contain variable slots"));
        }
        if name.contains(['/', ' ']) || name.contains("://") {
            return Err(malformed("literal identifiers cannot contain separators"));
        }
        Ok(Self {
            raw: name.to_string(),
            scheme: None,
            segments: vec![Segment::Literal(name.to_string())],
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of variable slots in the pattern.
    pub fn variable_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Variable { .. }))
            .count()
    }

    /// A pattern with zero variable slots is a pure literal identifier.
    pub fn is_literal(&self) -> bool {
        self.variable_count() == 0
    }

    /// Iterate over the pattern's variable slots in positional order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, ParamType)> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable { name, ty } => Some((name.as_str(), *ty)),
            Segment::Literal(_) => None,
        })
    }

    /// Match a concrete request identifier against this pattern.
    ///
    /// A candidate must have the same scheme, the same segment count, and
    /// every literal segment must compare equal (case-sensitive, no
    /// normalization). On a match, returns the captured variable slots in
    /// positional order as `(name, declared type, raw text)`.
    pub fn match_uri(&self, uri: &RequestUri) -> Option<Vec<(String, ParamType, String)>> {
        if self.scheme.as_deref() != Some(uri.scheme()) {
            return None;
        }
        if self.segments.len() != uri.segments().len() {
            return None;
        }

        let mut captures = Vec::new();
        for (segment, actual) in self.segments.iter().zip(uri.segments()) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != actual {
                        return None;
                    }
                }
                Segment::Variable { name, ty } => {
                    captures.push((name.clone(), *ty, actual.clone()));
                }
            }
        }
        Some(captures)
    }
}

/// A concrete request identifier split into scheme and path segments.
///
/// No template interpretation happens here: braces in a request URI are
/// ordinary characters that simply fail to match any literal segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestUri {
    scheme: String,
    segments: Vec<String>,
}

impl RequestUri {
    /// Split a request identifier. Returns `None` for shapes that cannot
    /// address any resource (no scheme, empty path, empty segment).
    pub fn parse(raw: &str) -> Option<Self> {
        let (scheme, path) = raw.split_once("://")?;
        if scheme.is_empty() || path.is_empty() {
            return None;
        }
        let segments: Vec<String> = path.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self {
            scheme: scheme.to_string(),
            segments,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
