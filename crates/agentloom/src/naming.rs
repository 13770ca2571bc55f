//! Identifier sanitization and per-build name uniqueness.

use uuid::Uuid;

/// Execution-engine limit on agent identifier length.
pub const MAX_NAME_LEN: usize = 63;

/// True when `s` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn replace_disallowed(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_underscore = false;
    for ch in s.chars() {
        if ch == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(ch);
            prev_underscore = false;
        }
    }
    out
}

/// Turn an arbitrary display name into an execution-engine identifier.
///
/// Total: always returns a non-empty name of at most [`MAX_NAME_LEN`] chars.
/// For any sensible `fallback_prefix` the result matches
/// `[A-Za-z_][A-Za-z0-9_]*`; a prefix that itself sanitizes away still ends
/// in the generic random fallback rather than an invalid name.
pub fn sanitize(raw: &str, fallback_prefix: &str) -> String {
    let mut sanitized = replace_disallowed(raw).trim_matches('_').to_string();
    if sanitized
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
    {
        sanitized = format!("_{sanitized}");
    }
    let starts_ok = sanitized
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if sanitized.is_empty() || !starts_ok {
        let rebuilt = format!(
            "{}_{}",
            fallback_prefix.trim_matches('_'),
            replace_disallowed(raw).trim_matches('_')
        );
        sanitized = collapse_underscores(&rebuilt)
            .trim_matches('_')
            .to_string();
    }
    if sanitized.is_empty() {
        sanitized = format!("{}_default_agent_name", fallback_prefix.trim_matches('_'));
    }
    sanitized.truncate(MAX_NAME_LEN);
    if !is_valid_identifier(&sanitized) {
        // Only reachable through a pathological fallback prefix or a
        // truncation edge case; discard and use a generic random name.
        tracing::warn!(
            "sanitized name '{}' from '{}' is still not a valid identifier; using a generic fallback",
            sanitized,
            raw
        );
        let hex = Uuid::new_v4().simple().to_string();
        let mut generic = format!("{}_{}", fallback_prefix.trim_matches('_'), &hex[..8]);
        generic.truncate(MAX_NAME_LEN);
        return generic;
    }
    sanitized
}

/// Uniqueness source for sibling names, threaded through one build call.
///
/// Working names are synthesized as `{original}_{parent_ctx}_{suffix}`
/// before sanitization so that repeated identical records never collide.
/// The default scope draws random hex suffixes; [`NameScope::deterministic`]
/// yields a counted sequence so tests can assert exact names.
#[derive(Debug)]
pub struct NameScope {
    deterministic: bool,
    counter: u64,
}

impl NameScope {
    pub fn new() -> Self {
        Self {
            deterministic: false,
            counter: 0,
        }
    }

    /// Scope whose suffixes are a zero-padded counter instead of entropy.
    pub fn deterministic() -> Self {
        Self {
            deterministic: true,
            counter: 0,
        }
    }

    /// Next short suffix: four hex chars, random or counted.
    pub fn suffix(&mut self) -> String {
        self.counter += 1;
        if self.deterministic {
            format!("{:04x}", self.counter)
        } else {
            let hex = Uuid::new_v4().simple().to_string();
            hex[..4].to_string()
        }
    }
}

impl Default for NameScope {
    fn default() -> Self {
        Self::new()
    }
}
