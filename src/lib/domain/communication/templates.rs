//! Email template rendering
//!
//! Templates are plain strings with markers of the form `prefix + name + suffix`,
//! `{{{name}}}` by default. Rendering is literal substitution: no escaping, no
//! expressions, and markers without a value are kept verbatim.

use std::collections::HashMap;

/// Default marker prefix
pub const DEFAULT_PREFIX: &str = "{{{";

/// Default marker suffix
pub const DEFAULT_SUFFIX: &str = "}}}";

/// Template variables and the delimiters that mark them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
    prefix: String,
    suffix: String,
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self {
            variables: HashMap::new(),
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl TemplateContext {
    /// Creates a context with the default `{{{` / `}}}` delimiters
    pub fn new(variables: HashMap<String, String>) -> Self {
        Self {
            variables,
            ..Self::default()
        }
    }

    /// Replaces the marker delimiters
    pub fn with_delimiters(mut self, prefix: &str, suffix: &str) -> Self {
        self.prefix = prefix.to_string();
        self.suffix = suffix.to_string();
        self
    }

    /// Sets a single variable, returning the previous value if any
    pub fn insert(&mut self, key: &str, value: &str) -> Option<String> {
        self.variables.insert(key.to_string(), value.to_string())
    }

    /// The marker prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The marker suffix
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Finds the variable whose marker starts `rest`, returning its value and marker length.
    ///
    /// When several markers match at the same position the longest one wins.
    /// The zero-length marker is never returned here.
    fn marker_at(&self, rest: &str) -> Option<(&str, usize)> {
        let after_prefix = rest.strip_prefix(self.prefix.as_str())?;

        self.variables
            .iter()
            .filter(|(key, _)| {
                after_prefix
                    .strip_prefix(key.as_str())
                    .is_some_and(|tail| tail.starts_with(self.suffix.as_str()))
            })
            .map(|(key, value)| {
                (
                    value.as_str(),
                    self.prefix.len() + key.len() + self.suffix.len(),
                )
            })
            .filter(|(_, len)| *len > 0)
            .max_by_key(|(_, len)| *len)
    }

    /// The value of the empty key when prefix and suffix are empty too.
    ///
    /// That marker matches between every character and at both ends of the template.
    fn empty_marker(&self) -> Option<&str> {
        if !self.prefix.is_empty() || !self.suffix.is_empty() {
            return None;
        }

        self.variables.get("").map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Substitutes every known marker in `template` in a single left-to-right pass.
///
/// Substituted values are copied to the output and never scanned again, so a
/// value containing another marker is left as written.
pub fn render(template: &str, context: &TemplateContext) -> String {
    if context.variables.is_empty() {
        return template.to_string();
    }

    let empty_marker = context.empty_marker();
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(ch) = rest.chars().next() {
        if let Some((value, len)) = context.marker_at(rest) {
            rendered.push_str(value);
            rest = &rest[len..];
        } else {
            if let Some(value) = empty_marker {
                rendered.push_str(value);
            }

            rendered.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    if let Some(value) = empty_marker {
        rendered.push_str(value);
    }

    rendered
}
