//! Placeholder mappings and literal substitution.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// An ordered mapping from literal tokens to replacement values.
///
/// Tokens are matched verbatim and case-sensitively. Substitution is a single
/// pass over the original content: replacement values are never scanned again,
/// and when two tokens match at the same position the longer one wins. The
/// result therefore does not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct Placeholders {
    entries: Vec<(String, String)>,
}

impl Placeholders {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `{{name}}` tokens from bare variable names.
    pub fn wrapped<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        variables
            .into_iter()
            .map(|(name, value)| (format!("{{{{{}}}}}", name.as_ref()), value.into()))
            .collect()
    }

    /// Add a token, builder style.
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    /// Insert a token. An existing token keeps its position and gets the new
    /// value, which returns the previous one.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let token = token.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((token, value));
                None
            }
        }
    }

    /// Look up the value for a token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (token, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Replace every token occurrence in `content`.
    ///
    /// Works on raw bytes so content that is not UTF-8 passes through
    /// unchanged. Empty tokens are ignored.
    pub fn substitute(&self, content: &[u8]) -> Vec<u8> {
        let mut tokens: Vec<(&[u8], &[u8])> = self
            .entries
            .iter()
            .filter(|(token, _)| !token.is_empty())
            .map(|(token, value)| (token.as_bytes(), value.as_bytes()))
            .collect();

        if tokens.is_empty() {
            return content.to_vec();
        }

        // Longest first, so the first hit at a position is the longest one.
        tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut output = Vec::with_capacity(content.len());
        let mut pos = 0;
        while pos < content.len() {
            let rest = &content[pos..];
            match tokens.iter().find(|(token, _)| rest.starts_with(token)) {
                Some((token, value)) => {
                    output.extend_from_slice(value);
                    pos += token.len();
                }
                None => {
                    output.push(content[pos]);
                    pos += 1;
                }
            }
        }
        output
    }

    /// Replace every token occurrence in a string.
    pub fn substitute_str(&self, content: &str) -> String {
        String::from_utf8_lossy(&self.substitute(content.as_bytes())).into_owned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Placeholders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut placeholders = Self::new();
        placeholders.extend(iter);
        placeholders
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Placeholders {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (token, value) in iter {
            self.insert(token, value);
        }
    }
}

impl From<BTreeMap<String, String>> for Placeholders {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for Placeholders {
    fn from(map: HashMap<String, String>) -> Self {
        // Sorted so that equal maps produce equal mappings.
        map.into_iter().collect::<BTreeMap<_, _>>().into()
    }
}
