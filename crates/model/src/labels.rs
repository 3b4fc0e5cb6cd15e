use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use utility::serde::comma_separated;

/// Free-text labels such as categories or spoken languages.
///
/// Sources keep these as one comma-delimited text field; they are split into
/// trimmed tokens once, when the record is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tokens
                .into_iter()
                .flat_map(|token| comma_separated::split(token.as_ref()))
                .collect(),
        )
    }

    pub fn from_delimited(text: &str) -> Self {
        Self(comma_separated::split(text))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Case-insensitive substring match against every token. `fragment` is
    /// expected to be lower-cased already; an empty fragment matches anything.
    pub fn contains_fragment(&self, fragment: &str) -> bool {
        fragment.is_empty()
            || self
                .0
                .iter()
                .any(|token| token.to_lowercase().contains(fragment))
    }

    /// Case-insensitive token equality, falling back to substring containment
    /// for messy source data.
    pub fn matches(&self, wanted: &str) -> bool {
        let wanted = wanted.trim().to_lowercase();
        self.0.iter().any(|token| token.to_lowercase() == wanted)
            || self.contains_fragment(&wanted)
    }
}

impl<'de> Deserialize<'de> for Labels {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        comma_separated::deserialize(deserializer).map(Labels)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Labels {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Labels::new(iter)
    }
}
