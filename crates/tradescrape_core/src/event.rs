use std::collections::HashMap;

use crate::text::collapse_entity_gaps;

/// Attribute map of a start tag. Duplicate names resolve to the last value.
///
/// Values are passed through [`collapse_entity_gaps`] on construction so that
/// every comparison made by a program sees plain spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut attrs = Self::new();
        for (name, value) in pairs {
            attrs.insert(name, value.as_ref());
        }
        attrs
    }

    pub fn insert(&mut self, name: impl Into<String>, value: &str) {
        let name = name.into().to_ascii_lowercase();
        self.values.insert(name, collapse_entity_gaps(value));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// True when the attribute exists and equals `expected` exactly.
    pub fn is(&self, name: &str, expected: &str) -> bool {
        self.get(name) == Some(expected)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One markup event, delivered once and in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartTag { name: String, attrs: Attributes },
    EndTag { name: String },
    Text(String),
}

impl Event {
    pub fn start(name: &str) -> Self {
        Event::StartTag {
            name: name.to_ascii_lowercase(),
            attrs: Attributes::new(),
        }
    }

    pub fn start_with(name: &str, attrs: &[(&str, &str)]) -> Self {
        Event::StartTag {
            name: name.to_ascii_lowercase(),
            attrs: Attributes::from_pairs(attrs.iter().copied()),
        }
    }

    pub fn end(name: &str) -> Self {
        Event::EndTag {
            name: name.to_ascii_lowercase(),
        }
    }

    pub fn text(content: &str) -> Self {
        Event::Text(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_attribute_last_wins() {
        let attrs = Attributes::from_pairs([("class", "a"), ("CLASS", "b")]);
        assert_eq!(attrs.get("class"), Some("b"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn attribute_values_lose_nbsp_artifacts() {
        let attrs = Attributes::from_pairs([("value", "情報&nbsp;更新")]);
        assert_eq!(attrs.get("value"), Some("情報 更新"));
    }
}
