//! ARIA Support
//!
//! ARIA roles, states, and properties used by combobox widgets.

use std::collections::HashMap;

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    // Landmark roles
    Search,

    // Widget roles
    Combobox,
    Listbox,
    Option,
    Status,
}

impl AriaRole {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "search" => Self::Search,
            "combobox" => Self::Combobox,
            "listbox" => Self::Listbox,
            "option" => Self::Option,
            "status" => Self::Status,
            _ => return None,
        })
    }

    /// Attribute value for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Combobox => "combobox",
            Self::Listbox => "listbox",
            Self::Option => "option",
            Self::Status => "status",
        }
    }
}

/// ARIA state/property
#[derive(Debug, Clone, PartialEq)]
pub enum AriaState {
    Expanded(bool),
    ActiveDescendant(String),
    Owns(Vec<String>),
}

/// Live region mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveRegionMode {
    #[default]
    Off,
    Polite,
    Assertive,
}

impl LiveRegionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// ARIA attributes on an element
#[derive(Debug, Clone, Default)]
pub struct AriaAttributes {
    pub role: Option<AriaRole>,
    pub states: HashMap<String, AriaState>,
}

impl AriaAttributes {
    pub fn new() -> Self { Self::default() }

    /// Parse from element attributes
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut aria = Self::new();

        for (key, value) in attrs {
            if key == "role" {
                aria.role = AriaRole::parse(value);
            } else if let Some(name) = key.strip_prefix("aria-") {
                if let Some(state) = Self::parse_state(name, value) {
                    aria.states.insert(name.to_string(), state);
                }
            }
        }

        aria
    }

    fn parse_state(name: &str, value: &str) -> Option<AriaState> {
        Some(match name {
            "expanded" => AriaState::Expanded(value == "true"),
            "activedescendant" => AriaState::ActiveDescendant(value.to_string()),
            "owns" => AriaState::Owns(value.split_whitespace().map(String::from).collect()),
            _ => return None,
        })
    }

    /// Check if expanded
    pub fn is_expanded(&self) -> Option<bool> {
        match self.states.get("expanded") {
            Some(AriaState::Expanded(e)) => Some(*e),
            _ => None,
        }
    }

    /// Active descendant id; `None` when absent or empty
    pub fn active_descendant(&self) -> Option<&str> {
        match self.states.get("activedescendant") {
            Some(AriaState::ActiveDescendant(id)) if !id.is_empty() => Some(id.as_str()),
            _ => None,
        }
    }

    /// Owned element ids
    pub fn owns(&self) -> &[String] {
        match self.states.get("owns") {
            Some(AriaState::Owns(ids)) => ids.as_slice(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(AriaRole::parse("combobox"), Some(AriaRole::Combobox));
        assert_eq!(AriaRole::parse("ListBox"), Some(AriaRole::Listbox));
        assert_eq!(AriaRole::parse("bogus"), None);
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [AriaRole::Search, AriaRole::Combobox, AriaRole::Listbox, AriaRole::Option, AriaRole::Status] {
            assert_eq!(AriaRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_combobox_attributes() {
        let attrs = [
            ("role", "combobox"),
            ("aria-expanded", "true"),
            ("aria-owns", "list-1"),
            ("aria-activedescendant", "item-1-0"),
        ];

        let aria = AriaAttributes::from_attributes(attrs);
        assert_eq!(aria.role, Some(AriaRole::Combobox));
        assert_eq!(aria.is_expanded(), Some(true));
        assert_eq!(aria.owns(), &["list-1".to_string()]);
        assert_eq!(aria.active_descendant(), Some("item-1-0"));
    }

    #[test]
    fn test_unknown_states_ignored() {
        let aria = AriaAttributes::from_attributes([("aria-busy", "true"), ("aria-expanded", "false")]);
        assert_eq!(aria.states.len(), 1);
        assert_eq!(aria.is_expanded(), Some(false));
    }

    #[test]
    fn test_empty_active_descendant() {
        let aria = AriaAttributes::from_attributes([("aria-activedescendant", "")]);
        assert_eq!(aria.active_descendant(), None);
    }
}
