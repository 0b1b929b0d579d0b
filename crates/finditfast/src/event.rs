//! Widget events and commands
//!
//! Events flow from the host into an instance; commands flow back out for
//! effects the engine cannot perform itself.

/// Keys the widget reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Escape,
    Tab,
    Enter,
    /// Any other key
    Other,
}

impl Key {
    /// From a DOM `KeyboardEvent.key` name
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }

    /// From a legacy key code
    pub fn from_code(code: u32) -> Self {
        match code {
            38 => Key::ArrowUp,
            40 => Key::ArrowDown,
            27 => Key::Escape,
            9 => Key::Tab,
            13 => Key::Enter,
            _ => Key::Other,
        }
    }

    /// Keys that never count as text input
    pub fn is_control(&self) -> bool {
        !matches!(self, Key::Other)
    }
}

/// Interactive part of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Input,
    Clear,
    /// Entry at a position in the current list
    Entry(usize),
}

/// Event delivered to a widget instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Input value changed
    Input(String),
    /// Key pressed while the input or an entry has focus
    KeyDown(Key),
    Focus(Part),
    Click(Part),
    Blur(Part),
    /// Form submitted
    Submit,
}

/// Raw DOM event kinds routed by target node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEventKind {
    Click,
    Focus,
    Blur,
    Submit,
}

/// Effect for the host to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move real focus to a part of the widget
    Focus {
        instance: crate::InstanceId,
        part: Part,
    },
    /// Follow an activated entry's link
    Navigate {
        instance: crate::InstanceId,
        href: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_and_codes_agree() {
        for (name, code) in [("ArrowUp", 38), ("ArrowDown", 40), ("Escape", 27), ("Tab", 9), ("Enter", 13)] {
            assert_eq!(Key::from_name(name), Key::from_code(code));
            assert!(Key::from_name(name).is_control());
        }
        assert_eq!(Key::from_name("a"), Key::Other);
        assert_eq!(Key::from_code(65), Key::Other);
        assert!(!Key::Other.is_control());
    }
}
