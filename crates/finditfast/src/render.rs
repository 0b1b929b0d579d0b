//! Result list rendering
//!
//! [`render`] turns records into a view model; [`mount`] writes that view
//! into the instance's list container.

use fif_a11y::AriaRole;
use fif_dom::{DomResult, DomTree, NodeId};

use crate::source::Record;

/// Id prefix of rendered entries
pub const ITEM_PREFIX: &str = "findItFast-item";
/// Class of the placeholder shown when nothing matched
pub const EMPTY_CLASS: &str = "findItFast-empty";

/// Element id of entry `index` in instance `ns`
pub fn entry_id(ns: &str, index: usize) -> String {
    format!("{ITEM_PREFIX}-{ns}-{index}")
}

/// One selectable entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub label: String,
    /// Present only in link mode
    pub href: Option<String>,
}

/// Rendered result list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Non-interactive "no suggestions" item
    Placeholder(String),
    Entries(Vec<Entry>),
}

impl ListView {
    /// Number of entries keyboard navigation can reach
    pub fn interactive_len(&self) -> usize {
        self.entries().len()
    }

    pub fn entries(&self) -> &[Entry] {
        match self {
            ListView::Placeholder(_) => &[],
            ListView::Entries(entries) => entries,
        }
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries().get(index)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ListView::Placeholder(_))
    }
}

/// Build the view for a result set
pub fn render(records: &[Record], ns: &str, include_links: bool, none_msg: &str) -> ListView {
    if records.is_empty() {
        return ListView::Placeholder(none_msg.to_string());
    }

    let entries = records.iter()
        .enumerate()
        .map(|(i, r)| Entry {
            id: entry_id(ns, i),
            label: r.label.clone(),
            href: if include_links { r.href.clone() } else { None },
        })
        .collect();
    ListView::Entries(entries)
}

/// Nodes of a mounted list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedList {
    pub list: NodeId,
    /// Entry `li` elements, in order; empty for a placeholder
    pub items: Vec<NodeId>,
}

/// Replace the container's children with the list markup
pub fn mount(tree: &mut DomTree, container: NodeId, view: &ListView) -> DomResult<MountedList> {
    tree.clear_children(container)?;

    let list = tree.create_element("ul");
    tree.set_attribute(list, "role", AriaRole::Listbox.as_str())?;
    tree.append_child(container, list)?;

    let mut items = Vec::new();
    match view {
        ListView::Placeholder(text) => {
            let li = tree.create_element("li");
            tree.add_class(li, EMPTY_CLASS)?;
            tree.set_text_content(li, text)?;
            tree.append_child(list, li)?;
        }
        ListView::Entries(entries) => {
            for entry in entries {
                let li = tree.create_element("li");
                tree.set_attribute(li, "id", &entry.id)?;
                tree.set_attribute(li, "role", AriaRole::Option.as_str())?;
                tree.set_attribute(li, "aria-selected", "false")?;
                tree.set_attribute(li, "tabindex", "0")?;
                tree.add_class(li, ITEM_PREFIX)?;

                match &entry.href {
                    Some(href) => {
                        let a = tree.create_element("a");
                        tree.set_attribute(a, "href", href)?;
                        tree.set_attribute(a, "tabindex", "-1")?;
                        tree.set_text_content(a, &entry.label)?;
                        tree.append_child(li, a)?;
                    }
                    None => tree.set_text_content(li, &entry.label)?,
                }

                tree.append_child(list, li)?;
                items.push(li);
            }
        }
    }

    Ok(MountedList { list, items })
}
