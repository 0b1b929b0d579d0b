//! Widget instance
//!
//! One instance per host element. Owns the injected form, the current
//! result list, the selection state and the debounce slot. The instance
//! never sees other instances; cross-instance behavior lives in
//! [`crate::Page`].

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use fif_a11y::{AriaAttributes, AriaRole};
use fif_dom::{Document, DomResult, NodeId};

use crate::config::WidgetConfig;
use crate::debounce::Debouncer;
use crate::event::{Key, Part};
use crate::render::{self, ListView, MountedList};
use crate::selection::{Selection, SelectionController, Transition};
use crate::source::Record;

/// Id prefix of the results container
pub const LIST_PREFIX: &str = "findItFast-list";
/// Class marking the highlighted entry
pub const CURRENT_CLASS: &str = "current";

/// Page-unique instance identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u32);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nodes injected into the host
#[derive(Debug, Clone, Copy)]
struct Nodes {
    host: NodeId,
    form: NodeId,
    input: NodeId,
    clear: NodeId,
    submit: NodeId,
    container: NodeId,
}

#[derive(Debug)]
pub struct WidgetInstance {
    id: InstanceId,
    config: Arc<WidgetConfig>,
    ns: String,
    nodes: Nodes,
    list: Option<MountedList>,
    view: Option<ListView>,
    selection: SelectionController,
    debounce: Debouncer<String>,
    value: String,
    /// Last query handed to the source
    query: String,
    latest_seq: u64,
    awaiting: Option<u64>,
}

impl WidgetInstance {
    /// Build the form inside `host`, after its existing children
    pub(crate) fn mount(
        doc: &mut Document,
        id: InstanceId,
        host: NodeId,
        config: Arc<WidgetConfig>,
    ) -> DomResult<Self> {
        let ns = id.to_string();
        let form_cfg = &config.form;
        let list_id = format!("{LIST_PREFIX}-{ns}");
        let input_id = format!("{}-{ns}", form_cfg.input_name);
        let tree = &mut doc.tree;

        let form = tree.create_element("form");
        tree.set_attribute(form, "id", &format!("{}-{ns}", form_cfg.name))?;
        tree.set_attribute(form, "name", &form_cfg.name)?;
        tree.set_attribute(form, "action", &form_cfg.action)?;
        tree.set_attribute(form, "method", &form_cfg.method)?;
        tree.set_attribute(form, "role", AriaRole::Search.as_str())?;

        let label = tree.create_element("label");
        tree.set_attribute(label, "for", &input_id)?;
        let label_text = tree.create_element("span");
        tree.add_class(label_text, "findItFast-input-span")?;
        tree.set_text_content(label_text, &form_cfg.label)?;
        tree.append_child(label, label_text)?;
        tree.append_child(form, label)?;

        let input = tree.create_element("input");
        for (name, value) in [
            ("type", "search"),
            ("id", input_id.as_str()),
            ("name", form_cfg.input_name.as_str()),
            ("role", AriaRole::Combobox.as_str()),
            ("autocomplete", "off"),
            ("aria-autocomplete", "list"),
            ("aria-owns", list_id.as_str()),
            ("aria-expanded", "false"),
            ("aria-activedescendant", ""),
            ("value", ""),
        ] {
            tree.set_attribute(input, name, value)?;
        }
        if !form_cfg.placeholder.is_empty() {
            tree.set_attribute(input, "placeholder", &form_cfg.placeholder)?;
        }
        tree.append_child(form, input)?;

        let clear = tree.create_element("button");
        tree.set_attribute(clear, "type", "reset")?;
        tree.add_class(clear, "findItFast-clear")?;
        tree.set_text_content(clear, "X")?;
        let clear_text = tree.create_element("span");
        if !config.sr_hidden_class.is_empty() {
            tree.add_class(clear_text, &config.sr_hidden_class)?;
        }
        tree.set_text_content(clear_text, &form_cfg.clear_search_text)?;
        tree.append_child(clear, clear_text)?;
        tree.append_child(form, clear)?;

        let submit = tree.create_element("button");
        tree.set_attribute(submit, "type", "submit")?;
        tree.set_text_content(submit, &form_cfg.submit_text)?;
        tree.append_child(form, submit)?;

        let container = tree.create_element("div");
        tree.set_attribute(container, "id", &list_id)?;
        tree.add_class(container, LIST_PREFIX)?;
        tree.set_attribute(container, "hidden", "")?;
        tree.append_child(form, container)?;

        tree.append_child(host, form)?;

        Ok(Self {
            id,
            ns,
            nodes: Nodes { host, form, input, clear, submit, container },
            list: None,
            view: None,
            selection: SelectionController::new(),
            debounce: Debouncer::new(config.debounce),
            value: String::new(),
            query: String::new(),
            latest_seq: 0,
            awaiting: None,
            config,
        })
    }

    /// Remove everything this instance injected
    pub(crate) fn unmount(&mut self, doc: &mut Document) -> DomResult<()> {
        self.debounce.cancel();
        self.awaiting = None;
        self.list = None;
        self.view = None;
        self.selection.clear();
        if doc.tree.is_live(self.nodes.form) {
            doc.tree.remove(self.nodes.form)?;
        }
        Ok(())
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Namespace used in this instance's element ids
    pub fn namespace(&self) -> &str {
        &self.ns
    }

    pub fn host(&self) -> NodeId {
        self.nodes.host
    }

    /// Form element; the root handed to hooks
    pub fn root(&self) -> NodeId {
        self.nodes.form
    }

    pub fn input(&self) -> NodeId {
        self.nodes.input
    }

    pub fn clear_control(&self) -> NodeId {
        self.nodes.clear
    }

    pub fn submit_control(&self) -> NodeId {
        self.nodes.submit
    }

    pub fn container(&self) -> NodeId {
        self.nodes.container
    }

    /// Current input value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Last dispatched query
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view(&self) -> Option<&ListView> {
        self.view.as_ref()
    }

    /// Ids of the rendered entries, in order
    pub fn entry_ids(&self) -> Vec<&str> {
        self.view.as_ref()
            .map(|v| v.entries().iter().map(|e| e.id.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn selection(&self) -> Selection {
        self.selection.state()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.selection.highlighted()
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_open()
    }

    /// A remote request is in flight and still wanted
    pub fn is_loading(&self) -> bool {
        self.awaiting.is_some()
    }

    /// ARIA state of the combobox input, as assistive technology sees it
    pub fn input_aria(&self, doc: &Document) -> AriaAttributes {
        doc.tree.element(self.nodes.input)
            .map(|el| AriaAttributes::from_attributes(el.attributes()))
            .unwrap_or_default()
    }

    /// Which part of this widget `node` belongs to
    pub fn part_of(&self, doc: &Document, node: NodeId) -> Option<Part> {
        let tree = &doc.tree;
        if tree.contains(self.nodes.input, node) {
            return Some(Part::Input);
        }
        if tree.contains(self.nodes.clear, node) {
            return Some(Part::Clear);
        }
        self.list.as_ref()?
            .items.iter()
            .position(|item| tree.contains(*item, node))
            .map(Part::Entry)
    }

    // ------------------------------------------------------------------
    // Query pipeline
    // ------------------------------------------------------------------

    /// The user edited the input
    pub(crate) fn on_input(&mut self, doc: &mut Document, value: &str, now: Instant) -> DomResult<()> {
        self.set_value(doc, value)?;
        if self.debounce.schedule(value.to_string(), now) {
            tracing::trace!("instance {}: debounce restarted", self.id);
        }
        Ok(())
    }

    /// Write the input value without scheduling a query
    pub(crate) fn set_value(&mut self, doc: &mut Document, value: &str) -> DomResult<()> {
        self.value.clear();
        self.value.push_str(value);
        doc.tree.set_attribute(self.nodes.input, "value", value)
    }

    /// Take the debounced query if it is due
    pub(crate) fn poll_query(&mut self, now: Instant) -> Option<String> {
        let query = self.debounce.poll(now)?;
        self.query.clone_from(&query);
        Some(query)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Form fields sent with a remote query
    pub fn form_fields(&self, query: &str) -> Vec<(String, String)> {
        vec![(self.config.form.input_name.clone(), query.to_string())]
    }

    /// Issue a new request sequence number
    pub(crate) fn begin_request(&mut self) -> u64 {
        self.latest_seq += 1;
        self.awaiting = Some(self.latest_seq);
        self.latest_seq
    }

    /// True if `seq` is the latest request and still awaited
    pub(crate) fn accept_response(&mut self, seq: u64) -> bool {
        if self.awaiting == Some(seq) && seq == self.latest_seq {
            self.awaiting = None;
            true
        } else {
            false
        }
    }

    /// Make every in-flight response stale
    pub(crate) fn invalidate(&mut self) {
        self.latest_seq += 1;
        self.awaiting = None;
    }

    /// Cancel the pending query and reset to an empty, closed widget
    pub(crate) fn reset(&mut self, doc: &mut Document) -> DomResult<()> {
        self.debounce.cancel();
        self.invalidate();
        self.query.clear();
        self.set_value(doc, "")?;
        self.discard_results(doc)
    }

    // ------------------------------------------------------------------
    // List
    // ------------------------------------------------------------------

    /// Render a result set and open the list; returns the result count
    pub(crate) fn show_results(&mut self, doc: &mut Document, records: &[Record]) -> DomResult<usize> {
        let view = render::render(
            records,
            &self.ns,
            self.config.include_links,
            &self.config.messages.none,
        );
        let mounted = render::mount(&mut doc.tree, self.nodes.container, &view)?;
        self.selection.reset(view.interactive_len());
        self.list = Some(mounted);
        self.view = Some(view);
        self.sync_dom(doc)?;
        Ok(records.len())
    }

    /// Drop the list entirely
    pub(crate) fn discard_results(&mut self, doc: &mut Document) -> DomResult<()> {
        doc.tree.clear_children(self.nodes.container)?;
        self.list = None;
        self.view = None;
        self.selection.clear();
        self.sync_dom(doc)
    }

    pub(crate) fn close(&mut self, doc: &mut Document) -> DomResult<()> {
        if !self.selection.is_open() {
            return Ok(());
        }
        self.selection.close();
        self.sync_dom(doc)
    }

    /// Show the existing list again, nothing highlighted
    pub(crate) fn reopen(&mut self, doc: &mut Document) -> DomResult<bool> {
        if !self.selection.reopen() {
            return Ok(false);
        }
        self.sync_dom(doc)?;
        Ok(true)
    }

    pub(crate) fn on_key(&mut self, doc: &mut Document, key: Key) -> DomResult<Option<Transition>> {
        let Some(transition) = self.selection.on_key(key) else { return Ok(None) };
        self.sync_dom(doc)?;
        Ok(Some(transition))
    }

    /// Highlight an entry that received focus and preview its label
    pub(crate) fn focus_entry(&mut self, doc: &mut Document, index: usize) -> DomResult<bool> {
        let Some(label) = self.entry_label(index) else { return Ok(false) };
        if !self.selection.highlight(index) {
            return Ok(false);
        }
        self.set_value(doc, &label)?;
        self.sync_dom(doc)?;
        Ok(true)
    }

    /// Activate an entry and close the list.
    ///
    /// Returns the link target in link mode; otherwise commits the label to
    /// the input. Link-mode entries without a target commit like plain ones.
    pub(crate) fn activate(&mut self, doc: &mut Document, index: usize) -> DomResult<Option<String>> {
        let Some(entry) = self.view.as_ref().and_then(|v| v.entry(index)).cloned() else {
            return Ok(None);
        };

        let href = if self.config.include_links { entry.href } else { None };
        if href.is_none() {
            self.set_value(doc, &entry.label)?;
        }
        self.selection.close();
        self.sync_dom(doc)?;
        Ok(href)
    }

    fn entry_label(&self, index: usize) -> Option<String> {
        self.view.as_ref()?.entry(index).map(|e| e.label.clone())
    }

    /// Mirror selection state onto the DOM
    fn sync_dom(&self, doc: &mut Document) -> DomResult<()> {
        let tree = &mut doc.tree;
        let open = self.selection.is_open();

        if open {
            tree.remove_attribute(self.nodes.container, "hidden")?;
        } else {
            tree.set_attribute(self.nodes.container, "hidden", "")?;
        }
        tree.set_attribute(self.nodes.input, "aria-expanded", if open { "true" } else { "false" })?;

        let highlighted = self.selection.highlighted();
        if let Some(list) = &self.list {
            for (i, item) in list.items.iter().enumerate() {
                let selected = highlighted == Some(i);
                tree.set_attribute(*item, "aria-selected", if selected { "true" } else { "false" })?;
                if selected {
                    tree.add_class(*item, CURRENT_CLASS)?;
                } else {
                    tree.remove_class(*item, CURRENT_CLASS)?;
                }
            }
        }

        let active = highlighted
            .and_then(|i| self.view.as_ref()?.entry(i))
            .map(|e| e.id.as_str())
            .unwrap_or("");
        tree.set_attribute(self.nodes.input, "aria-activedescendant", active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use std::time::Duration;

    fn setup(include_links: bool) -> (Document, WidgetInstance) {
        let mut opts = Options::default();
        opts.data_config.kind = "array".into();
        opts.templates.list_items.include_links = include_links;
        let config = Arc::new(WidgetConfig::resolve(opts).unwrap());

        let mut doc = Document::default();
        let body = doc.body();
        let host = doc.append_element(body, "div").unwrap();
        let inst = WidgetInstance::mount(&mut doc, InstanceId(4), host, config).unwrap();
        (doc, inst)
    }

    fn records() -> Vec<Record> {
        vec![Record::new("Apple").with_href("/a"), Record::new("Apricot")]
    }

    #[test]
    fn test_mount_contract() {
        let (doc, inst) = setup(false);
        let tree = &doc.tree;
        assert_eq!(tree.get_attribute(inst.root(), "id"), Some("findItFast-form-4"));
        assert_eq!(tree.get_attribute(inst.input(), "role"), Some("combobox"));
        assert_eq!(tree.get_attribute(inst.input(), "aria-owns"), Some("findItFast-list-4"));
        assert_eq!(tree.get_attribute(inst.input(), "aria-expanded"), Some("false"));
        assert_eq!(tree.get_attribute(inst.clear_control(), "type"), Some("reset"));
        assert_eq!(tree.text_content(inst.clear_control()), "XClear search");
        assert_eq!(tree.get_attribute(inst.container(), "hidden"), Some(""));
        assert_eq!(tree.parent(inst.root()), Some(inst.host()));

        let aria = inst.input_aria(&doc);
        assert_eq!(aria.role, Some(AriaRole::Combobox));
        assert_eq!(aria.is_expanded(), Some(false));
        assert_eq!(aria.owns(), ["findItFast-list-4".to_string()]);
    }

    #[test]
    fn test_show_results_opens_and_syncs() {
        let (mut doc, mut inst) = setup(false);
        assert_eq!(inst.show_results(&mut doc, &records()).unwrap(), 2);
        assert!(inst.is_open());
        assert_eq!(doc.tree.get_attribute(inst.container(), "hidden"), None);
        assert_eq!(doc.tree.get_attribute(inst.input(), "aria-expanded"), Some("true"));
        assert_eq!(inst.entry_ids(), vec!["findItFast-item-4-0", "findItFast-item-4-1"]);
    }

    #[test]
    fn test_highlight_updates_aria() {
        let (mut doc, mut inst) = setup(false);
        inst.show_results(&mut doc, &records()).unwrap();
        inst.on_key(&mut doc, Key::ArrowDown).unwrap();
        inst.on_key(&mut doc, Key::ArrowDown).unwrap();

        let items = inst.list.clone().unwrap().items;
        assert_eq!(doc.tree.get_attribute(inst.input(), "aria-activedescendant"), Some("findItFast-item-4-1"));
        assert_eq!(doc.tree.get_attribute(items[0], "aria-selected"), Some("false"));
        assert_eq!(doc.tree.get_attribute(items[1], "aria-selected"), Some("true"));
        assert!(doc.tree.has_class(items[1], CURRENT_CLASS));

        inst.on_key(&mut doc, Key::ArrowDown).unwrap();
        assert_eq!(doc.tree.get_attribute(inst.input(), "aria-activedescendant"), Some(""));
        let aria = inst.input_aria(&doc);
        assert_eq!(aria.is_expanded(), Some(true));
        assert_eq!(aria.active_descendant(), None);
        assert!(!doc.tree.has_class(items[1], CURRENT_CLASS));
    }

    #[test]
    fn test_sequence_numbers() {
        let (_, mut inst) = setup(false);
        let first = inst.begin_request();
        let second = inst.begin_request();
        assert!(!inst.accept_response(first));
        assert!(inst.is_loading());
        assert!(inst.accept_response(second));
        assert!(!inst.is_loading());
        assert!(!inst.accept_response(second));

        let third = inst.begin_request();
        inst.invalidate();
        assert!(!inst.accept_response(third));
    }

    #[test]
    fn test_activate_plain_commits_label() {
        let (mut doc, mut inst) = setup(false);
        inst.show_results(&mut doc, &records()).unwrap();
        assert_eq!(inst.activate(&mut doc, 0).unwrap(), None);
        assert_eq!(inst.value(), "Apple");
        assert!(!inst.is_open());
    }

    #[test]
    fn test_activate_link_returns_href() {
        let (mut doc, mut inst) = setup(true);
        inst.show_results(&mut doc, &records()).unwrap();
        inst.set_value(&mut doc, "ap").unwrap();
        assert_eq!(inst.activate(&mut doc, 0).unwrap().as_deref(), Some("/a"));
        assert_eq!(inst.value(), "ap");

        inst.reopen(&mut doc).unwrap();
        assert_eq!(inst.activate(&mut doc, 1).unwrap(), None);
        assert_eq!(inst.value(), "Apricot");
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut doc, mut inst) = setup(false);
        let t0 = Instant::now();
        inst.on_input(&mut doc, "ap", t0).unwrap();
        inst.show_results(&mut doc, &records()).unwrap();
        let seq = inst.begin_request();

        inst.reset(&mut doc).unwrap();
        assert_eq!(inst.value(), "");
        assert_eq!(inst.poll_query(t0 + Duration::from_secs(5)), None);
        assert!(!inst.accept_response(seq));
        assert!(inst.view().is_none());
        assert!(doc.tree.children(inst.container()).is_empty());
        assert!(!inst.reopen(&mut doc).unwrap());
    }

    #[test]
    fn test_part_of() {
        let (mut doc, mut inst) = setup(true);
        inst.show_results(&mut doc, &records()).unwrap();
        let items = inst.list.clone().unwrap().items;
        let link = doc.tree.children(items[0])[0];

        assert_eq!(inst.part_of(&doc, inst.input()), Some(Part::Input));
        assert_eq!(inst.part_of(&doc, inst.clear_control()), Some(Part::Clear));
        assert_eq!(inst.part_of(&doc, link), Some(Part::Entry(0)));
        assert_eq!(inst.part_of(&doc, inst.submit_control()), None);
    }

    #[test]
    fn test_unmount_restores_host() {
        let (mut doc, mut inst) = setup(false);
        inst.unmount(&mut doc).unwrap();
        assert!(doc.tree.children(inst.host()).is_empty());
        inst.unmount(&mut doc).unwrap();
    }
}
