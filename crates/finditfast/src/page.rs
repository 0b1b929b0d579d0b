//! Page - instance registry
//!
//! Owns the host document and every widget instance attached to it, plus
//! the page-scoped state instances share: the live region, the focus
//! pointer and the init class on the document element.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use fif_a11y::LiveRegionChange;
use fif_dom::{Document, NodeId};
use fif_net::{FetchResponse, NetError, Request};

use crate::announce::AnnouncementChannel;
use crate::config::WidgetConfig;
use crate::error::{AttachError, DataError};
use crate::event::{Command, DomEventKind, Part, WidgetEvent};
use crate::hooks::HookContext;
use crate::instance::{InstanceId, WidgetInstance};
use crate::selection::Focus;
use crate::source::{Filtered, Record};

/// Instances created by one attach call
#[must_use = "dropping the handle leaves the widgets attached with no way to detach them"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachHandle {
    instances: Vec<InstanceId>,
}

impl AttachHandle {
    pub fn instances(&self) -> &[InstanceId] {
        &self.instances
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Result of an attach call: the handle plus per-host failures
#[derive(Debug)]
pub struct Attachment {
    pub handle: AttachHandle,
    pub failures: Vec<(NodeId, AttachError)>,
}

/// A remote query waiting to be sent
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub instance: InstanceId,
    pub seq: u64,
    pub request: Request,
}

/// A finished remote query
#[derive(Debug)]
pub struct FetchOutcome {
    pub instance: InstanceId,
    pub seq: u64,
    pub response: Result<FetchResponse, NetError>,
}

/// Host document with attached widgets
#[derive(Debug)]
pub struct Page {
    document: Document,
    instances: BTreeMap<InstanceId, WidgetInstance>,
    next_instance: u32,
    announcer: AnnouncementChannel,
    focused: Option<(InstanceId, Part)>,
    /// Init class -> number of instances relying on it
    init_classes: HashMap<String, usize>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            instances: BTreeMap::new(),
            next_instance: 0,
            announcer: AnnouncementChannel::new(),
            focused: None,
            init_classes: HashMap::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn instance(&self, id: InstanceId) -> Option<&WidgetInstance> {
        self.instances.get(&id)
    }

    pub fn instances(&self) -> impl Iterator<Item = &WidgetInstance> {
        self.instances.values()
    }

    /// Instance whose injected markup contains `node`
    pub fn instance_for_node(&self, node: NodeId) -> Option<InstanceId> {
        self.instances.values()
            .find(|inst| self.document.tree.contains(inst.root(), node))
            .map(WidgetInstance::id)
    }

    /// Focused instance part, as last reported by events
    pub fn focused(&self) -> Option<(InstanceId, Part)> {
        self.focused
    }

    /// Text currently in the live region
    pub fn status_text(&self) -> Option<String> {
        self.announcer.text(&self.document)
    }

    /// Announcements queued since the last call
    pub fn take_announcements(&mut self) -> Vec<LiveRegionChange> {
        self.announcer.drain()
    }

    // ------------------------------------------------------------------
    // Attach / detach
    // ------------------------------------------------------------------

    /// Attach one instance per host. Failing hosts are skipped and reported.
    pub fn attach(&mut self, config: &Arc<WidgetConfig>, hosts: &[NodeId]) -> Attachment {
        let mut instances = Vec::new();
        let mut failures = Vec::new();

        for &host in hosts {
            match self.attach_one(config, host) {
                Ok(id) => instances.push(id),
                Err(err) => {
                    tracing::warn!("attach to {} failed: {}", host, err);
                    failures.push((host, err));
                }
            }
        }

        if !instances.is_empty() && config.live_region {
            if let Err(err) = self.announcer.ensure(&mut self.document, &config.sr_hidden_class) {
                tracing::warn!("live region unavailable: {}", err);
            }
        }

        tracing::info!("attached {} widget(s), {} failure(s)", instances.len(), failures.len());
        Attachment { handle: AttachHandle { instances }, failures }
    }

    fn attach_one(&mut self, config: &Arc<WidgetConfig>, host: NodeId) -> Result<InstanceId, AttachError> {
        let node = self.document.tree.get(host).ok_or(AttachError::HostNotFound(host))?;
        if !node.is_element() {
            return Err(AttachError::NotAnElement(host));
        }
        if self.instances.values().any(|inst| inst.host() == host) {
            return Err(AttachError::AlreadyAttached(host));
        }

        self.acquire_init_class(&config.init_class)?;

        let id = InstanceId(self.next_instance);
        let instance = match WidgetInstance::mount(&mut self.document, id, host, Arc::clone(config)) {
            Ok(instance) => instance,
            Err(err) => {
                self.release_init_class(&config.init_class);
                return Err(err.into());
            }
        };
        self.next_instance += 1;
        self.instances.insert(id, instance);

        tracing::debug!("instance {} mounted in {}", id, host);
        Ok(id)
    }

    /// Remove every instance of `handle`. Detaching twice is a no-op.
    pub fn detach(&mut self, handle: &AttachHandle) {
        let mut removed = 0;
        for id in &handle.instances {
            let Some(mut instance) = self.instances.remove(id) else { continue };
            removed += 1;

            if let Err(err) = instance.unmount(&mut self.document) {
                tracing::warn!("instance {}: unmount failed: {}", id, err);
            }
            self.release_init_class(&instance.config().init_class);
            if self.focused.is_some_and(|(f, _)| f == *id) {
                self.focused = None;
            }
        }

        if !self.instances.values().any(|inst| inst.config().live_region) {
            if let Err(err) = self.announcer.remove(&mut self.document) {
                tracing::warn!("live region removal failed: {}", err);
            }
        }

        if removed > 0 {
            tracing::info!("detached {} widget(s)", removed);
        }
    }

    /// Take a reference on the init class, adding it to `<html>` on first use
    fn acquire_init_class(&mut self, class: &str) -> Result<(), AttachError> {
        if class.is_empty() {
            return Ok(());
        }
        if let Some(refs) = self.init_classes.get_mut(class) {
            *refs += 1;
            return Ok(());
        }
        let html = self.document.document_element();
        self.document.tree.add_class(html, class)?;
        self.init_classes.insert(class.to_string(), 1);
        Ok(())
    }

    fn release_init_class(&mut self, class: &str) {
        let Some(refs) = self.init_classes.get_mut(class) else { return };
        *refs -= 1;
        if *refs == 0 {
            self.init_classes.remove(class);
            let html = self.document.document_element();
            if let Err(err) = self.document.tree.remove_class(html, class) {
                tracing::warn!("could not remove init class {}: {}", class, err);
            }
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Deliver an event to one instance
    pub fn dispatch(&mut self, id: InstanceId, event: WidgetEvent, now: Instant) -> Vec<Command> {
        if !self.instances.contains_key(&id) {
            tracing::debug!("event for unknown instance {} dropped", id);
            return Vec::new();
        }

        if event == WidgetEvent::Focus(Part::Input) {
            self.close_all_except(Some(id));
        }

        let mut commands = Vec::new();
        let Page { document, instances, focused, .. } = self;
        let Some(inst) = instances.get_mut(&id) else { return commands };

        let result = match &event {
            WidgetEvent::Input(value) => inst.on_input(document, value, now),
            WidgetEvent::KeyDown(key) => match inst.on_key(document, *key) {
                Ok(Some(transition)) => {
                    let target = transition.focus.map(|focus| match focus {
                        Focus::Input => Part::Input,
                        Focus::Entry(i) => Part::Entry(i),
                    });
                    if let Some(part) = target {
                        *focused = Some((id, part));
                        commands.push(Command::Focus { instance: id, part });
                    }
                    if let Some(Focus::Entry(i)) = transition.focus {
                        if let Some(entry) = inst.view().and_then(|v| v.entry(i)) {
                            let label = entry.label.clone();
                            if let Err(err) = inst.set_value(document, &label) {
                                tracing::warn!("instance {}: preview failed: {}", id, err);
                            }
                        }
                    }
                    match transition.activate {
                        Some(i) => activate(inst, document, i, &mut commands),
                        None => Ok(()),
                    }
                }
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            },
            WidgetEvent::Focus(part) => {
                *focused = Some((id, *part));
                match part {
                    Part::Input => inst.reopen(document).map(|_| ()),
                    Part::Clear => inst.close(document),
                    Part::Entry(i) => inst.focus_entry(document, *i).map(|_| ()),
                }
            }
            WidgetEvent::Blur(part) => {
                if *focused == Some((id, *part)) {
                    *focused = None;
                }
                Ok(())
            }
            WidgetEvent::Click(Part::Clear) => inst.reset(document),
            WidgetEvent::Click(Part::Entry(i)) => activate(inst, document, *i, &mut commands),
            WidgetEvent::Click(Part::Input) => Ok(()),
            WidgetEvent::Submit => inst.close(document),
        };

        if let Err(err) = result {
            tracing::warn!("instance {}: {:?} failed: {}", id, event, err);
        }

        let ctx = HookContext { instance: id, root: inst.root(), event: &event };
        inst.config().hooks.fire(&ctx);

        commands
    }

    /// Route a DOM-style event on `target` to the owning instance
    pub fn dispatch_dom(&mut self, target: NodeId, kind: DomEventKind, now: Instant) -> Vec<Command> {
        let owner = self.instance_for_node(target);

        if kind == DomEventKind::Click {
            self.close_all_except(owner);
        }

        let Some(id) = owner else { return Vec::new() };
        let Some(inst) = self.instances.get(&id) else { return Vec::new() };

        let event = match kind {
            DomEventKind::Submit => Some(WidgetEvent::Submit),
            DomEventKind::Click => inst.part_of(&self.document, target).map(WidgetEvent::Click),
            DomEventKind::Focus => inst.part_of(&self.document, target).map(WidgetEvent::Focus),
            DomEventKind::Blur => inst.part_of(&self.document, target).map(WidgetEvent::Blur),
        };

        match event {
            Some(event) => self.dispatch(id, event, now),
            None => Vec::new(),
        }
    }

    /// Close every open list except `keep`'s
    pub fn close_all_except(&mut self, keep: Option<InstanceId>) {
        for (id, inst) in self.instances.iter_mut() {
            if Some(*id) == keep || !inst.is_open() {
                continue;
            }
            if let Err(err) = inst.close(&mut self.document) {
                tracing::warn!("instance {}: close failed: {}", id, err);
            }
        }
    }

    // ------------------------------------------------------------------
    // Query pipeline
    // ------------------------------------------------------------------

    /// Earliest debounce deadline across instances
    pub fn next_deadline(&self) -> Option<Instant> {
        self.instances.values().filter_map(WidgetInstance::deadline).min()
    }

    /// Run every query whose debounce has elapsed.
    ///
    /// Local sources render immediately; remote sources come back as
    /// tickets for the caller to send.
    pub fn tick(&mut self, now: Instant) -> Vec<FetchTicket> {
        let mut tickets = Vec::new();
        let ids: Vec<InstanceId> = self.instances.keys().copied().collect();

        for id in ids {
            let Some(inst) = self.instances.get_mut(&id) else { continue };
            let Some(query) = inst.poll_query(now) else { continue };
            tracing::debug!("instance {}: query {:?}", id, query);

            let fields = inst.form_fields(&query);
            match inst.config().source.filter(&query, &fields) {
                Ok(Filtered::Skipped) => {
                    inst.invalidate();
                    if let Err(err) = inst.discard_results(&mut self.document) {
                        tracing::warn!("instance {}: discard failed: {}", id, err);
                    }
                }
                Ok(Filtered::Ready(records)) => self.present(id, &records),
                Ok(Filtered::Pending(request)) => {
                    let seq = inst.begin_request();
                    tickets.push(FetchTicket { instance: id, seq, request });
                }
                Err(err) => {
                    inst.invalidate();
                    tracing::warn!("instance {}: {}", id, err);
                    self.present(id, &[]);
                }
            }
        }

        tickets
    }

    /// Apply a finished remote query. Returns false if it was dropped.
    pub fn resolve(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { instance: id, seq, response } = outcome;
        let Some(inst) = self.instances.get_mut(&id) else {
            tracing::debug!("response {} for detached instance {} dropped", seq, id);
            return false;
        };
        if !inst.accept_response(seq) {
            tracing::debug!("instance {}: stale response {} dropped", id, seq);
            return false;
        }

        let records = response
            .map_err(DataError::from)
            .and_then(|r| inst.config().source.parse_response(r));
        match records {
            Ok(records) => self.present(id, &records),
            Err(err) => {
                tracing::warn!("instance {}: {}", id, err);
                self.present(id, &[]);
            }
        }
        true
    }

    /// Render results and announce the count
    fn present(&mut self, id: InstanceId, records: &[Record]) {
        let Some(inst) = self.instances.get_mut(&id) else { return };
        let count = match inst.show_results(&mut self.document, records) {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!("instance {}: render failed: {}", id, err);
                return;
            }
        };

        if inst.config().live_region {
            let messages = &inst.config().messages;
            if let Err(err) = self.announcer.announce(&mut self.document, count, messages) {
                tracing::warn!("instance {}: announce failed: {}", id, err);
            }
        }
    }
}

fn activate(
    inst: &mut WidgetInstance,
    document: &mut Document,
    index: usize,
    commands: &mut Vec<Command>,
) -> fif_dom::DomResult<()> {
    if let Some(href) = inst.activate(document, index)? {
        commands.push(Command::Navigate { instance: inst.id(), href });
    }
    Ok(())
}
