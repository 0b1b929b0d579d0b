//! Host callbacks
//!
//! Optional per-control callbacks invoked after the built-in handling of
//! an event. They observe; they cannot veto.

use std::fmt;
use std::sync::Arc;

use fif_dom::NodeId;

use crate::event::{Part, WidgetEvent};
use crate::instance::InstanceId;

/// What a hook is told about the event it observes
#[derive(Debug)]
pub struct HookContext<'a> {
    pub instance: InstanceId,
    /// Form root of the instance
    pub root: NodeId,
    pub event: &'a WidgetEvent,
}

pub type Hook = Arc<dyn Fn(&HookContext<'_>) + Send + Sync>;

/// Click/focus/blur callbacks for one control
#[derive(Clone, Default)]
pub struct ControlHooks {
    pub on_click: Option<Hook>,
    pub on_focus: Option<Hook>,
    pub on_blur: Option<Hook>,
}

impl ControlHooks {
    pub fn on_click(mut self, f: impl Fn(&HookContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(f));
        self
    }

    pub fn on_focus(mut self, f: impl Fn(&HookContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_focus = Some(Arc::new(f));
        self
    }

    pub fn on_blur(mut self, f: impl Fn(&HookContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_blur = Some(Arc::new(f));
        self
    }

    fn count(&self) -> usize {
        [&self.on_click, &self.on_focus, &self.on_blur]
            .iter()
            .filter(|h| h.is_some())
            .count()
    }
}

/// All host callbacks of a widget
#[derive(Clone, Default)]
pub struct Hooks {
    pub input: ControlHooks,
    pub clear: ControlHooks,
    pub entry: ControlHooks,
    pub on_submit: Option<Hook>,
}

impl Hooks {
    pub fn with_input(mut self, hooks: ControlHooks) -> Self {
        self.input = hooks;
        self
    }

    pub fn with_clear(mut self, hooks: ControlHooks) -> Self {
        self.clear = hooks;
        self
    }

    pub fn with_entry(mut self, hooks: ControlHooks) -> Self {
        self.entry = hooks;
        self
    }

    pub fn on_submit(mut self, f: impl Fn(&HookContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_submit = Some(Arc::new(f));
        self
    }

    /// Invoke the hook matching `ctx.event`, if one is set
    pub fn fire(&self, ctx: &HookContext<'_>) {
        let hook = match ctx.event {
            WidgetEvent::Click(part) => self.control(*part).on_click.as_ref(),
            WidgetEvent::Focus(part) => self.control(*part).on_focus.as_ref(),
            WidgetEvent::Blur(part) => self.control(*part).on_blur.as_ref(),
            WidgetEvent::Submit => self.on_submit.as_ref(),
            WidgetEvent::Input(_) | WidgetEvent::KeyDown(_) => None,
        };
        if let Some(hook) = hook {
            hook(ctx);
        }
    }

    fn control(&self, part: Part) -> &ControlHooks {
        match part {
            Part::Input => &self.input,
            Part::Clear => &self.clear,
            Part::Entry(_) => &self.entry,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("input", &self.input.count())
            .field("clear", &self.clear.count())
            .field("entry", &self.entry.count())
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}
