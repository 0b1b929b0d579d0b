//! Find-It-Fast - accessible autocomplete engine
//!
//! Attaches a search form to host elements of a [`Page`] and drives it
//! from events: input is debounced into queries, queries run against a
//! [`QuerySource`], results render into a keyboard-navigable listbox and
//! the result count is announced through a shared live region.
//!
//! ```no_run
//! use std::time::{Duration, Instant};
//! use finditfast::{Options, Page, Widget, WidgetEvent, Key};
//!
//! let widget = Widget::configure(Options::from_json(r#"{
//!     "dataConfig": { "type": "array", "src": ["Apple", "Banana", "Apricot"] },
//!     "ariaConfig": { "includeLiveRegion": true }
//! }"#)?)?;
//!
//! let mut page = Page::default();
//! let attachment = widget.attach_selector(&mut page, "body");
//! let id = attachment.handle.instances()[0];
//!
//! let t0 = Instant::now();
//! page.dispatch(id, WidgetEvent::Input("ap".into()), t0);
//! page.tick(t0 + Duration::from_millis(500));
//! page.dispatch(id, WidgetEvent::KeyDown(Key::ArrowDown), t0);
//! # Ok::<(), finditfast::ConfigError>(())
//! ```

pub mod announce;
pub mod config;
pub mod debounce;
pub mod driver;
pub mod error;
pub mod event;
pub mod hooks;
pub mod instance;
pub mod page;
pub mod render;
pub mod selection;
pub mod source;

use std::sync::Arc;

use fif_dom::NodeId;

pub use config::{DataKind, Messages, Options, WidgetConfig};
pub use driver::run_tickets;
pub use error::{AttachError, ConfigError, DataError};
pub use event::{Command, DomEventKind, Key, Part, WidgetEvent};
pub use hooks::{ControlHooks, HookContext, Hooks};
pub use instance::{InstanceId, WidgetInstance};
pub use page::{AttachHandle, Attachment, FetchOutcome, FetchTicket, Page};
pub use render::{Entry, ListView};
pub use selection::Selection;
pub use source::{Filtered, QuerySource, Record};

/// A configured widget, ready to attach to any number of hosts
#[derive(Debug, Clone)]
pub struct Widget {
    config: Arc<WidgetConfig>,
}

impl Widget {
    /// Validate options. Fails fast on any configuration error.
    pub fn configure(options: Options) -> Result<Self, ConfigError> {
        let config = WidgetConfig::resolve(options)?;
        tracing::debug!("configured {} widget {:?}", config.source.kind(), config.form.name);
        Ok(Self { config: Arc::new(config) })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Attach one instance per host node
    pub fn attach(&self, page: &mut Page, hosts: &[NodeId]) -> Attachment {
        page.attach(&self.config, hosts)
    }

    /// Attach to every element matching a simple selector
    pub fn attach_selector(&self, page: &mut Page, selector: &str) -> Attachment {
        let hosts = page.document().query_selector_all(selector);
        if hosts.is_empty() {
            tracing::warn!("selector {:?} matched no hosts", selector);
        }
        self.attach(page, &hosts)
    }
}
