//! Find-It-Fast demo - scripted session
//!
//! Usage: `fif-demo <options.json> [query...]`

use std::time::Instant;

use anyhow::{Context, bail};
use fif_net::HttpTransport;
use finditfast::{Key, Options, Page, Widget, WidgetEvent, run_tickets};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: fif-demo <options.json> [query...]");
    };
    let queries: Vec<String> = args.collect();

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {path}"))?;
    let widget = Widget::configure(Options::from_json(&json)?)?;

    let mut page = Page::default();
    let doc = page.document_mut();
    let body = doc.body();
    let host = doc.append_element(body, "div")?;
    doc.tree.set_attribute(host, "id", "search")?;

    let attachment = widget.attach_selector(&mut page, "#search");
    if let Some((node, err)) = attachment.failures.first() {
        bail!("could not attach to {node}: {err}");
    }
    let id = *attachment.handle.instances().first().context("no instance attached")?;

    let transport = HttpTransport::new()?;
    let mut now = Instant::now();

    for query in &queries {
        tracing::info!("typing {:?}", query);
        page.dispatch(id, WidgetEvent::Input(query.clone()), now);

        now += widget.config().debounce;
        let tickets = page.tick(now);
        run_tickets(&mut page, &transport, tickets);

        page.dispatch(id, WidgetEvent::KeyDown(Key::ArrowDown), now);

        println!("{}", page.document().tree.outer_html(host));
        for change in page.take_announcements() {
            println!("[{}] {}", change.politeness.as_str(), change.text);
        }
    }

    page.detach(&attachment.handle);
    Ok(())
}
