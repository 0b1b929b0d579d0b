//! Fetch driver
//!
//! Sends [`FetchTicket`]s concurrently over a [`Transport`] and feeds the
//! outcomes back into the page in completion order.

use fif_net::Transport;
use smol::LocalExecutor;

use crate::page::{FetchOutcome, FetchTicket, Page};

/// Send a ticket and wrap the answer as an outcome
pub async fn fetch(transport: &dyn Transport, ticket: FetchTicket) -> FetchOutcome {
    let FetchTicket { instance, seq, request } = ticket;
    let response = transport.send(request).await;
    FetchOutcome { instance, seq, response }
}

/// Run `tickets` to completion, resolving each against `page`.
///
/// Returns how many outcomes were applied; stale or orphaned ones are not
/// counted.
pub fn run_tickets(page: &mut Page, transport: &dyn Transport, tickets: Vec<FetchTicket>) -> usize {
    if tickets.is_empty() {
        return 0;
    }

    let ex = LocalExecutor::new();
    let (tx, rx) = smol::channel::unbounded::<FetchOutcome>();

    for ticket in tickets {
        let tx = tx.clone();
        let pending = fetch(transport, ticket);
        ex.spawn(async move {
            // The receiver outlives every sender
            let _ = tx.send(pending.await).await;
        })
        .detach();
    }
    drop(tx);

    smol::block_on(ex.run(async {
        let mut applied = 0;
        while let Ok(outcome) = rx.recv().await {
            if page.resolve(outcome) {
                applied += 1;
            }
        }
        applied
    }))
}
