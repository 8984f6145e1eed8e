//! Single-task event loop binding a view, its events and a data source.
//!
//! User events arrive on an unbounded channel. Every query the view issues
//! is resolved concurrently with further events; outcomes are applied in
//! the order they complete. Nothing is cancelled: an outstanding query
//! keeps running after a newer one is issued.

use crime_region_source::CrimeDataSource;
use futures::StreamExt as _;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;

use crate::map::MapWidget;
use crate::view::{PendingFetch, RegionCrimeView, ViewEvent};

/// Sender half handed to whatever produces user events.
pub type EventSender<H> = mpsc::UnboundedSender<ViewEvent<H>>;

/// Receiver half consumed by [`run`].
pub type EventReceiver<H> = mpsc::UnboundedReceiver<ViewEvent<H>>;

/// Creates an event channel for a view over map `M`.
#[must_use]
pub fn event_channel<M: MapWidget>() -> (EventSender<M::Marker>, EventReceiver<M::Marker>) {
    mpsc::unbounded_channel()
}

/// Drives `view` until the event channel is closed and every query has
/// landed.
///
/// `pending` seeds the loop with queries issued before it started (the
/// mount query, typically).
pub async fn run<M, S>(
    view: &mut RegionCrimeView<M>,
    source: &S,
    pending: impl IntoIterator<Item = PendingFetch>,
    events: &mut EventReceiver<M::Marker>,
) where
    M: MapWidget,
    S: CrimeDataSource + ?Sized,
{
    let mut in_flight = FuturesUnordered::new();
    for fetch in pending {
        log::debug!("Resolving query #{} against {}", fetch.seq, source.id());
        in_flight.push(fetch.resolve(source));
    }

    let mut events_open = true;

    while events_open || !in_flight.is_empty() {
        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(event) => {
                    if let Some(fetch) = view.handle_event(event) {
                        log::debug!("Resolving query #{} against {}", fetch.seq, source.id());
                        in_flight.push(fetch.resolve(source));
                    }
                }
                None => {
                    log::debug!("Event channel closed, {} queries outstanding", in_flight.len());
                    events_open = false;
                }
            },
            Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                view.apply_fetch(outcome);
            }
        }
    }
}
