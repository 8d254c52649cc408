//! Async loop driving a navigation session from a stream of inputs

use std::sync::Arc;

use campusnav_core::{RouteRequest, RouteResult};
use log::{debug, info};
use tokio::sync::mpsc;

use crate::matcher::PositionFix;
use crate::provider::{ProviderError, RouteProvider};
use crate::session::{NavigationEvent, NavigationSession, SessionConfig};

/// Messages accepted by a running navigation
#[derive(Debug, Clone)]
pub enum SessionInput {
    Fix(PositionFix),
    Cancel,
}

/// Runs one navigation until arrival, cancellation or a closed channel.
///
/// The first route is fetched before any input is read; failing to get it
/// is the only error. Later fetches run on spawned tasks and report back
/// into this loop, so every fix is fully processed before the next one.
///
/// # Errors
///
/// Returns the provider error when the initial route cannot be computed.
pub async fn run_navigation<P>(
    provider: Arc<P>,
    request: RouteRequest,
    config: SessionConfig,
    mut inputs: mpsc::Receiver<SessionInput>,
    events: mpsc::Sender<NavigationEvent>,
) -> Result<(), ProviderError>
where
    P: RouteProvider + 'static,
{
    let route = provider.route(&request).await?;
    let mut session = NavigationSession::new(config, &request, &route);
    info!(
        "Navigation started: {:.0} m over {} points",
        route.length_m,
        session.route().len()
    );
    if events.send(session.route_event(false)).await.is_err() {
        return Ok(());
    }

    let (fetched_tx, mut fetched_rx) = mpsc::channel::<Result<RouteResult, ProviderError>>(1);

    loop {
        let emitted = tokio::select! {
            input = inputs.recv() => match input {
                Some(SessionInput::Fix(fix)) => session.on_fix(fix),
                Some(SessionInput::Cancel) | None => vec![session.cancel()],
            },
            Some(fetched) = fetched_rx.recv() => match fetched {
                Ok(route) => session.apply_route(&route).into_iter().collect(),
                Err(err) => {
                    session.reroute_failed(&err.to_string());
                    Vec::new()
                }
            },
        };

        for event in emitted {
            if let NavigationEvent::RerouteRequested(request) = &event {
                spawn_fetch(Arc::clone(&provider), request.clone(), fetched_tx.clone());
            }
            if events.send(event).await.is_err() {
                debug!("Event receiver dropped, stopping navigation");
                return Ok(());
            }
        }

        if session.is_finished() {
            return Ok(());
        }
    }
}

fn spawn_fetch<P>(
    provider: Arc<P>,
    request: RouteRequest,
    reply: mpsc::Sender<Result<RouteResult, ProviderError>>,
) where
    P: RouteProvider + 'static,
{
    tokio::spawn(async move {
        let result = provider.route(&request).await;
        // The session may have ended while the fetch was running
        let _ = reply.send(result).await;
    });
}
