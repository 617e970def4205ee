use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use picker_core::{FixedSource, PickError, PickerSession, RandomSource, RngSource};
use shared::{
    domain::{Mode, SessionId},
    error::{ApiError, ErrorCode},
    protocol::{RevealedResult, ServerEvent, SessionView},
};
use storage::{SessionHandle, Storage};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Where new sessions get their randomness from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePolicy {
    Os,
    /// Session `n` is seeded with `seed + n`.
    Seeded(u64),
    /// Every session replays the same index script.
    Scripted(Vec<usize>),
}

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub events: broadcast::Sender<ServerEvent>,
    pub draw_delay: Duration,
    pub sources: SourcePolicy,
    sessions_started: Arc<AtomicU64>,
}

impl ApiContext {
    pub fn new(storage: Storage, draw_delay: Duration, sources: SourcePolicy) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            storage,
            events,
            draw_delay,
            sources,
            sessions_started: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }

    fn new_source(&self) -> Box<dyn RandomSource> {
        let nth = self.sessions_started.fetch_add(1, Ordering::Relaxed);
        match &self.sources {
            SourcePolicy::Os => Box::new(RngSource::from_os()),
            SourcePolicy::Seeded(seed) => Box::new(RngSource::seeded(seed.wrapping_add(nth))),
            SourcePolicy::Scripted(indices) => Box::new(FixedSource::new(indices.clone())),
        }
    }

    fn publish(&self, event: ServerEvent) {
        let _ = self.events.send(event);
    }
}

pub async fn create_session(ctx: &ApiContext) -> Result<SessionView, ApiError> {
    let picker = PickerSession::new(ctx.new_source());
    let (session_id, handle) = ctx
        .storage
        .create_session(picker)
        .await
        .map_err(|e| ApiError::new(ErrorCode::Capacity, e.to_string()))?;
    let view = handle.lock().await.view(session_id);
    info!(%session_id, "session started");
    Ok(view)
}

pub async fn get_session(ctx: &ApiContext, session_id: SessionId) -> Result<SessionView, ApiError> {
    let handle = session_handle(ctx, session_id).await?;
    let view = handle.lock().await.view(session_id);
    Ok(view)
}

pub async fn end_session(ctx: &ApiContext, session_id: SessionId) -> Result<(), ApiError> {
    if !ctx.storage.end_session(session_id).await {
        return Err(session_not_found(session_id));
    }
    info!(%session_id, "session ended");
    ctx.publish(ServerEvent::SessionEnded { session_id });
    Ok(())
}

pub async fn set_mode(
    ctx: &ApiContext,
    session_id: SessionId,
    mode: Mode,
) -> Result<SessionView, ApiError> {
    update(ctx, session_id, |session| session.set_mode(mode)).await
}

/// Appends one item per non-blank line to the active pool.
pub async fn add_items(
    ctx: &ApiContext,
    session_id: SessionId,
    text: &str,
) -> Result<SessionView, ApiError> {
    update(ctx, session_id, |session| {
        let added = session.add_lines(text)?;
        debug!(%session_id, added, "items added");
        Ok(())
    })
    .await
}

pub async fn replace_items(
    ctx: &ApiContext,
    session_id: SessionId,
    text: &str,
) -> Result<SessionView, ApiError> {
    update(ctx, session_id, |session| session.replace_lines(text).map(|_| ())).await
}

pub async fn remove_item(
    ctx: &ApiContext,
    session_id: SessionId,
    index: usize,
) -> Result<SessionView, ApiError> {
    update(ctx, session_id, |session| session.remove_at(index).map(|_| ())).await
}

pub async fn clear_items(ctx: &ApiContext, session_id: SessionId) -> Result<SessionView, ApiError> {
    update(ctx, session_id, PickerSession::clear).await
}

/// Runs a full draw: refuses early when the pool is too small, otherwise
/// holds the session through the pacing delay and reveals the pick.
///
/// The delay and the reveal run on their own task that owns the session
/// lock, so a caller that goes away mid-delay still leaves the session in
/// `Showing`.
pub async fn draw(ctx: &ApiContext, session_id: SessionId) -> Result<SessionView, ApiError> {
    let handle = session_handle(ctx, session_id).await?;
    let mut session = handle.lock_owned().await;

    let mode = session.begin_draw().map_err(|e| {
        warn!(%session_id, error = %e, "draw refused");
        pick_error(e)
    })?;
    info!(%session_id, %mode, items = session.active().size(), "draw started");
    ctx.publish(ServerEvent::DrawStarted { session_id, mode });

    let ctx = ctx.clone();
    let reveal_task = tokio::spawn(async move {
        if !ctx.draw_delay.is_zero() {
            tokio::time::sleep(ctx.draw_delay).await;
        }

        let reveal = session.complete_draw().map_err(pick_error)?;
        info!(%session_id, %mode, index = reveal.index, "result revealed");
        let view = session.view(session_id);
        drop(session);

        ctx.publish(ServerEvent::ResultRevealed {
            session_id,
            result: RevealedResult::from(&reveal),
        });
        ctx.publish(ServerEvent::SessionUpdated { view: view.clone() });
        Ok::<_, ApiError>(view)
    });

    reveal_task.await.map_err(|e| {
        ApiError::new(ErrorCode::Internal, format!("draw task failed: {e}"))
    })?
}

pub async fn keep_result(ctx: &ApiContext, session_id: SessionId) -> Result<SessionView, ApiError> {
    update(ctx, session_id, |session| session.keep().map(|_| ())).await
}

pub async fn remove_result(
    ctx: &ApiContext,
    session_id: SessionId,
) -> Result<SessionView, ApiError> {
    update(ctx, session_id, |session| session.remove_result().map(|_| ())).await
}

/// Ends every session idle for longer than `ttl`; returns how many went.
pub async fn evict_idle_sessions(ctx: &ApiContext, ttl: chrono::Duration) -> usize {
    let evicted = ctx.storage.evict_idle(Utc::now(), ttl).await;
    for session_id in &evicted {
        debug!(%session_id, "idle session evicted");
        ctx.publish(ServerEvent::SessionEnded {
            session_id: *session_id,
        });
    }
    evicted.len()
}

async fn update<F>(ctx: &ApiContext, session_id: SessionId, op: F) -> Result<SessionView, ApiError>
where
    F: FnOnce(&mut PickerSession) -> Result<(), PickError>,
{
    let handle = session_handle(ctx, session_id).await?;
    let mut session = handle.lock().await;
    op(&mut *session).map_err(|e| {
        warn!(%session_id, error = %e, "session update rejected");
        pick_error(e)
    })?;
    let view = session.view(session_id);
    drop(session);

    ctx.publish(ServerEvent::SessionUpdated { view: view.clone() });
    Ok(view)
}

async fn session_handle(ctx: &ApiContext, session_id: SessionId) -> Result<SessionHandle, ApiError> {
    ctx.storage
        .session(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))
}

fn session_not_found(session_id: SessionId) -> ApiError {
    ApiError::new(
        ErrorCode::NotFound,
        format!("session {session_id} not found"),
    )
}

pub fn pick_error(err: PickError) -> ApiError {
    let code = match err {
        PickError::InsufficientItems { .. } => ErrorCode::InsufficientItems,
        PickError::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
        PickError::DrawInProgress
        | PickError::NotDrawing
        | PickError::ResultPending
        | PickError::NoResult => ErrorCode::Conflict,
    };
    ApiError::new(code, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
