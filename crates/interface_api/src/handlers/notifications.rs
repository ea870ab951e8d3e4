//! Live notification streams
//!
//! Server-sent events over the broadcast hub. A client only receives what is
//! published while it is connected.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{Stream, StreamExt as _};
use tracing::{info, warn};

use core_kernel::UserId;
use domain_claims::{Notification, NotificationChannel};

use super::parse_path_id;
use crate::dto::notifications::AdminStreamQuery;
use crate::error::ApiError;
use crate::AppState;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(25);

fn to_events(
    notifications: impl Stream<Item = Notification> + Send + 'static,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = notifications
        .filter_map(|notification| {
            match Event::default().event("notification").json_data(&notification) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "Dropping unserializable notification");
                    None
                }
            }
        })
        .map(Ok::<_, Infallible>);

    Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

/// Streams one user's notifications
pub async fn user_stream(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let user_id: UserId = parse_path_id(&user_id, "user")?;
    let user = state.users.get_by_id(user_id).await?;

    info!(user_id = %user.id, "User notification stream opened");
    let notifications = state
        .hub
        .subscribe_stream(NotificationChannel::User(user.id))
        .await;
    Ok(to_events(notifications))
}

/// Streams the shared admin channel
///
/// The caller identifies as an admin with `?adminId=`.
pub async fn admin_stream(
    State(state): State<AppState>,
    Query(query): Query<AdminStreamQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let admin = state.users.get_by_id(query.admin_id.into()).await?;
    if !admin.is_admin() {
        return Err(ApiError::Forbidden(format!(
            "user '{}' is not an admin",
            admin.username
        )));
    }

    info!(user_id = %admin.id, "Admin notification stream opened");
    let notifications = state.hub.subscribe_stream(NotificationChannel::Admins).await;
    Ok(to_events(notifications))
}
