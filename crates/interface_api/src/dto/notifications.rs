//! Notification stream DTOs

use serde::Deserialize;
use uuid::Uuid;

/// Query of `GET /api/notifications/admin`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStreamQuery {
    pub admin_id: Uuid,
}
