use uuid::Uuid;

use crate::domain::auth::ports::{AuditAction, AuditSink};

/// Audit sink that emits structured events to the `audit` tracing target.
/// Subscribers can route that target to a separate appender or shipper;
/// emission never blocks or fails the calling operation.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
  fn emit(&self, action: AuditAction, user_id: Uuid, details: serde_json::Value) {
    tracing::info!(
      target: "audit",
      action = action.as_str(),
      user_id = %user_id,
      details = %details,
    );
  }
}
