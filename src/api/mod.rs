// ==========================================
// Campus Administration Platform - API Layer
// ==========================================
// Caller-facing surface. Sits behind any transport: the surrounding
// platform's REST handlers call straight into AllocationApi.
// ==========================================

pub mod allocation_api;
pub mod error;
pub mod notification;

pub use allocation_api::AllocationApi;
pub use error::{ApiError, ApiResult};
pub use notification::{
    BulkCounts, Notification, NotificationSink, OutcomeLevel, TracingNotificationSink,
};
