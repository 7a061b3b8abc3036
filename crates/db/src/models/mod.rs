pub mod activity_log;
pub mod case;
pub mod document;
pub mod message;
pub mod notification;
pub mod organization;
pub mod reminder;
pub mod user;

pub use activity_log::ActivityLog;
pub use case::{Case, CaseStatus, KeyDate, Priority};
pub use document::{Document, DocumentStatus, ReviewSummary, StoragePointer};
pub use message::Message;
pub use notification::Notification;
pub use organization::{Branding, DemoLimits, Organization};
pub use reminder::{Reminder, ReminderStatus};
pub use user::{Role, User};
