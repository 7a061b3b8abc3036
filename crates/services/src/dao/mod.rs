pub mod activity;
pub mod base;
pub mod case;
pub mod document;
pub mod message;
pub mod notification;
pub mod organization;
pub mod reminder;
pub mod user;

pub use activity::ActivityDao;
pub use base::{DaoError, DaoResult, OrgScope, PaginatedResult, PaginationParams};
pub use case::CaseDao;
pub use document::DocumentDao;
pub use message::MessageDao;
pub use notification::NotificationDao;
pub use organization::OrganizationDao;
pub use reminder::ReminderDao;
pub use user::UserDao;
