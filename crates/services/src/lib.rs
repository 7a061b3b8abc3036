pub mod analytics;
pub mod auth;
pub mod dao;
pub mod dispatcher;
pub mod drive;
pub mod email;
pub mod rate_limit;
pub mod recorder;
pub mod review;
pub mod storage;
pub mod sweeper;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use dao::*;
pub use dispatcher::ReminderDispatcher;
pub use drive::DriveService;
pub use email::{EmailMessage, HttpMailer, Mailer};
pub use rate_limit::{RateDecision, RateLimiter};
pub use recorder::Recorder;
pub use review::ReviewService;
pub use storage::DocumentStorage;
pub use sweeper::DemoSweeper;
