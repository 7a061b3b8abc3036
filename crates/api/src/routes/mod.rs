pub mod analytics;
pub mod auth;
pub mod case;
pub mod cron;
pub mod document;
pub mod message;
pub mod notification;
pub mod superadmin;
pub mod user;
