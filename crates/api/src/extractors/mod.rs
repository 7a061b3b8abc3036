pub mod cron;
pub mod principal;
pub mod superadmin;
