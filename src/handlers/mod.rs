mod admin;
mod audit;
mod auth;
mod health;
mod report;

pub use admin::{get_stats, list_reports, list_users};
pub use audit::{
    generate_report, get_status, list_domains, list_sessions, start_session, submit_response,
};
pub use auth::{get_user, login, register};
pub use health::health_check;
pub use report::{download_report, email_report, get_report_data};
