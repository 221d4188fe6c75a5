mod admin;
mod audit;
mod auth;
mod rate_limit;
mod report;

pub use admin::{AdminService, AdminStats, AdminUserSummary};
pub use audit::AuditService;
pub use auth::{AuthService, Claims};
pub use rate_limit::RateLimiter;
pub use report::{AdminReportSummary, RenderedReport, ReportDataResponse, ReportOwner, ReportService};
