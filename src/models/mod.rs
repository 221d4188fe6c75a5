pub mod report;
pub mod session;
pub mod user;

pub use report::{
    AuditReport, AutomationOpportunity, DomainAutomation, ImplementationAutomation,
    ImplementationGuide, ImplementationOrder, QuickWin, ReportData, ReportWithOwner,
};
pub use session::{
    AuditResponse, AuditSession, SessionStatus, SessionStatusResponse, SessionSummary,
    advance_domain,
};
pub use user::{
    LoginInput, ProfileResponse, RegisterInput, Role, User, UserResponse, UserWithAuditCount,
    UserWithToken,
};
