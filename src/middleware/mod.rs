mod auth;
mod client_ip;

pub use auth::AuthUser;
pub use client_ip::ClientIp;
