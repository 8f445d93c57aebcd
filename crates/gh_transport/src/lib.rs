pub mod auth;
pub mod exec;
pub mod model;

pub use auth::AccessToken;
pub use exec::{HttpExec, ReqwestExecutor};
pub use model::{parse_rate_limit, RateLimitSnapshot};
