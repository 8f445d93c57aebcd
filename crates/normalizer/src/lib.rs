pub mod models;
pub mod payloads;
pub mod transform;

pub use models::{Author, IssueRecord, Label, UserAccount, UserProfile};
pub use payloads::{IssuePayload, LabelPayload, ReadmePayload, UserPayload, UserRef};
pub use transform::{decode_readme, normalize_issue, normalize_user};
