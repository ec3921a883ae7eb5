//! Entity records managed by the admin panels.

pub mod news;
pub mod record;
pub mod role;
pub mod user;

pub use news::{NewsDraft, NewsItem, NewsPatch};
pub use record::{Record, RecordDetails, RecordDraft, RecordPatch};
pub use role::{Role, RoleDraft, RolePatch};
pub use user::{AdminUser, UserDraft, UserPatch};
