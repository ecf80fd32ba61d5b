//! Domain value objects returned to callers
//!
//! These are built by the [`ContentFactory`](crate::factory::ContentFactory)
//! from raw repository nodes and carry no behavior of their own:
//!
//! - **[`Content`]**: a text, binary or folder entry at `(location, id, locale)`
//! - **[`Category`]**: a node of the hierarchical category tree
//! - **[`Comment`]**: an append-only remark attached to content
//! - **[`User`]**: the authenticated principal of a session

mod category;
mod comment;
mod content;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use content::{Content, ContentBody, ContentKind};
pub use user::User;
