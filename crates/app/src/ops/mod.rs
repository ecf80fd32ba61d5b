pub mod acl;
pub mod binary;
pub mod category;
pub mod comment;
pub mod content;
mod display;
pub mod folder;
pub mod init;
pub mod text;
pub mod version;

pub use acl::Acl;
pub use binary::Binary;
pub use category::Category;
pub use comment::Comment;
pub use content::Content;
pub use folder::Folder;
pub use init::Init;
pub use text::Text;
pub use version::Version;
