use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Position in the content's comment list, starting at 0.
    pub id: usize,
    pub created_by: User,
    pub created: DateTime<Utc>,
    pub comment: String,
}
