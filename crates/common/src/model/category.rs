use serde::{Deserialize, Serialize};

/// A category of the reserved category tree.
///
/// `location` is the parent location relative to the category root, so a
/// category created under `"/"` has location `"/"` and one created under
/// `"/sports"` has location `"/sports"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub locale: String,
    pub location: String,
    pub description: String,
}

impl Category {
    /// Path of this category relative to the category root.
    pub fn path(&self) -> String {
        crate::path::join(&self.location, &self.id)
    }
}
