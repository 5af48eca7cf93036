//! Study value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StudyId;

/// The research study a survey belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    pub id: StudyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
