use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NextStepRequest {
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub reflection: Option<String>,
}
