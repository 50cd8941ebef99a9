use crate::{
    session::{Page, SessionId, SessionState},
    views::View,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NavigateBody {
    pub page: Page,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionResponse {
    pub id: SessionId,
    pub state: SessionState,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub id: SessionId,
    pub state: SessionState,
    #[serde(flatten)]
    pub view: View,
}
