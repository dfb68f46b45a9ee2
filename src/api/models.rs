use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshAccepted {
    pub success: bool,
    pub message: String,
}
