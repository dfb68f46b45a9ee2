use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};

use crate::api::models::RefreshAccepted;
use crate::config::settings::{self, AppConfig};
use crate::services::ingestion::IngestionService;
use crate::services::processing::ProcessingService;

pub async fn admin_refresh(headers: HeaderMap) -> impl IntoResponse {
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    tokio::spawn(async move {
        log::info!("Admin triggered refresh started");

        let ingest_result = async {
            let mut service = IngestionService::new(AppConfig::new())?;
            service.run().await
        }
        .await;

        if let Err(e) = ingest_result {
            log::error!("Refresh failed at ingestion: {:?}", e);
            return;
        }

        let process_result =
            ProcessingService::new(AppConfig::new()).and_then(|service| service.run());

        if let Err(e) = process_result {
            log::error!("Refresh failed at processing: {:?}", e);
            return;
        }

        log::info!("Admin triggered refresh completed successfully");
    });

    (
        StatusCode::ACCEPTED,
        Json(RefreshAccepted {
            success: true,
            message: "Refresh triggered".to_string(),
        }),
    )
        .into_response()
}

fn is_authorized(headers: &HeaderMap) -> bool {
    let Ok(password) = settings::admin_password() else {
        return false;
    };

    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    auth_header == Some(format!("Bearer {password}").as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_password_env_denies_everything() {
        // ADMIN_PASSWORD is unset in the test environment, so even a
        // well-formed header must be rejected.
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Bearer secret".parse().unwrap());
        assert!(!is_authorized(&headers));
    }
}
