use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde_json::Value;

use crate::config::settings::DiscordSettings;
use crate::domain::{ChannelMessage, FetchProgress, MessageResponse};
use crate::http::RateLimitedClient;
use crate::pagination::{build_history_url, MessageCursor, PaginationConfig};

/// Discord REST API client for reading channel history
pub struct DiscordClient {
    client: RateLimitedClient,
    settings: DiscordSettings,
}

/// One channel's fetched history: the in-range domain messages plus every
/// raw page exactly as the API returned it, for the raw cache tier.
pub struct ChannelHistory {
    pub messages: Vec<ChannelMessage>,
    pub raw_pages: Vec<Value>,
}

impl DiscordClient {
    pub fn new(settings: &DiscordSettings, bot_token: &str) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?
        .with_authorization(format!("Bot {}", bot_token));

        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    /// Fetch a channel's history within the date range, oldest boundary by
    /// last-seen message id.
    ///
    /// Pages arrive newest-first; the walk stops once a page reaches back
    /// past `start`. Any API failure is fatal to the run.
    pub async fn fetch_channel_history(
        &mut self,
        channel_id: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ChannelHistory> {
        info!("Fetching history for channel {}", channel_id);

        let mut cursor = MessageCursor::new(pagination_config(&self.settings));
        let mut progress = FetchProgress::new(channel_id.to_string());
        let mut messages = Vec::new();
        let mut raw_pages = Vec::new();

        while cursor.has_more() {
            let raw_page = self.fetch_page(channel_id, &cursor).await?;
            let page = parse_message_page(&raw_page)
                .with_context(|| format!("Failed to parse message page for channel {}", channel_id))?;
            raw_pages.push(raw_page);

            let page_len = page.len();
            let oldest_id = page.iter().filter_map(|m| m.id.parse().ok()).min();

            let converted: Vec<ChannelMessage> = page
                .into_iter()
                .filter_map(|m| m.into_channel_message(channel_id))
                .collect();

            let reached_start = converted.iter().any(|m| m.timestamp < start);

            messages.extend(
                converted
                    .into_iter()
                    .filter(|m| m.timestamp >= start && m.timestamp <= end),
            );
            progress.record_page(page_len);
            cursor.record_page(oldest_id, page_len);

            if reached_start {
                break;
            }
        }

        progress.finish();
        info!(
            "Channel {}: {} pages fetched",
            channel_id,
            cursor.pages_fetched()
        );
        Ok(ChannelHistory {
            messages,
            raw_pages,
        })
    }

    async fn fetch_page(&mut self, channel_id: u64, cursor: &MessageCursor) -> Result<Value> {
        let url = build_history_url(
            self.settings.api_base_url,
            channel_id,
            cursor.page_size(),
            cursor.before(),
        );

        let response = self.client.get(&url).await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Discord API returned status {} for channel {}",
                response.status(),
                channel_id
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to read message page for channel {}", channel_id))
    }
}

fn pagination_config(settings: &DiscordSettings) -> PaginationConfig {
    let config = PaginationConfig::new(settings.page_size);
    match settings.max_pages {
        Some(max) => config.with_max_pages(max),
        None => config,
    }
}

fn parse_message_page(raw_page: &Value) -> Result<Vec<MessageResponse>> {
    serde_json::from_value(raw_page.clone()).context("Page is not a message array")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_page_parses_into_message_responses() {
        let raw_page: Value = serde_json::from_str(
            r#"[{
                "id": "111",
                "author": {"id": "9", "username": "amy"},
                "content": "hello",
                "mentions": [{"id": "10"}],
                "timestamp": "2025-03-01T12:00:00+00:00"
            }]"#,
        )
        .unwrap();

        let page = parse_message_page(&raw_page).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "111");

        // The parsed view never mutates the raw value kept for the cache
        assert_eq!(raw_page[0]["content"], "hello");
    }

    #[test]
    fn non_array_page_is_an_error() {
        let raw_page: Value = serde_json::from_str(r#"{"message": "401: Unauthorized"}"#).unwrap();
        assert!(parse_message_page(&raw_page).is_err());
    }

    #[test]
    fn settings_max_pages_caps_the_cursor() {
        let settings = DiscordSettings {
            max_pages: Some(2),
            ..DiscordSettings::default()
        };
        let mut cursor = MessageCursor::new(pagination_config(&settings));

        cursor.record_page(Some(500), settings.page_size);
        assert!(cursor.has_more());
        cursor.record_page(Some(400), settings.page_size);
        assert!(!cursor.has_more());
    }

    #[test]
    fn default_settings_leave_paging_uncapped() {
        let config = pagination_config(&DiscordSettings::default());
        assert_eq!(config.max_pages, None);
        assert_eq!(config.page_size, 100);
    }
}
