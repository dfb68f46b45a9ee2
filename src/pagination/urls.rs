/// Build a channel history URL with ?limit= and an optional &before= boundary
pub fn build_history_url(
    api_base_url: &str,
    channel_id: u64,
    limit: usize,
    before: Option<u64>,
) -> String {
    let base = format!("{}/channels/{}/messages?limit={}", api_base_url, channel_id, limit);

    match before {
        Some(id) => format!("{}&before={}", base, id),
        None => base,
    }
}
