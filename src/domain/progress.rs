use log::info;

const LOG_EVERY: usize = 1000;

/// Track progress of a channel history fetch
pub struct FetchProgress {
    channel_name: String,
    messages: usize,
    pages: usize,
}

impl FetchProgress {
    pub fn new(channel_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
            messages: 0,
            pages: 0,
        }
    }

    pub fn record_page(&mut self, message_count: usize) {
        let before = self.messages;
        self.messages += message_count;
        self.pages += 1;

        if crossed_milestone(before, self.messages) {
            info!(
                "  → #{}: {} messages fetched ({} pages)",
                self.channel_name, self.messages, self.pages
            );
        }
    }

    pub fn total_messages(&self) -> usize {
        self.messages
    }

    pub fn finish(&self) {
        info!(
            "  → #{}: done, {} messages in {} pages",
            self.channel_name, self.messages, self.pages
        );
    }
}

fn crossed_milestone(before: usize, after: usize) -> bool {
    before / LOG_EVERY != after / LOG_EVERY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestone_detection() {
        assert!(crossed_milestone(900, 1100));
        assert!(!crossed_milestone(100, 200));
        assert!(crossed_milestone(1999, 2000));
    }

    #[test]
    fn pages_accumulate_messages() {
        let mut progress = FetchProgress::new("general");
        progress.record_page(100);
        progress.record_page(37);
        assert_eq!(progress.total_messages(), 137);
    }
}
