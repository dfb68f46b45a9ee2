use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based cache for fetched API data, keyed by wrapped year.
///
/// Two tiers: `raw/` holds full API responses exactly as returned (so domain
/// structs can change without refetching), `parsed/` holds deserialized
/// domain models ready for processing.
pub struct Cache {
    raw_dir: PathBuf,
    parsed_dir: PathBuf,
}

impl Cache {
    /// Open (and create if needed) the cache for one wrapped year
    pub fn for_year<P: AsRef<Path>>(base_dir: P, year: i32) -> Result<Self> {
        let year_dir = base_dir.as_ref().join(year.to_string());
        let raw_dir = year_dir.join("raw");
        let parsed_dir = year_dir.join("parsed");

        fs::create_dir_all(&raw_dir).context("Failed to create raw cache directory")?;
        fs::create_dir_all(&parsed_dir).context("Failed to create parsed cache directory")?;

        Ok(Self {
            raw_dir,
            parsed_dir,
        })
    }

    /// Save a raw API response to cache
    pub fn save_raw(&self, key: &str, data: &Value) -> Result<()> {
        let file_path = self.build_raw_path(key);
        self.write_json(&file_path, data)?;
        info!("Saved raw data to cache: {}", file_path.display());
        Ok(())
    }

    /// Load a raw API response from cache
    pub fn load_raw(&self, key: &str) -> Result<Option<Value>> {
        self.read_json_opt(&self.build_raw_path(key))
    }

    /// Save parsed data to cache
    pub fn save_parsed<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let file_path = self.build_parsed_path(key);
        self.write_json(&file_path, data)?;
        info!("Saved parsed data to cache: {}", file_path.display());
        Ok(())
    }

    /// Load parsed data from cache
    pub fn load_parsed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        self.read_json_opt(&self.build_parsed_path(key))
    }

    pub fn has_raw(&self, key: &str) -> bool {
        self.build_raw_path(key).exists()
    }

    // --- Helper Methods ---

    fn build_raw_path(&self, key: &str) -> PathBuf {
        self.raw_dir.join(format!("{}.json", key))
    }

    fn build_parsed_path(&self, key: &str) -> PathBuf {
        self.parsed_dir.join(format!("{}.json", key))
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
        fs::write(path, json).context("Failed to write cache file")?;
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
        Ok(Some(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache(name: &str) -> Cache {
        let dir = std::env::temp_dir().join(format!("guild_wrapped_cache_{name}"));
        let _ = fs::remove_dir_all(&dir);
        Cache::for_year(&dir, 2025).unwrap()
    }

    #[test]
    fn parsed_roundtrip() {
        let cache = temp_cache("parsed_roundtrip");
        cache.save_parsed("numbers", &vec![1, 2, 3]).unwrap();

        let loaded: Option<Vec<i32>> = cache.load_parsed("numbers").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn raw_channel_pages_roundtrip() {
        let cache = temp_cache("raw_channel_pages");
        let pages: Value = serde_json::json!([
            [{"id": "222", "content": "2/6:"}],
            [{"id": "111", "content": "X/6:"}]
        ]);
        cache.save_raw("discord_channel_42", &pages).unwrap();

        let loaded = cache.load_raw("discord_channel_42").unwrap();
        assert_eq!(loaded, Some(pages));
        assert!(cache.has_raw("discord_channel_42"));
    }

    #[test]
    fn missing_key_is_none() {
        let cache = temp_cache("missing_key");
        let loaded: Option<Vec<i32>> = cache.load_parsed("nope").unwrap();
        assert!(loaded.is_none());
        assert!(!cache.has_raw("nope"));
    }
}
