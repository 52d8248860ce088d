use std::collections::BTreeMap;

/// String key-value persistence supplied by the host (browser local storage in the web app).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

/// Best-effort high score kept as JSON under a single key.
pub struct HighScore;

impl HighScore {
    /// Missing or unreadable values count as zero.
    pub fn load(store: &dyn KeyValueStore, key: &str) -> u32 {
        let Some(raw) = store.get(key) else {
            return 0;
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            log::warn!("Ignoring unreadable high score under {}: {}", key, err);
            0
        })
    }

    /// Stores `score` only when it beats the stored value. Returns whether it did.
    pub fn record(store: &mut dyn KeyValueStore, key: &str, score: u32) -> bool {
        if score <= Self::load(store, key) {
            return false;
        }
        match serde_json::to_string(&score) {
            Ok(raw) => {
                log::debug!("New high score {} under {}", score, key);
                store.set(key, &raw);
                true
            }
            Err(err) => {
                log::error!("Could not encode high score: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "test:highScore";

    #[test]
    fn missing_score_is_zero() {
        assert_eq!(HighScore::load(&MemoryStore::new(), KEY), 0);
    }

    #[test]
    fn corrupt_score_is_zero() {
        let mut store = MemoryStore::new();
        store.set(KEY, "not a number");
        assert_eq!(HighScore::load(&store, KEY), 0);
    }

    #[test]
    fn only_higher_scores_are_recorded() {
        let mut store = MemoryStore::new();
        assert!(HighScore::record(&mut store, KEY, 30));
        assert!(!HighScore::record(&mut store, KEY, 20));
        assert!(!HighScore::record(&mut store, KEY, 30));
        assert_eq!(HighScore::load(&store, KEY), 30);
        assert!(HighScore::record(&mut store, KEY, 40));
        assert_eq!(store.get(KEY).as_deref(), Some("40"));
    }
}
