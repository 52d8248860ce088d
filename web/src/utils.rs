use chrono::prelude::*;
use gloo::storage::{LocalStorage, Storage};
use retrodesk_core::{KeyValueStore, Result, TickOutcome};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Local storage slot of a persisted value.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
}

impl<T> LocalOrDefault for T
where
    T: StorageKey + DeserializeOwned + Default,
{
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_else(|err| {
            log::debug!("Nothing usable under {}: {:?}", T::KEY, err);
            T::default()
        })
    }
}

impl<T> LocalOrDefault for Option<T>
where
    T: StorageKey + DeserializeOwned,
{
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).ok()
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T> LocalSave for T
where
    T: StorageKey + Serialize,
{
    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("Could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

impl<T> LocalSave for Option<T>
where
    T: StorageKey + Serialize,
{
    fn local_save(&self) {
        match self {
            Some(value) => value.local_save(),
            None => LocalStorage::delete(T::KEY),
        }
    }
}

/// [`KeyValueStore`] over the browser's local storage, values are kept as raw strings.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = LocalStorage::raw().set_item(key, value) {
            log::error!("Could not write {}: {:?}", key, err);
        }
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes(std::array::from_fn(|_| (256. * random()) as u8))
}

/// A forced seed when one was given on the command line, a random one otherwise.
pub(crate) fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(js_random_seed)
}

pub(crate) fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(now_ms() as i64).unwrap_or_default()
}

pub(crate) trait HasUpdate {
    fn has_update(self) -> bool;
}

macro_rules! impl_has_update {
    ($($outcome:ty),* $(,)?) => {
        $(
            impl<E> HasUpdate for core::result::Result<$outcome, E> {
                fn has_update(self) -> bool {
                    self.is_ok_and(|outcome| outcome.has_update())
                }
            }
        )*
    };
}

impl_has_update!(
    TickOutcome,
    retrodesk_core::minesweeper::RevealOutcome,
    retrodesk_core::minesweeper::FlagOutcome,
    retrodesk_core::solitaire::DrawOutcome,
    retrodesk_core::solitaire::MoveOutcome,
    retrodesk_core::tetris::PieceOutcome,
);

/// Logs a rejected move at trace level and reports whether anything changed.
pub(crate) fn log_rejection<T>(action: &str, result: Result<T>) -> bool
where
    Result<T>: HasUpdate,
{
    if let Err(err) = &result {
        log::trace!("{} rejected: {}", action, err);
    }
    result.has_update()
}

/// Seven-segment style counter, clamped to three digits.
pub(crate) fn format_for_counter(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use retrodesk_core::HighScore;
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn browser_store_keeps_high_scores() {
        let mut store = BrowserStore;
        let key = "retrodesk:test:highScore";
        store.set(key, "12");
        assert_eq!(HighScore::load(&store, key), 12);
        assert!(!HighScore::record(&mut store, key, 5));
        assert!(HighScore::record(&mut store, key, 30));
        assert_eq!(store.get(key).as_deref(), Some("30"));
    }

    #[wasm_bindgen_test]
    fn forced_seed_wins_over_random() {
        assert_eq!(seed_or_random(Some(7)), 7);
        assert!(utc_now().timestamp() > 0);
    }
}
