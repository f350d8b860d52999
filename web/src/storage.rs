use gloo::utils::window;
use memoria_core::{KeyValueStore, StoreError};
use wasm_bindgen::JsValue;

/// Browser local storage as a plain string store.
///
/// Unlike [`gloo::storage::LocalStorage`] this never throws when storage is disabled, it reports
/// [`StoreError::Unavailable`] instead.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalStore;

fn unavailable(err: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{:?}", err))
}

impl LocalStore {
    fn with_storage<T>(
        f: impl FnOnce(&web_sys::Storage) -> Result<T, JsValue>,
    ) -> Result<T, StoreError> {
        let storage = window()
            .local_storage()
            .map_err(unavailable)?
            .ok_or_else(|| StoreError::Unavailable("local storage is disabled".to_string()))?;
        f(&storage).map_err(unavailable)
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::with_storage(|storage| storage.get_item(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::with_storage(|storage| storage.set_item(key, value)).map_err(|err| {
            StoreError::WriteFailed {
                key: key.to_string(),
                reason: err.to_string(),
            }
        })
    }
}
