//! Browser-backed storage and navigation

#![cfg(target_arch = "wasm32")]

use arrosage_frontend_common::auth::{BrowserStorage, SessionStorage};
use arrosage_frontend_common::config::{AuthConfig, FrontendConfig};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_local_storage_round_trip() {
    let storage = BrowserStorage;
    storage
        .set_item(AuthConfig::ACCESS_TOKEN_KEY, "browser-token")
        .unwrap();

    assert_eq!(
        storage.get_item(AuthConfig::ACCESS_TOKEN_KEY).as_deref(),
        Some("browser-token")
    );

    storage.remove_item(AuthConfig::ACCESS_TOKEN_KEY);
    assert!(storage.get_item(AuthConfig::ACCESS_TOKEN_KEY).is_none());
}

#[wasm_bindgen_test]
fn test_base_url_defaults_to_page_origin() {
    let origin = gloo::utils::window().location().origin().unwrap();
    assert_eq!(FrontendConfig::from_env().api_base_url, origin);
}

#[wasm_bindgen_test]
fn test_removing_session_keys_clears_them() {
    let storage = BrowserStorage;
    for key in AuthConfig::SESSION_KEYS {
        storage.set_item(key, "value").unwrap();
    }

    for key in AuthConfig::SESSION_KEYS {
        storage.remove_item(key);
        // Removing an absent key is not an error
        storage.remove_item(key);
    }

    assert!(
        AuthConfig::SESSION_KEYS
            .iter()
            .all(|key| storage.get_item(key).is_none())
    );
}
