//! Shared test utilities for rpmsmith tests.

use rpmsmith::config::Config;
use serde_json::json;

/// A full build configuration exercising every shipped extension except
/// file_extras.
pub fn fixture_config() -> Config {
    Config::from_value(json!({
        "extensions": {
            "enabled": [
                "description_text",
                "python_venv",
                "file_permissions",
                "blocks"
            ]
        },
        "core": {
            "group": "Application/System",
            "license": "Apache2",
            "name": "test-pkg",
            "release": "1",
            "source": "test-pkg",
            "summary": "test pkg for testing",
            "version": "1.2.3.4"
        },
        "file_permissions": {
            "group": "vagrant",
            "user": "vagrant"
        },
        "python_venv": {
            "cmd": "virtualenv",
            "name": "test-pkg-venv",
            "path": "/usr/share/python",
            "python": "python3.11"
        },
        "description_text": {
            "text": "test pkg description"
        },
        "blocks": {
            "post": ["echo 'Hello'"]
        }
    }))
    .expect("fixture config is a valid object")
}

/// Turn a list of extension names into the requested-whitelist form.
pub fn requested(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
