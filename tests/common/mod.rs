// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stemlab_client::client::ApiClient;
use stemlab_client::notify::{Navigator, Notifier};
use stemlab_client::storage::{MemoryTokenStore, TokenPair, TokenStore};
use wiremock::MockServer;

/// Everything the client told the user, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Event {
    Success(String),
    Error(String),
    SessionExpired,
    Redirect(String),
}

/// Notifier + navigator that records instead of displaying.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn redirects(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Redirect(_)))
            .count()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Success(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Notifier for Recorder {
    fn success(&self, message: &str) {
        self.push(Event::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Event::Error(message.to_string()));
    }

    fn session_expired(&self) {
        self.push(Event::SessionExpired);
    }
}

impl Navigator for Recorder {
    fn redirect_to_login(&self, login_path: &str) {
        self.push(Event::Redirect(login_path.to_string()));
    }
}

/// Client pointed at a mock server, with recording hooks.
#[allow(dead_code)]
pub fn test_client(
    server: &MockServer,
    store: Arc<dyn TokenStore>,
) -> (ApiClient, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let client = ApiClient::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .token_store(store)
        .notifier(recorder.clone())
        .navigator(recorder.clone())
        .build()
        .expect("client should build");
    (client, recorder)
}

/// Store holding an "old" token pair.
#[allow(dead_code)]
pub fn logged_in_store() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_tokens(&pair("old-access", "old-refresh")))
}

#[allow(dead_code)]
pub fn pair(access: &str, refresh: &str) -> TokenPair {
    TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}

/// Successful envelope around `data`.
#[allow(dead_code)]
pub fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

#[allow(dead_code)]
pub fn stored(store: &dyn TokenStore) -> (Option<String>, Option<String>) {
    (store.access_token().unwrap(), store.refresh_token().unwrap())
}
