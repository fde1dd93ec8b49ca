//! Credential configuration page

use axum::Form;
use axum::extract::State;
use axum::response::{Html, Redirect};
use serde::Deserialize;
use streamgate_core::UnlockCredential;

use crate::components::{base_page, button, card, input, status_badge};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct ConfigureForm {
    #[serde(default)]
    pub api_key: String,
}

pub async fn root() -> Redirect {
    Redirect::to("/configure")
}

pub async fn configure_page(State(state): State<AppState>) -> Html<String> {
    Html(render_configure(&state, None))
}

/// Stores the submitted key; an empty key clears the stored credential.
pub async fn configure_submit(
    State(state): State<AppState>,
    Form(form): Form<ConfigureForm>,
) -> Html<String> {
    let credential = UnlockCredential::new(form.api_key);
    let message = if credential.is_some() {
        "Real-Debrid key saved. Streams will be unlocked when possible."
    } else {
        "Real-Debrid key cleared. Streams fall back to peer-to-peer."
    };
    state.credentials.set(credential);

    Html(render_configure(&state, Some(message)))
}

fn render_configure(state: &AppState, message: Option<&str>) -> String {
    let notice = message
        .map(|m| format!(r#"<p class="text-green-400 mb-4">{m}</p>"#))
        .unwrap_or_default();

    let form = format!(
        r#"<form method="post" action="/configure">
            {}
            {}
        </form>"#,
        input("api_key", "Real-Debrid API key", "password", Some(r#"autocomplete="off""#)),
        button("Save", "primary", Some(r#"type="submit""#)),
    );

    let install = r#"<p class="text-gray-400">Install the addon from <a class="text-blue-400 underline" href="/manifest.json">/manifest.json</a>.</p>"#;

    let body = format!(
        r#"{notice}
        {}
        {}"#,
        card(Some("Unlock service"), &format!(
            r#"<div class="mb-4">{}</div>{form}"#,
            status_badge(state.credentials.is_configured())
        )),
        card(None, install),
    );

    base_page(&format!("{} configuration", state.addon_name), &body)
}
