//! Login Page
//!
//! Reached from the plan selector with `returnUrl`, `maid_id` and `plan` in
//! the query so the user lands back on the maid they were unlocking.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::api;
use crate::session;

#[component]
pub fn LoginPage() -> impl IntoView {
    let query = use_query_map();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let (error, set_error) = signal(None::<String>);

    let target = query.with_untracked(|q| session::after_login(|key| q.get(key).map(|v| v.to_string())));

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }

        let (email, password) = (email.get_untracked(), password.get_untracked());
        if email.trim().is_empty() || password.is_empty() {
            set_error.set(Some("Email and password are required".into()));
            return;
        }

        busy.set(true);
        set_error.set(None);

        let navigate = navigate.clone();
        let target = target.clone();
        leptos::task::spawn_local(async move {
            match api::login(email.trim(), &password).await {
                Ok(signed_in) if session::store(&signed_in.access_token, &signed_in.user_id) => {
                    navigate(&target, Default::default());
                }
                Ok(_) => {
                    set_error.set(Some("Could not save your session in this browser".into()));
                    busy.set(false);
                }
                Err(e) => {
                    set_error.set(Some(e.message));
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="login">
            <h1>"Sign in"</h1>
            <Show when=move || error.get().is_some()>
                <p class="error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <form on:submit=submit>
                <label>
                    "Email"
                    <input type="email" autocomplete="email" bind:value=email />
                </label>
                <label>
                    "Password"
                    <input type="password" autocomplete="current-password" bind:value=password />
                </label>
                <button class="btn btn-primary" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
