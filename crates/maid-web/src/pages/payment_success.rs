//! Payment Completion Page
//!
//! Khalti redirects here with `pidx` (and friends) in the query string,
//! next to the `maid_id` and `plan` we put in the return URL.

use std::time::Duration;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};
use maid_core::Plan;

use crate::api;
use crate::session;

#[derive(Clone, Debug, PartialEq)]
enum Progress {
    Verifying,
    Verified { plan: Plan, until: String },
    Failed(String),
}

/// Return-URL parameters the verification needs
struct ReturnParams {
    token: String,
    maid_id: String,
    plan: Plan,
}

fn read_callback(get: impl Fn(&str) -> Option<String>) -> Result<ReturnParams, String> {
    let token = get("token")
        .or_else(|| get("pidx"))
        .filter(|t| !t.is_empty())
        .ok_or("Missing payment token")?;
    let maid_id = get("maid_id")
        .filter(|m| !m.is_empty())
        .ok_or("Missing maid id")?;
    let plan = get("plan")
        .ok_or("Missing plan")?
        .parse::<Plan>()
        .map_err(|e| e.user_message())?;

    Ok(ReturnParams { token, maid_id, plan })
}

#[component]
pub fn PaymentSuccessPage() -> impl IntoView {
    let query = use_query_map();
    let navigate = use_navigate();
    let (progress, set_progress) = signal(Progress::Verifying);

    let params = query.with_untracked(|q| read_callback(|key| q.get(key).map(|v| v.to_string())));

    match (params, session::current()) {
        (Err(message), _) => set_progress.set(Progress::Failed(message)),
        (Ok(_), None) => set_progress.set(Progress::Failed(
            "Your session has expired. Please log in again.".into(),
        )),
        (Ok(params), Some(current)) => {
            // One attempt; a failure sends the user back to the plan selector
            leptos::task::spawn_local(async move {
                match api::verify_payment(&params.token, &params.maid_id, params.plan, &current.user_id).await {
                    Ok(payment) if payment.status == "Completed" => {
                        set_progress.set(Progress::Verified {
                            plan: payment.payment_record.plan_type,
                            until: payment.payment_record.expires_at.format("%Y-%m-%d").to_string(),
                        });
                        let target = format!("/maids/{}", params.maid_id);
                        set_timeout(move || navigate(&target, Default::default()), Duration::from_secs(2));
                    }
                    Ok(payment) => set_progress.set(Progress::Failed(format!(
                        "Payment status: {}",
                        payment.status
                    ))),
                    Err(e) => set_progress.set(Progress::Failed(e.message)),
                }
            });
        }
    }

    view! {
        <div class="payment-success">
            {move || match progress.get() {
                Progress::Verifying => view! {
                    <p class="loading">"Verifying your payment..."</p>
                }
                .into_any(),
                Progress::Verified { plan, until } => view! {
                    <div class="success">
                        <h1>"Payment successful"</h1>
                        <p>{format!("{} plan active until {until}. Taking you back to the profile...", plan.display_name())}</p>
                    </div>
                }
                .into_any(),
                Progress::Failed(message) => view! {
                    <div class="error">
                        <h1>"Payment could not be verified"</h1>
                        <p>{message}</p>
                        <a href="/maids" class="btn">"Back to maids"</a>
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
