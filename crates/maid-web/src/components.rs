//! UI Components

use leptos::prelude::*;
use maid_core::Plan;

use crate::api::{self, UnlockStatus};
use crate::session;

/// One plan tier with its price, quota and validity
#[component]
pub fn PlanCard(
    plan: Plan,
    #[prop(into)] on_select: Callback<Plan>,
    #[prop(into)] busy: Signal<bool>,
) -> impl IntoView {
    let terms = plan.terms();
    let class = if plan == Plan::Standard { "plan featured" } else { "plan" };

    view! {
        <div class=class>
            <h2>{plan.display_name()}</h2>
            <div class="price">{format!("Rs. {}", terms.price)}</div>
            <ul>
                <li>{format!("{} maid contact(s)", terms.contact_quota)}</li>
                <li>{format!("Valid for {} days", terms.validity_days)}</li>
            </ul>
            <button
                class="btn btn-primary"
                disabled=move || busy.get()
                on:click=move |_| on_select.run(plan)
            >
                {move || if busy.get() { "Processing..." } else { "Choose Plan" }}
            </button>
        </div>
    }
}

#[derive(Clone, Debug, PartialEq)]
enum GateState {
    Checking,
    SignedOut,
    Locked,
    Unlocked(UnlockStatusView),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
struct UnlockStatusView {
    plan: Option<Plan>,
    expires_at: Option<String>,
}

impl From<UnlockStatus> for GateState {
    fn from(status: UnlockStatus) -> Self {
        if status.unlocked {
            Self::Unlocked(UnlockStatusView {
                plan: status.plan,
                expires_at: status
                    .expires_at
                    .map(|t| t.format("%Y-%m-%d").to_string()),
            })
        } else {
            Self::Locked
        }
    }
}

/// Shows `children` once the server reports the maid unlocked, `locked` otherwise
#[component]
pub fn UnlockGate(
    maid_id: String,
    #[prop(into)] locked: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let (state, set_state) = signal(GateState::Checking);

    match session::current() {
        Some(current) => {
            leptos::task::spawn_local(async move {
                let next = match api::unlock_status(&current, &maid_id).await {
                    Ok(status) => status.into(),
                    Err(e) if e.is_unauthorized() => GateState::SignedOut,
                    Err(e) => GateState::Failed(e.message),
                };
                set_state.set(next);
            });
        }
        None => set_state.set(GateState::SignedOut),
    }

    move || match state.get() {
        GateState::Checking => view! { <p class="loading">"Checking access..."</p> }.into_any(),
        GateState::Unlocked(info) => {
            let plan = info.plan.map(Plan::display_name).unwrap_or_default();
            let until = info.expires_at.unwrap_or_default();
            view! {
                <div class="unlocked">
                    <p class="badge">{format!("{plan} plan, contact visible until {until}")}</p>
                    {children()}
                </div>
            }
            .into_any()
        }
        GateState::Failed(message) => view! {
            <div class="locked">
                <p class="error">{message}</p>
                {locked.run()}
            </div>
        }
        .into_any(),
        GateState::Locked | GateState::SignedOut => locked.run(),
    }
}
