//! Maid Details Page

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use maid_core::{MaidContact, MaidProfile, Plan};

use crate::api::{self, MaidView};
use crate::components::{PlanCard, UnlockGate};
use crate::session;

fn redirect(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(url);
    }
}

/// Plan tiers for unlocking one maid; choosing a tier starts the payment
#[component]
pub fn PlanSelector(maid_id: String) -> impl IntoView {
    // Plan whose payment is in flight
    let in_flight = RwSignal::new(None::<Plan>);
    let (error, set_error) = signal(None::<String>);

    let select = Callback::new(move |plan: Plan| {
        if in_flight.get_untracked().is_some() {
            return;
        }

        let Some(current) = session::current() else {
            redirect(&session::login_url(&maid_id, plan.as_str()));
            return;
        };

        in_flight.set(Some(plan));
        set_error.set(None);

        let maid_id = maid_id.clone();
        leptos::task::spawn_local(async move {
            match api::initiate_payment(&current, &maid_id, plan).await {
                // The page unloads; the guard stays set until then
                Ok(payment) => redirect(&payment.payment_url),
                Err(e) if e.is_unauthorized() => {
                    redirect(&session::login_url(&maid_id, plan.as_str()));
                }
                Err(e) => {
                    set_error.set(Some(e.message));
                    in_flight.set(None);
                }
            }
        });
    });

    let busy = Signal::derive(move || in_flight.get().is_some());

    view! {
        <div class="pricing">
            <h2>"Unlock contact details"</h2>
            <Show when=move || error.get().is_some()>
                <p class="error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <div class="plans">
                {Plan::ALL
                    .into_iter()
                    .map(|plan| view! { <PlanCard plan=plan on_select=select busy=busy /> })
                    .collect_view()}
            </div>
        </div>
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Profile {
    Loading,
    Loaded(Box<MaidView>),
    Failed(String),
}

/// Label and value rows for the public part of a profile
fn profile_rows(maid: &MaidProfile) -> Vec<(&'static str, String)> {
    let list = |items: &[String]| (!items.is_empty()).then(|| items.join(", "));
    [
        ("Age group", maid.age_group.clone()),
        ("Gender", maid.gender.clone()),
        ("Experience", maid.years_experience.clone()),
        ("Expected salary", maid.expected_salary.clone().map(|s| format!("Rs. {s}"))),
        ("Location", maid.preferred_location.clone()),
        ("Area", maid.specific_area.clone()),
        ("Working time", maid.preferred_working_time.clone()),
        ("Available from", maid.available_from.clone()),
        ("Nationality", maid.nationality.clone()),
        ("Education", maid.education_level.clone()),
        ("Marital status", maid.marital_status.clone()),
        ("Religion", maid.religion.clone()),
        ("Skills", list(maid.skills())),
        ("Languages", list(maid.languages())),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.filter(|v| !v.is_empty()).map(|v| (label, v)))
    .collect()
}

#[component]
fn ContactDetails(contact: Option<MaidContact>) -> impl IntoView {
    let contact = contact.unwrap_or_default();
    let email = contact.email.unwrap_or_else(|| "Not provided".into());
    let phone = contact.phone.unwrap_or_else(|| "Not provided".into());

    view! {
        <section class="contact">
            <h2>"Contact details"</h2>
            <dl>
                <dt>"Email"</dt>
                <dd>{email}</dd>
                <dt>"Phone"</dt>
                <dd>{phone}</dd>
            </dl>
        </section>
    }
}

#[component]
pub fn MaidDetailsPage() -> impl IntoView {
    let params = use_params_map();
    let maid_id = params.with_untracked(|p| p.get("id").map(|id| id.to_string()).unwrap_or_default());

    let (profile, set_profile) = signal(Profile::Loading);
    {
        let maid_id = maid_id.clone();
        leptos::task::spawn_local(async move {
            let current = session::current();
            let next = match api::get_maid(current.as_ref(), &maid_id).await {
                Ok(loaded) => Profile::Loaded(Box::new(loaded)),
                // A stale session still gets the public profile
                Err(e) if e.is_unauthorized() => match api::get_maid(None, &maid_id).await {
                    Ok(loaded) => Profile::Loaded(Box::new(loaded)),
                    Err(e) => Profile::Failed(e.message),
                },
                Err(e) => Profile::Failed(e.message),
            };
            set_profile.set(next);
        });
    }

    move || match profile.get() {
        Profile::Loading => view! { <p class="loading">"Loading profile..."</p> }.into_any(),
        Profile::Failed(message) => view! {
            <div class="error">
                <p>{message}</p>
                <a href="/maids" class="btn">"Back to maids"</a>
            </div>
        }
        .into_any(),
        Profile::Loaded(loaded) => {
            let MaidView { profile, contact } = *loaded;
            let selector_id = maid_id.clone();
            view! {
                <div class="maid-details">
                    {profile
                        .photo_url
                        .clone()
                        .map(|src| view! { <img class="photo" src=src alt=profile.full_name.clone() /> })}
                    <h1>{profile.full_name.clone()}</h1>
                    {profile.about_me.clone().map(|about| view! { <p class="about">{about}</p> })}
                    <dl class="profile">
                        {profile_rows(&profile)
                            .into_iter()
                            .map(|(label, value)| view! { <dt>{label}</dt><dd>{value}</dd> })
                            .collect_view()}
                    </dl>
                    <UnlockGate
                        maid_id=maid_id.clone()
                        locked=move || view! { <PlanSelector maid_id=selector_id.clone() /> }
                    >
                        <ContactDetails contact=contact.clone() />
                    </UnlockGate>
                </div>
            }
            .into_any()
        }
    }
}
