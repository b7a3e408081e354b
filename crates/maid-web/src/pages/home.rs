//! Home Page

use leptos::prelude::*;
use maid_core::Plan;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"maid-hire"</h1>
                <p class="tagline">"Find trusted household help across Nepal"</p>
                <a href="/maids" class="btn btn-primary">"Browse maids"</a>
            </header>

            <section class="features">
                {Plan::ALL
                    .into_iter()
                    .map(|plan| {
                        let terms = plan.terms();
                        view! {
                            <div class="feature">
                                <h3>{plan.display_name()}</h3>
                                <p>
                                    {format!(
                                        "Rs. {} unlocks {} contact(s) for {} days",
                                        terms.price,
                                        terms.contact_quota,
                                        terms.validity_days,
                                    )}
                                </p>
                            </div>
                        }
                    })
                    .collect_view()}
            </section>
        </div>
    }
}
