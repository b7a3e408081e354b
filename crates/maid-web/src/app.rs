//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{FindMaidsPage, HomePage, LoginPage, MaidDetailsPage, PaymentSuccessPage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/maids") view=FindMaidsPage />
                    <Route path=path!("/maids/:id") view=MaidDetailsPage />
                    <Route path=path!("/payment/success") view=PaymentSuccessPage />
                </Routes>
            </main>
        </Router>
    }
}
