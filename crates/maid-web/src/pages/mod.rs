//! Page Components

mod find_maids;
mod home;
mod login;
mod maid_details;
mod payment_success;

pub use find_maids::FindMaidsPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use maid_details::MaidDetailsPage;
pub use payment_success::PaymentSuccessPage;
