//! Browser session
//!
//! The login page stores the auth service's access token and user id in
//! `localStorage`; everything else reads them from here.

use web_sys::Storage;

const ACCESS_TOKEN_KEY: &str = "maid_hire.access_token";
const USER_ID_KEY: &str = "maid_hire.user_id";

/// Signed-in user as seen by the browser
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
}

fn storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn read(storage: &Storage, key: &str) -> Option<String> {
    storage
        .get_item(key)
        .ok()
        .flatten()
        .filter(|v| !v.is_empty())
}

/// Current session, if the user is signed in
pub fn current() -> Option<Session> {
    let storage = storage()?;
    Some(Session {
        access_token: read(&storage, ACCESS_TOKEN_KEY)?,
        user_id: read(&storage, USER_ID_KEY)?,
    })
}

/// Remember a signed-in user; false when storage is unavailable
pub fn store(access_token: &str, user_id: &str) -> bool {
    storage().is_some_and(|storage| {
        storage.set_item(ACCESS_TOKEN_KEY, access_token).is_ok()
            && storage.set_item(USER_ID_KEY, user_id).is_ok()
    })
}

/// Where to go after signing in
///
/// A pending plan choice wins; otherwise `returnUrl` if it stays on this
/// site, else the home page.
pub fn after_login(get: impl Fn(&str) -> Option<String>) -> String {
    let present = |key| get(key).filter(|v| !v.is_empty());

    if let (Some(maid_id), Some(plan)) = (present("maid_id"), present("plan")) {
        return format!("/maids/{maid_id}?plan={plan}");
    }

    present("returnUrl")
        .filter(|url| url.starts_with('/') && !url.starts_with("//"))
        .unwrap_or_else(|| "/".into())
}

/// Origin of the page, e.g. `https://maids.example.com`
pub fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into())
}

/// Login URL that brings the user back to this maid and plan afterwards
pub fn login_url(maid_id: &str, plan: &str) -> String {
    let return_url = format!("/maids/{maid_id}");
    reqwest::Url::parse_with_params(
        &format!("{}/login", origin()),
        &[("returnUrl", return_url.as_str()), ("maid_id", maid_id), ("plan", plan)],
    )
    .map_or_else(
        |_| "/login".into(),
        |url| format!("{}?{}", url.path(), url.query().unwrap_or_default()),
    )
}
