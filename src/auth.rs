use std::sync::Arc;

use parking_lot::RwLock;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Route of the sign-in page.
pub const SIGN_IN_PATH: &str = "/signin";
/// Route of the checkout page.
pub const CHECKOUT_PATH: &str = "/checkout";

// Same set `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Shared authentication state. Token persistence is the host's concern; this only holds the
/// bearer token for the lifetime of the process.
#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let s = Self::new();
        s.set_token(token);
        s
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        *self.token.write() = (!token.trim().is_empty()).then_some(token);
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

/// `/signin?redirect=<return_to>` with the return path percent-encoded.
pub fn sign_in_redirect(return_to: &str) -> String {
    format!(
        "{SIGN_IN_PATH}?redirect={}",
        utf8_percent_encode(return_to, COMPONENT)
    )
}

/// Where the checkout button leads: checkout when signed in, otherwise sign-in with a way back.
pub fn checkout_route(session: &Session, current_path: &str) -> String {
    if session.is_authenticated() {
        CHECKOUT_PATH.to_string()
    } else {
        sign_in_redirect(current_path)
    }
}
