//! The `account_type` cookie side-channel.
//!
//! Writes are asynchronous side effects: on the web they go through
//! `document.cookie` (or a server action), and the session store awaits them
//! before a login counts as successful.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use thiserror::Error;

use astexo_auth::{AccountType, AuthCookie, Environment};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CookieError {
    #[error("cookie channel unavailable: {0}")]
    Unavailable(String),

    #[error("cookie write rejected: {0}")]
    Rejected(String),
}

#[async_trait(?Send)]
pub trait CookieChannel {
    async fn set_auth_cookie(&self, account_type: AccountType) -> Result<(), CookieError>;

    async fn delete_auth_cookie(&self) -> Result<(), CookieError>;

    /// Raw cookie value as the edge guard would see it.
    fn read_auth_cookie(&self) -> Option<String>;
}

/// In-process cookie jar holding only the auth cookie. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieChannel {
    environment: Environment,
    cookie: Rc<RefCell<Option<AuthCookie>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryCookieChannel {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// The cookie with its attributes, if set.
    pub fn current(&self) -> Option<AuthCookie> {
        *self.cookie.borrow()
    }

    /// Number of set/delete calls seen so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Overwrite the cookie directly (e.g. a value left by another tab).
    pub fn inject(&self, cookie: Option<AuthCookie>) {
        *self.cookie.borrow_mut() = cookie;
    }
}

#[async_trait(?Send)]
impl CookieChannel for MemoryCookieChannel {
    async fn set_auth_cookie(&self, account_type: AccountType) -> Result<(), CookieError> {
        self.writes.set(self.writes.get() + 1);
        *self.cookie.borrow_mut() = Some(AuthCookie::new(account_type, self.environment));
        Ok(())
    }

    async fn delete_auth_cookie(&self) -> Result<(), CookieError> {
        self.writes.set(self.writes.get() + 1);
        *self.cookie.borrow_mut() = None;
        Ok(())
    }

    fn read_auth_cookie(&self) -> Option<String> {
        self.cookie.borrow().map(|c| c.value().to_string())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::DocumentCookieChannel;

#[cfg(target_arch = "wasm32")]
mod browser {
    use async_trait::async_trait;
    use wasm_bindgen::JsCast;

    use astexo_auth::{AccountType, AuthCookie, Environment, find_auth_cookie};

    use super::{CookieChannel, CookieError};

    /// Writes the auth cookie through `document.cookie`.
    #[derive(Debug, Clone, Copy)]
    pub struct DocumentCookieChannel {
        environment: Environment,
    }

    impl DocumentCookieChannel {
        pub fn new(environment: Environment) -> Self {
            Self { environment }
        }

        fn document(&self) -> Result<web_sys::HtmlDocument, CookieError> {
            web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
                .ok_or_else(|| CookieError::Unavailable("no HTML document".to_string()))
        }

        fn write(&self, header: &str) -> Result<(), CookieError> {
            self.document()?
                .set_cookie(header)
                .map_err(|e| CookieError::Rejected(format!("{e:?}")))
        }
    }

    #[async_trait(?Send)]
    impl CookieChannel for DocumentCookieChannel {
        async fn set_auth_cookie(&self, account_type: AccountType) -> Result<(), CookieError> {
            self.write(&AuthCookie::new(account_type, self.environment).to_header_value())
        }

        async fn delete_auth_cookie(&self) -> Result<(), CookieError> {
            self.write(&AuthCookie::removal_header_value(self.environment))
        }

        fn read_auth_cookie(&self) -> Option<String> {
            let all = self.document().ok()?.cookie().ok()?;
            find_auth_cookie(&all).map(str::to_string)
        }
    }
}
