use std::borrow::Cow;

use crate::cookies::Expiry;

static DEFAULT_PATH: &str = "/";

/// Options for [`Cookies::set_with`](crate::Cookies::set_with).
///
/// Defaults: expiry [`Expiry::ONE_YEAR`], path `"/"`, domain inferred from
/// the request host.
#[derive(Debug, Clone)]
pub struct SetOptions {
    pub(crate) expiry: Expiry,
    pub(crate) path: Cow<'static, str>,
    pub(crate) domain: Option<Cow<'static, str>>,
}

impl SetOptions {
    pub fn new() -> Self {
        Self {
            expiry: Expiry::default(),
            path: Cow::Borrowed(DEFAULT_PATH),
            domain: None,
        }
    }

    pub fn expiry(mut self, expiry: impl Into<Expiry>) -> Self {
        self.expiry = expiry.into();
        self
    }

    pub fn path(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.path = path.into();
        self
    }

    pub fn domain(mut self, domain: impl Into<Cow<'static, str>>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

impl Default for SetOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for [`Cookies::delete_with`](crate::Cookies::delete_with).
#[derive(Debug, Clone)]
pub struct DeleteOptions {
    pub(crate) path: Cow<'static, str>,
    pub(crate) domain: Option<Cow<'static, str>>,
    pub(crate) remove_from_request: bool,
}

impl DeleteOptions {
    pub fn new() -> Self {
        Self {
            path: Cow::Borrowed(DEFAULT_PATH),
            domain: None,
            remove_from_request: false,
        }
    }

    pub fn path(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.path = path.into();
        self
    }

    pub fn domain(mut self, domain: impl Into<Cow<'static, str>>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Also drop the cookie from the request's local view, so later reads in
    /// this request behave as if the cookie were already gone.
    pub fn remove_from_request(mut self) -> Self {
        self.remove_from_request = true;
        self
    }
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self::new()
    }
}
