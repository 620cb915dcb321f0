mod error;
mod expiry;
mod extract;
mod options;
mod service;

use std::{
    collections::HashMap,
    mem,
    sync::{Arc, Mutex, MutexGuard},
};

use cookie::Expiration;
use http::{HeaderMap, HeaderValue, header::COOKIE};
use time::{Duration, OffsetDateTime};

pub use cookie::Cookie;
pub use error::CookieError;
pub use expiry::Expiry;
pub use options::{DeleteOptions, SetOptions};
pub use service::{CookieLayer, CookieService};

/// Per-request cookie accessor.
///
/// Reads come from the request's `Cookie` headers; writes queue `Set-Cookie`
/// directives that [`CookieService`] drains into the response once the inner
/// service finishes. Cloning is cheap and every clone observes the same
/// request-scoped state.
pub struct Cookies(Arc<Mutex<CookiesInner>>);

struct CookiesInner {
    incoming: HashMap<String, String>,
    queued: Vec<HeaderValue>,
    sent: bool,
    host: Option<String>,
}

impl Cookies {
    /// An accessor with no incoming cookies, for use outside a request.
    pub fn new(host: Option<String>) -> Self {
        Self::with_incoming(HashMap::new(), host)
    }

    /// Builds the accessor from request headers: every `Cookie` header is
    /// parsed (URL-decoded) and the `Host` header supplies the default
    /// domain for writes.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut incoming = HashMap::new();

        for value in headers.get_all(COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            for cookie in Cookie::split_parse_encoded(value).flatten() {
                incoming.insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }

        Self::with_incoming(incoming, crate::utils::host_from_headers(headers))
    }

    fn with_incoming(incoming: HashMap<String, String>, host: Option<String>) -> Self {
        Cookies(Arc::new(Mutex::new(CookiesInner {
            incoming,
            queued: Vec::new(),
            sent: false,
            host,
        })))
    }

    /// True if the request carries a cookie with this name.
    pub fn exists(&self, name: &str) -> bool {
        self.lock().incoming.contains_key(name)
    }

    /// True if the cookie is absent or holds a value treated as empty:
    /// `""`, `"0"`, `"false"` or `"null"` (the latter two case-insensitive).
    pub fn is_empty(&self, name: &str) -> bool {
        match self.lock().incoming.get(name) {
            Some(value) => is_empty_value(value),
            None => true,
        }
    }

    /// The cookie's value, or `""` when absent.
    pub fn get(&self, name: &str) -> String {
        self.get_or(name, "")
    }

    /// The cookie's value, or the given default when absent.
    pub fn get_or(&self, name: &str, default: &str) -> String {
        self.lock()
            .incoming
            .get(name)
            .map_or_else(|| default.to_string(), Clone::clone)
    }

    /// Sets a cookie with the default options: expires in one year, path
    /// `"/"`, domain inferred from the request host.
    ///
    /// Returns false when the directive could not be queued.
    pub fn set(&self, name: &str, value: &str) -> bool {
        self.set_with(name, value, &SetOptions::new())
    }

    pub fn set_with(&self, name: &str, value: &str, opts: &SetOptions) -> bool {
        self.try_set_with(name, value, opts).is_ok()
    }

    /// Queues a `Set-Cookie` directive and updates the local view so later
    /// reads in this request observe the new value.
    pub fn try_set_with(
        &self,
        name: &str,
        value: &str,
        opts: &SetOptions,
    ) -> Result<(), CookieError> {
        let mut inner = self.lock();
        if inner.sent {
            return Err(CookieError::HeadersAlreadySent);
        }

        let expires = opts.expiry.resolve(OffsetDateTime::now_utc())?;

        let mut builder = Cookie::build((name, value)).path(opts.path.clone());
        if let Some(domain) = opts.domain.clone().or_else(|| inner.host.clone().map(Into::into)) {
            builder = builder.domain(domain);
        }
        let cookie = match expires {
            Some(at) => builder.expires(at),
            None => builder.expires(Expiration::Session),
        }
        .build();

        let directive = encode_directive(&cookie)?;
        inner.queued.push(directive);
        inner.incoming.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Tells the client to drop the cookie: path `"/"`, domain inferred from
    /// the request host, local view untouched.
    ///
    /// Returns false when the directive could not be queued.
    pub fn delete(&self, name: &str) -> bool {
        self.delete_with(name, &DeleteOptions::new())
    }

    pub fn delete_with(&self, name: &str, opts: &DeleteOptions) -> bool {
        self.try_delete_with(name, opts).is_ok()
    }

    /// Queues a directive with an empty value and an expiration in the past.
    pub fn try_delete_with(&self, name: &str, opts: &DeleteOptions) -> Result<(), CookieError> {
        let mut inner = self.lock();
        if inner.sent {
            return Err(CookieError::HeadersAlreadySent);
        }

        let expired_at = OffsetDateTime::now_utc() - Duration::hours(1);

        let mut builder = Cookie::build((name, "")).path(opts.path.clone()).expires(expired_at);
        if let Some(domain) = opts.domain.clone().or_else(|| inner.host.clone().map(Into::into)) {
            builder = builder.domain(domain);
        }

        let directive = encode_directive(&builder.build())?;
        inner.queued.push(directive);
        if opts.remove_from_request {
            inner.incoming.remove(name);
        }
        Ok(())
    }

    /// Whether the response headers were already sent. Writes after this
    /// point do nothing and report failure.
    pub fn headers_sent(&self) -> bool {
        self.lock().sent
    }

    /// Marks the response headers as sent and drains the queued directives
    /// in insertion order. Later calls return nothing.
    pub fn commit(&self) -> Vec<HeaderValue> {
        let mut inner = self.lock();
        inner.sent = true;
        mem::take(&mut inner.queued)
    }

    /// The host used as default domain for writes, if one is known.
    pub fn host(&self) -> Option<String> {
        self.lock().host.clone()
    }

    fn lock(&self) -> MutexGuard<'_, CookiesInner> {
        self.0.lock().expect("cookie state lock poisoned")
    }
}

impl Clone for Cookies {
    fn clone(&self) -> Self {
        Cookies(self.0.clone())
    }
}

fn is_empty_value(value: &str) -> bool {
    value.is_empty()
        || value == "0"
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("null")
}

fn encode_directive(cookie: &Cookie<'_>) -> Result<HeaderValue, CookieError> {
    Ok(HeaderValue::from_str(&cookie.encoded().to_string())?)
}
