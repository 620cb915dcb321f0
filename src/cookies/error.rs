use thiserror::Error;

/// Failure modes of the write operations on [`Cookies`](crate::Cookies).
///
/// The `bool`-returning surface collapses all of these to `false`; the
/// `try_`-variants return them directly.
#[derive(Debug, Error)]
pub enum CookieError {
    /// The response headers were already sent; nothing was queued.
    #[error("response headers already sent")]
    HeadersAlreadySent,

    /// An expiry expression could not be parsed into a timestamp.
    #[error("unrecognized expiry expression: {0:?}")]
    InvalidExpiryFormat(String),

    /// The rendered directive is not a valid header value.
    #[error("cookie directive rejected")]
    DirectiveRejected(#[from] http::header::InvalidHeaderValue),
}
