use std::{
    pin::Pin,
    task::{Context, Poll, ready},
};

use axum::extract::Request;
use http::{Response, header::SET_COOKIE};
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::cookies::Cookies;

/// Builds one [`Cookies`] per request, injects it into the request
/// extensions and writes the queued directives into the response once the
/// inner service finishes.
#[derive(Clone, Default)]
pub struct CookieLayer;

impl CookieLayer {
    pub fn new() -> Self {
        CookieLayer
    }
}

impl<S> Layer<S> for CookieLayer {
    type Service = CookieService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CookieService { inner }
    }
}

#[derive(Clone)]
pub struct CookieService<S> {
    inner: S,
}

impl<IB, OB, S> Service<Request<IB>> for CookieService<S>
where
    S: Service<Request<IB>, Response = Response<OB>>,
{
    type Response = Response<OB>;

    type Error = S::Error;

    type Future = WriteCookies<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<IB>) -> Self::Future {
        let cookies = Cookies::from_headers(req.headers());
        req.extensions_mut().insert(cookies.clone());

        WriteCookies {
            future: self.inner.call(req),
            cookies,
        }
    }
}

pin_project! {
    pub struct WriteCookies<F> {
        #[pin]
        future: F,
        cookies: Cookies,
    }
}

impl<F, B, E> Future for WriteCookies<F>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    type Output = Result<Response<B>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let res = ready!(this.future.poll(cx));

        Poll::Ready(res.map(|mut res| {
            for directive in this.cookies.commit() {
                res.headers_mut().append(SET_COOKIE, directive);
            }
            res
        }))
    }
}

#[cfg(test)]
mod cookie_service {
    use std::error::Error;

    use axum::{Router, body::Body, routing::get};
    use cookie::Cookie;
    use http::{
        Request,
        header::{COOKIE, SET_COOKIE},
    };
    use tower::ServiceExt;

    use crate::cookies::{CookieLayer, Cookies, DeleteOptions};

    #[tokio::test]
    async fn set_reaches_response() -> Result<(), Box<dyn Error>> {
        let router = Router::<()>::new()
            .route(
                "/",
                get(|cookies: Cookies| async move {
                    assert!(cookies.set("session", "abc"));
                    "ok"
                }),
            )
            .layer(CookieLayer::new());

        let res = router
            .oneshot(
                Request::get("/")
                    .header("host", "example.com")
                    .body(Body::empty())?,
            )
            .await?;

        let directive = res.headers()[SET_COOKIE].to_str()?;
        let cookie = Cookie::parse_encoded(directive)?;
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.domain(), Some("example.com"));
        Ok(())
    }

    #[tokio::test]
    async fn delete_reaches_response() -> Result<(), Box<dyn Error>> {
        let router = Router::<()>::new()
            .route(
                "/",
                get(|cookies: Cookies| async move {
                    assert!(cookies.exists("old"));
                    assert!(
                        cookies.delete_with("old", &DeleteOptions::new().remove_from_request())
                    );
                    assert!(!cookies.exists("old"));
                }),
            )
            .layer(CookieLayer::new());

        let res = router
            .oneshot(
                Request::get("/")
                    .header(COOKIE, "old=1")
                    .body(Body::empty())?,
            )
            .await?;

        let directive = res.headers()[SET_COOKIE].to_str()?;
        let cookie = Cookie::parse_encoded(directive)?;
        assert_eq!(cookie.name(), "old");
        assert_eq!(cookie.value(), "");
        Ok(())
    }

    #[tokio::test]
    async fn no_writes_no_header() -> Result<(), Box<dyn Error>> {
        let router = Router::<()>::new()
            .route("/", get(|_: Cookies| async { "ok" }))
            .layer(CookieLayer::new());

        let res = router.oneshot(Request::get("/").body(Body::empty())?).await?;
        assert!(res.headers().get(SET_COOKIE).is_none());
        Ok(())
    }
}
