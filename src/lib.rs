pub mod cookies;

pub(crate) mod utils;

pub use cookies::{
    CookieError, CookieLayer, CookieService, Cookies, DeleteOptions, Expiry, SetOptions,
};
