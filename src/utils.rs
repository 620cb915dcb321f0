use http::{HeaderMap, header};

/// Host name from the `Host` header, without any port suffix.
pub(crate) fn host_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::HOST)?.to_str().ok()?;
    let host = strip_port(raw.trim());

    (!host.is_empty()).then(|| host.to_string())
}

fn strip_port(host: &str) -> &str {
    let Some((name, port)) = host.rsplit_once(':') else {
        return host;
    };

    // Bracketed IPv6 literals carry colons of their own.
    let bracketed = name.starts_with('[') && name.ends_with(']');
    if port.bytes().all(|b| b.is_ascii_digit()) && (bracketed || !name.contains(':')) {
        name
    } else {
        host
    }
}

#[cfg(test)]
mod host {
    use http::{HeaderMap, HeaderValue, header::HOST};

    use super::host_from_headers;

    fn headers(host: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_str(host).unwrap());
        headers
    }

    #[test]
    fn plain() {
        assert_eq!(
            host_from_headers(&headers("example.com")).as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn port_stripped() {
        assert_eq!(
            host_from_headers(&headers("example.com:8080")).as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn ipv6_literal() {
        assert_eq!(
            host_from_headers(&headers("[::1]:8080")).as_deref(),
            Some("[::1]")
        );
        assert_eq!(
            host_from_headers(&headers("[::1]")).as_deref(),
            Some("[::1]")
        );
    }

    #[test]
    fn missing() {
        assert_eq!(host_from_headers(&HeaderMap::new()), None);
    }
}
