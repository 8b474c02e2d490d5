//! URL validation performed before a request is offered to a performer or a
//! transport.

use url::{ParseError, Url};

use crate::error::UrlError;

/// Parse `raw` and check that it is an absolute `http`/`https` URL with a
/// non-empty host. With `secure_only`, plain `http` is rejected as well.
pub fn validate_url(raw: &str, secure_only: bool) -> Result<Url, UrlError> {
    let url = Url::parse(raw).map_err(|e| match e {
        ParseError::EmptyHost => UrlError::MissingHost,
        other => UrlError::Malformed(other.to_string()),
    })?;

    match url.scheme() {
        "https" => {}
        "http" if secure_only => return Err(UrlError::InsecureScheme),
        "http" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
