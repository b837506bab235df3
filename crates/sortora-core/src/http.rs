//! Blocking JSON POST over libcurl.
//!
//! Shared by the parse client and the relay's upstream chat client. Runs in
//! the current thread; call from `spawn_blocking` if used from async code.

use std::time::Duration;

use crate::config::ClientTimeouts;

/// Status code and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// POSTs `body` as `application/json` and collects the full response body.
///
/// Follows redirects. `extra_headers` are sent as `Name: value` lines.
pub fn post_json(
    url: &str,
    body: &[u8],
    extra_headers: &[(&str, &str)],
    timeouts: ClientTimeouts,
) -> Result<HttpResponse, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.post(true)?;
    easy.post_fields_copy(body)?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(timeouts.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(timeouts.timeout_secs))?;

    let mut list = curl::easy::List::new();
    list.append("Content-Type: application/json")?;
    list.append("Accept: application/json")?;
    // No 100-continue round trip for larger bodies.
    list.append("Expect:")?;
    for (k, v) in extra_headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    easy.http_headers(list)?;

    let mut response_body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            response_body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    tracing::debug!(url, status, bytes = response_body.len(), "POST complete");
    Ok(HttpResponse {
        status,
        body: response_body,
    })
}
