//! Single blocking GET that buffers the whole body.

use crate::error::TransferError;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

fn transport(url: &str) -> impl Fn(curl::Error) -> TransferError + '_ {
    move |source| TransferError::Transport {
        url: url.to_string(),
        source,
    }
}

/// GETs `url`, following redirects, and returns the body.
///
/// `timeout` bounds the whole request. A non-2xx final status is an
/// [`TransferError::Http`]; nothing is retried.
pub(crate) fn get_bytes(url: &str, timeout: Duration) -> Result<Vec<u8>, TransferError> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(transport(url))?;
    easy.follow_location(true).map_err(transport(url))?;
    easy.max_redirections(10).map_err(transport(url))?;
    easy.connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .map_err(transport(url))?;
    easy.timeout(timeout).map_err(transport(url))?;
    easy.useragent(concat!("ferry/", env!("CARGO_PKG_VERSION")))
        .map_err(transport(url))?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(transport(url))?;
        transfer.perform().map_err(transport(url))?;
    }

    let status = easy.response_code().map_err(transport(url))?;
    if !(200..300).contains(&status) {
        return Err(TransferError::Http {
            url: url.to_string(),
            status,
        });
    }
    tracing::debug!(url, status, bytes = body.len(), "GET complete");
    Ok(body)
}
