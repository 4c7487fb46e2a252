//! Mapping of transport errors to [`ServiceError`].

use kestrel_types::ServiceError;

/// Map a [`reqwest::Error`] to a [`ServiceError`].
///
/// Timeouts get their own category; everything else is a network
/// error with the original error as source. Nothing is retried here.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Network(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connection_refused_maps_to_network() {
        // Port 1 is never listening.
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/api/generate")
            .send()
            .await
            .unwrap_err();

        assert!(matches!(map_reqwest_error(err), ServiceError::Network(_)));
    }
}
