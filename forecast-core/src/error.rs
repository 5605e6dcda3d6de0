use thiserror::Error;

/// Every way a single `load_forecast` call can fail.
///
/// `Display` is the message shown to the user, so the variants carry
/// exactly the text the presentation layer prints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// The connectivity gate reported no usable network; no request was made.
    #[error("No Internet connection")]
    NoConnectivity,

    /// The provider matched no location for the query (HTTP 404).
    #[error("Please, input a valid city name")]
    NotFound,

    /// Any other non-success outcome of the HTTP exchange.
    #[error("{0}")]
    Transport(String),

    /// The response body could not be decoded into the raw forecast shape.
    #[error("Malformed forecast payload: {0}")]
    MalformedPayload(String),
}

impl ForecastError {
    /// Short machine-friendly name of the failure kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::NoConnectivity => "no_connectivity",
            ForecastError::NotFound => "not_found",
            ForecastError::Transport(_) => "transport",
            ForecastError::MalformedPayload(_) => "malformed_payload",
        }
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        ForecastError::Transport(err.to_string())
    }
}

impl From<quick_xml::DeError> for ForecastError {
    fn from(err: quick_xml::DeError) -> Self {
        ForecastError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages() {
        assert_eq!(ForecastError::NoConnectivity.to_string(), "No Internet connection");
        assert_eq!(ForecastError::NotFound.to_string(), "Please, input a valid city name");
        assert_eq!(ForecastError::Transport("Unauthorized".into()).to_string(), "Unauthorized");
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            ForecastError::NoConnectivity.kind(),
            ForecastError::NotFound.kind(),
            ForecastError::Transport(String::new()).kind(),
            ForecastError::MalformedPayload(String::new()).kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
