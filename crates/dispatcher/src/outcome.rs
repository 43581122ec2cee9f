//! Lookup requests and classified outcomes

use contracts::{ContractError, Coordinates, FailureClass};

/// A lookup handed to each provider of a chain in turn
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    /// Forward lookup of a free-form address
    Geocode(&'a str),
    /// Reverse lookup of a coordinate pair
    Reverse(Coordinates),
}

impl Lookup<'_> {
    /// Operation label for logs and metrics
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Geocode(_) => "geocode",
            Self::Reverse(_) => "reverse",
        }
    }

    /// Message of the aggregate error raised when every provider failed
    pub fn no_result_message(&self) -> String {
        match self {
            Self::Geocode(address) => {
                format!("No provider could provide the address \"{address}\"")
            }
            Self::Reverse(coordinates) => {
                let encoded = serde_json::to_string(coordinates)
                    .unwrap_or_else(|_| coordinates.to_string());
                format!("No provider could provide the coordinates {encoded}")
            }
        }
    }
}

/// Classified result of one provider call
#[derive(Debug)]
pub enum Outcome<T> {
    /// Provider answered; the chain stops here
    Success(T),
    /// Fatal; propagated unchanged
    InvalidCredentials(ContractError),
    /// Recorded, provider excluded from later calls
    QuotaExceeded(ContractError),
    /// Recorded, next provider is tried
    Failed(ContractError),
}

impl<T> Outcome<T> {
    /// Status label for logs and metrics
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::InvalidCredentials(_) => FailureClass::InvalidCredentials.as_str(),
            Self::QuotaExceeded(_) => FailureClass::QuotaExceeded.as_str(),
            Self::Failed(_) => FailureClass::Other.as_str(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&ContractError> {
        match self {
            Self::Success(_) => None,
            Self::InvalidCredentials(e) | Self::QuotaExceeded(e) | Self::Failed(e) => Some(e),
        }
    }
}

impl<T> From<Result<T, ContractError>> for Outcome<T> {
    fn from(result: Result<T, ContractError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => match e.failure_class() {
                FailureClass::InvalidCredentials => Self::InvalidCredentials(e),
                FailureClass::QuotaExceeded => Self::QuotaExceeded(e),
                FailureClass::Other => Self::Failed(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let ok: Outcome<u8> = Ok(1).into();
        assert!(ok.is_success());
        assert!(ok.error().is_none());

        let creds: Outcome<u8> = Err(ContractError::invalid_credentials("a", "bad key")).into();
        assert!(matches!(creds, Outcome::InvalidCredentials(_)));
        assert_eq!(creds.status(), "invalid_credentials");

        let quota: Outcome<u8> = Err(ContractError::quota_exceeded("a", "limit")).into();
        assert!(matches!(quota, Outcome::QuotaExceeded(_)));

        let other: Outcome<u8> = Err(ContractError::no_result("a", "nothing")).into();
        assert!(matches!(other, Outcome::Failed(_)));
        assert_eq!(other.status(), "other");
    }

    #[test]
    fn test_no_result_messages() {
        assert_eq!(
            Lookup::Geocode("Paris").no_result_message(),
            "No provider could provide the address \"Paris\""
        );
        assert_eq!(
            Lookup::Reverse(Coordinates::new(48.5, 2.25)).no_result_message(),
            "No provider could provide the coordinates {\"latitude\":48.5,\"longitude\":2.25}"
        );
    }
}
