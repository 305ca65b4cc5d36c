//! Credential gate for the Buddy token and API endpoint.
//!
//! Both must be present before anything is executed; the token is registered
//! with the runner's log redaction the moment it is read.

use crate::error::Error;
use crate::github;
use tracing::info;

pub const TOKEN_VAR: &str = "BUDDY_TOKEN";
pub const ENDPOINT_VAR: &str = "BUDDY_API_ENDPOINT";

/// Where credentials come from. The process environment in production,
/// fixture values in tests.
pub trait CredentialSource {
    fn var(&self, name: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl CredentialSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

/// The two secrets `bdy` authenticates with. One check per run, no
/// persistence.
#[derive(Debug)]
pub struct Credentials {
    pub token: String,
    pub endpoint: String,
}

/// Fail with `MissingCredential` naming whichever variable is absent.
/// Masking is global and idempotent, so calling twice is safe.
pub fn check(source: &dyn CredentialSource) -> Result<Credentials, Error> {
    let token = source
        .var(TOKEN_VAR)
        .ok_or(Error::MissingCredential { name: TOKEN_VAR })?;
    let endpoint = source.var(ENDPOINT_VAR).ok_or(Error::MissingCredential {
        name: ENDPOINT_VAR,
    })?;

    github::add_mask(&token);
    info!("Buddy credentials found");

    Ok(Credentials { token, endpoint })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture(Vec<(&'static str, &'static str)>);

    impl CredentialSource for Fixture {
        fn var(&self, name: &str) -> Option<String> {
            self.0
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn both_present_returns_the_pair() {
        let source = Fixture(vec![
            (TOKEN_VAR, "tok-123"),
            (ENDPOINT_VAR, "https://api.buddy.works"),
        ]);
        let credentials = check(&source).expect("credentials present");
        assert_eq!(credentials.token, "tok-123");
        assert_eq!(credentials.endpoint, "https://api.buddy.works");
    }

    #[test]
    fn missing_token_is_named() {
        let source = Fixture(vec![(ENDPOINT_VAR, "https://api.buddy.works")]);
        let message = check(&source).expect_err("token absent").to_string();
        assert!(message.starts_with("BUDDY_TOKEN is not set."), "{message}");
    }

    #[test]
    fn missing_endpoint_is_named() {
        let source = Fixture(vec![(TOKEN_VAR, "tok-123")]);
        let message = check(&source).expect_err("endpoint absent").to_string();
        assert!(
            message.starts_with("BUDDY_API_ENDPOINT is not set."),
            "{message}"
        );
    }
}
