//! `quotevault://` links opened by the recovery e-mail and the widget.

use std::fmt;

use quotevault_shared::constants::{HOST_QUOTE_OF_THE_DAY, HOST_RESET_PASSWORD, URL_SCHEME};
use quotevault_shared::{Field, QuoteVaultError, Result};
use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    /// Carries the one-time code to exchange for a recovery session.
    ResetPassword { code: String },
    QuoteOfTheDay,
}

impl DeepLink {
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim())
            .map_err(|e| QuoteVaultError::validation(Field::Url, format!("Invalid link: {e}")))?;
        if url.scheme() != URL_SCHEME {
            return Err(QuoteVaultError::validation(
                Field::Url,
                format!("Unsupported link scheme: {}", url.scheme()),
            ));
        }

        match url.host_str() {
            Some(HOST_RESET_PASSWORD) => {
                let param = |name: &str| {
                    url.query_pairs()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| v.into_owned())
                };
                if let Some(description) = param("error_description") {
                    return Err(QuoteVaultError::validation(Field::Code, description));
                }
                match param("code").filter(|c| !c.is_empty()) {
                    Some(code) => Ok(Self::ResetPassword { code }),
                    None => Err(QuoteVaultError::validation(
                        Field::Code,
                        "Reset link is missing its code",
                    )),
                }
            }
            Some(HOST_QUOTE_OF_THE_DAY) => Ok(Self::QuoteOfTheDay),
            other => Err(QuoteVaultError::validation(
                Field::Url,
                format!("Unknown link target: {}", other.unwrap_or("")),
            )),
        }
    }

    pub fn to_url(&self) -> Result<Url> {
        let host = match self {
            Self::ResetPassword { .. } => HOST_RESET_PASSWORD,
            Self::QuoteOfTheDay => HOST_QUOTE_OF_THE_DAY,
        };
        let mut url = Url::parse(&format!("{URL_SCHEME}://{host}"))
            .map_err(|e| QuoteVaultError::Config(format!("bad link base: {e}")))?;
        if let Self::ResetPassword { code } = self {
            url.query_pairs_mut().append_pair("code", code);
        }
        Ok(url)
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self.to_url().map_err(|_| fmt::Error)?;
        f.write_str(url.as_str())
    }
}
