//! # study604-rest
//!
//! Access to the hosted row store over its REST interface.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use study604_core::store;

mod store_api;
mod util;

pub use self::store_api::*;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Fetch(String),

    #[error("The request timed out")]
    Timeout,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("{status}: {body}")]
    Api {
        status: u16,
        body: ApiErrorBody,
    },
}

/// The body of a response with an error status.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorBody {
    Store(study604_boundary::Error),
    Text(String),
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Fetch(err.to_string())
        }
    }
}

impl From<Error> for store::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Timeout => Self::Timeout,
            Error::Fetch(msg) | Error::Config(msg) => Self::Transport(msg),
            Error::Decode(msg) => Self::Query(format!("unexpected response: {msg}")),
            Error::Api { status, .. }
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                Self::Unauthorized
            }
            Error::Api { status, body } => Self::Query(format!("{status}: {body}")),
        }
    }
}

pub async fn into_json<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    // ensure we've got 2xx status
    let response = ensure_success(response).await?;
    Ok(response.json().await?)
}

pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(api_error(status, text))
}

fn api_error(status: StatusCode, text: String) -> Error {
    let body = match serde_json::from_str::<study604_boundary::Error>(&text) {
        Ok(err) => ApiErrorBody::Store(err),
        Err(_) => ApiErrorBody::Text(text),
    };
    Error::Api {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_body_of_the_store() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"message":"column spots.foo does not exist","code":"42703"}"#.into(),
        );
        assert_eq!(
            "400: column spots.foo does not exist (42703)",
            err.to_string()
        );
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream unavailable".into());
        assert_eq!(
            Error::Api {
                status: 502,
                body: ApiErrorBody::Text("upstream unavailable".into())
            },
            err
        );
    }

    #[test]
    fn map_into_store_errors() {
        let unauthorized = api_error(StatusCode::UNAUTHORIZED, "".into());
        assert_eq!(store::Error::Unauthorized, unauthorized.into());
        let forbidden = api_error(StatusCode::FORBIDDEN, "".into());
        assert_eq!(store::Error::Unauthorized, forbidden.into());
        let conflict = api_error(StatusCode::CONFLICT, "duplicate key".into());
        assert_eq!(
            store::Error::Query("409: duplicate key".into()),
            conflict.into()
        );
        assert_eq!(store::Error::Timeout, Error::Timeout.into());
        assert!(matches!(
            store::Error::from(Error::Fetch("connection refused".into())),
            store::Error::Transport(_)
        ));
    }
}
