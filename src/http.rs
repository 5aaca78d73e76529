//! The blocking HTTP driver talking to the remote key/value store.
//!
//! Every operation maps to one request and returns the observed
//! [`ResponseRecord`]. Only transport failures surface as errors; whatever
//! status the store answers with is data.

use std::time::Instant;

use anyhow::Context;
use reqwest::blocking::{Client, Response};

use crate::record::{Operation, ResponseRecord};

/// A client bound to one remote key/value store.
#[derive(Debug)]
pub struct HttpRemote {
    base_url: String,
    client: Client,
}

impl HttpRemote {
    /// Creates a client for the store at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: Client::new(),
        }
    }

    /// Stores `value` under `key` via `POST /set` with a form-encoded body.
    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<ResponseRecord> {
        let response = self
            .client
            .post(format!("{}/set", self.base_url))
            .form(&[("key", key), ("value", value)])
            .send()
            .context("failed to send SET request")?;
        let (status, body) = status_and_body(response)?;

        Ok(ResponseRecord {
            operation: Operation::Set,
            key: key.to_owned(),
            status,
            body,
            elapsed: None,
        })
    }

    /// Looks up `key` via `GET /get`, timing the request.
    ///
    /// The elapsed time spans from right before dispatch until the response
    /// body has been received in full.
    pub fn get(&self, key: &str) -> anyhow::Result<ResponseRecord> {
        let started = Instant::now();
        let response = self
            .client
            .get(format!("{}/get", self.base_url))
            .query(&[("key", key)])
            .send()
            .context("failed to send GET request")?;
        let (status, body) = status_and_body(response)?;
        let elapsed = started.elapsed();

        Ok(ResponseRecord {
            operation: Operation::Get,
            key: key.to_owned(),
            status,
            body,
            elapsed: Some(elapsed),
        })
    }

    /// Removes `key` via `DELETE /del`.
    pub fn delete(&self, key: &str) -> anyhow::Result<ResponseRecord> {
        let response = self
            .client
            .delete(format!("{}/del", self.base_url))
            .query(&[("key", key)])
            .send()
            .context("failed to send DELETE request")?;
        let (status, body) = status_and_body(response)?;

        Ok(ResponseRecord {
            operation: Operation::Delete,
            key: key.to_owned(),
            status,
            body,
            elapsed: None,
        })
    }
}

fn status_and_body(response: Response) -> anyhow::Result<(u16, String)> {
    let status = response.status().as_u16();
    let body = response.text().context("failed to read response body")?;
    Ok((status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped_from_the_base_url() {
        let remote = HttpRemote::new("http://localhost:8080/");
        assert_eq!(remote.base_url, "http://localhost:8080");

        let remote = HttpRemote::new("http://localhost:8080");
        assert_eq!(remote.base_url, "http://localhost:8080");
    }
}
