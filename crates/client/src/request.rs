use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

const API_PREFIX: &str = "api/v0/";

/// One-shot commands whose response is a single JSON document.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self) -> Request;
}

/// An RPC command invocation: `POST {base}/api/v0/{command}?arg=..&opt=..`.
#[derive(Debug)]
pub struct Request {
    command: String,
    args: Vec<String>,
    options: Vec<(String, String)>,
    body: Option<Form>,
    timeout: Option<Duration>,
}

impl Request {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            options: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Positional argument, sent as `arg=...`.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.options.push((key.into(), value.to_string()));
        self
    }

    pub fn options<K, V>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.options
            .extend(options.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn body(mut self, form: Form) -> Self {
        self.body = Some(form);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn url(&self, base_url: &Url) -> Result<Url, ApiError> {
        let mut url = base_url.join(API_PREFIX)?.join(&self.command)?;
        // an empty query would still leave a trailing `?`
        if !self.args.is_empty() || !self.options.is_empty() {
            let mut query = url.query_pairs_mut();
            for arg in &self.args {
                query.append_pair("arg", arg);
            }
            for (key, value) in &self.options {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub(crate) fn build(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = self.url(base_url)?;
        let mut builder = client.post(url);
        if let Some(form) = self.body {
            builder = builder.multipart(form);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }
}
