//! 1secmail async client implementation.

use crate::log::{LogEvent, LogEventKind, VerboseLog};
use crate::{Context, Error, Message, MessageItem, Result};
use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Where 1secmail expects API calls.
pub const DEFAULT_BASE_URL: &str = "https://www.1secmail.com/api/v1/";

/// Library version, sent with the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn default_user_agent() -> String {
    format!(
        "{}/{} (rust {})",
        env!("CARGO_PKG_NAME"),
        VERSION,
        env!("CARGO_PKG_RUST_VERSION")
    )
}

/// Async client for the 1secmail temporary email service.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like a different endpoint, a proxy, or a verbose-logging hook.
///
/// Every call takes a [`Context`] and issues exactly one GET request. The client
/// holds no per-call state, so it can be shared freely between tasks.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
    user_agent_header: HeaderValue,
    proxy: Option<String>,
    verbose_log: Option<Arc<dyn VerboseLog>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("proxy", &self.proxy)
            .field("verbose_log", &self.verbose_log.is_some())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings.
    ///
    /// No network request is made until the first API call.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// The API endpoint requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The `User-Agent` header value sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get the proxy URL if one was configured.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Generate `count` random mailbox addresses.
    ///
    /// # Arguments
    /// * `ctx` - Deadline and cancellation for this call
    /// * `count` - Number of addresses, passed through as-is; the service
    ///   decides what to do with out-of-range values
    ///
    /// # Returns
    /// Full addresses of the form `login@domain`
    ///
    /// # Examples
    /// ```no_run
    /// # use onesecmail_client::{Client, Context};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), onesecmail_client::Error> {
    /// let client = Client::new()?;
    /// let addresses = client.gen_random_mailbox(&Context::background(), 10).await?;
    /// println!("{addresses:?}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn gen_random_mailbox(&self, ctx: &Context, count: i64) -> Result<Vec<String>> {
        let params = [("action", "genRandomMailbox".to_string()), ("count", count.to_string())];
        self.get_json(ctx, &params).await
    }

    /// List the domains the service currently receives mail on.
    ///
    /// # Returns
    /// Domain names, e.g. `1secmail.com`
    pub async fn get_domain_list(&self, ctx: &Context) -> Result<Vec<String>> {
        let params = [("action", "getDomainList".to_string())];
        self.get_json(ctx, &params).await
    }

    /// List the messages in mailbox `login@domain`.
    ///
    /// # Arguments
    /// * `ctx` - Deadline and cancellation for this call
    /// * `login` - The part before `@`
    /// * `domain` - One of the service domains
    ///
    /// # Returns
    /// Message summaries; use [`Client::read_message`] for the content
    ///
    /// # Examples
    /// ```no_run
    /// # use onesecmail_client::{Client, Context};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), onesecmail_client::Error> {
    /// let client = Client::new()?;
    /// let ctx = Context::background();
    /// for msg in client.get_messages(&ctx, "demo", "1secmail.com").await? {
    ///     println!("{}: {}", msg.from, msg.subject);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_messages(
        &self,
        ctx: &Context,
        login: &str,
        domain: &str,
    ) -> Result<Vec<MessageItem>> {
        let params = [
            ("action", "getMessages".to_string()),
            ("login", login.to_string()),
            ("domain", domain.to_string()),
        ];
        self.get_json(ctx, &params).await
    }

    /// Fetch message `id` from mailbox `login@domain`.
    ///
    /// # Arguments
    /// * `ctx` - Deadline and cancellation for this call
    /// * `login` - The part before `@`
    /// * `domain` - One of the service domains
    /// * `id` - A [`MessageItem::id`] from [`Client::get_messages`]
    ///
    /// # Returns
    /// The full message, with attachment metadata
    pub async fn read_message(
        &self,
        ctx: &Context,
        login: &str,
        domain: &str,
        id: i64,
    ) -> Result<Message> {
        let params = [
            ("action", "readMessage".to_string()),
            ("login", login.to_string()),
            ("domain", domain.to_string()),
            ("id", id.to_string()),
        ];
        self.get_json(ctx, &params).await
    }

    /// Download attachment `filename` of message `id` from mailbox `login@domain`.
    ///
    /// # Arguments
    /// * `ctx` - Deadline and cancellation for this call
    /// * `login` - The part before `@`
    /// * `domain` - One of the service domains
    /// * `id` - The message the attachment belongs to
    /// * `filename` - An [`Attachment::filename`](crate::Attachment::filename)
    ///
    /// # Returns
    /// The raw response body
    ///
    /// The response status is not checked: whatever the service sends back is
    /// returned as bytes, including error pages. Compare the length against
    /// [`Attachment::size`](crate::Attachment::size) if you need to tell them apart.
    ///
    /// # Examples
    /// ```no_run
    /// # use onesecmail_client::{Client, Context};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), onesecmail_client::Error> {
    /// let client = Client::new()?;
    /// let ctx = Context::background();
    /// let message = client.read_message(&ctx, "demo", "1secmail.com", 639).await?;
    /// for attachment in &message.attachments {
    ///     let data = client
    ///         .download_attachment(&ctx, "demo", "1secmail.com", message.id, &attachment.filename)
    ///         .await?;
    ///     println!("{}: {} bytes", attachment.filename, data.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_attachment(
        &self,
        ctx: &Context,
        login: &str,
        domain: &str,
        id: i64,
        filename: &str,
    ) -> Result<Vec<u8>> {
        let params = [
            ("action", "download".to_string()),
            ("login", login.to_string()),
            ("domain", domain.to_string()),
            ("id", id.to_string()),
            ("file", filename.to_string()),
        ];
        self.get_raw(ctx, &params).await
    }

    /// JSON mode: require `200 OK`, then decode the body into `T`.
    async fn get_json<T: DeserializeOwned + Default>(
        &self,
        ctx: &Context,
        params: &[(&str, String)],
    ) -> Result<T> {
        let (url, status, body) = self.fetch(ctx, params).await?;
        let text = String::from_utf8_lossy(&body);

        if status != StatusCode::OK {
            tracing::debug!(%url, %status, "invalid status code");
            self.log(LogEvent::response(LogEventKind::BadStatus, url.as_str(), status, &text));
            return Err(Error::BadStatusCode {
                status,
                body: text.into_owned(),
            });
        }

        self.log(LogEvent::response(LogEventKind::FetchResult, url.as_str(), status, &text));
        decode_first(&body).map_err(|source| Error::NotExpectedJson {
            body: text.into_owned(),
            source,
        })
    }

    /// Raw mode: return the body bytes whatever the status.
    async fn get_raw(&self, ctx: &Context, params: &[(&str, String)]) -> Result<Vec<u8>> {
        let (url, status, body) = self.fetch(ctx, params).await?;
        if self.verbose_log.is_some() {
            let text = String::from_utf8_lossy(&body);
            self.log(LogEvent::response(LogEventKind::RawResult, url.as_str(), status, &text));
        }
        Ok(body)
    }

    /// Send one GET under `ctx` and buffer the whole response body.
    ///
    /// The response is dropped on every path out of here, which releases the
    /// connection back to reqwest.
    async fn fetch(
        &self,
        ctx: &Context,
        params: &[(&str, String)],
    ) -> Result<(Url, StatusCode, Vec<u8>)> {
        let request = self
            .http
            .get(&self.base_url)
            .query(params)
            .header(USER_AGENT, self.user_agent_header.clone())
            .build()?;
        let url = request.url().clone();

        tracing::debug!(%url, "fetching");
        self.log(LogEvent::fetching(url.as_str()));

        let (status, body) = ctx
            .run(async {
                let response = self.http.execute(request).await?;
                let status = response.status();
                let body = response.bytes().await?;
                Ok::<_, Error>((status, body.to_vec()))
            })
            .await
            .inspect_err(|err| tracing::debug!(%url, error = %err, "request failed"))?;

        tracing::debug!(%url, %status, len = body.len(), "fetch result");
        Ok((url, status, body))
    }

    fn log(&self, event: LogEvent<'_>) {
        if let Some(hook) = &self.verbose_log {
            hook.log(&event);
        }
    }
}

/// Decode the first JSON value in `body`.
///
/// Anything after the first value is ignored and a top-level `null` yields
/// `T::default()`. An empty body is still an error.
fn decode_first<T: DeserializeOwned + Default>(body: &[u8]) -> serde_json::Result<T> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<T>>()
        .next()
    {
        Some(value) => value.map(Option::unwrap_or_default),
        None => serde_json::from_slice(body),
    }
}

/// Builder for configuring a 1secmail client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Clone)]
pub struct ClientBuilder {
    base_url: String,
    user_agent: String,
    proxy: Option<String>,
    timeout: Option<Duration>,
    http: Option<reqwest::Client>,
    verbose_log: Option<Arc<dyn VerboseLog>>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .field("http", &self.http.is_some())
            .field("verbose_log", &self.verbose_log.is_some())
            .finish()
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - [`DEFAULT_BASE_URL`]
    /// - `onesecmail-client/<version> (rust <version>)` user agent
    /// - No proxy, no transport timeout (use a [`Context`] deadline per call)
    /// - No verbose logging
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            proxy: None,
            timeout: None,
            http: None,
            verbose_log: None,
        }
    }

    /// Override the API endpoint.
    ///
    /// Useful for testing against a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:9050").
    ///
    /// Ignored when a custom client is supplied with [`http_client`](Self::http_client).
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set a transport-level timeout applied to every request.
    ///
    /// Ignored when a custom client is supplied with [`http_client`](Self::http_client).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured reqwest client as the transport.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Install a hook that receives a [`LogEvent`] for each request and response.
    pub fn verbose_log(mut self, hook: impl VerboseLog + 'static) -> Self {
        self.verbose_log = Some(Arc::new(hook));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// [`Error::InvalidBaseUrl`] if the endpoint does not parse,
    /// [`Error::InvalidUserAgent`] if the user agent is not a valid header value, or
    /// [`Error::Request`] if the proxy or reqwest client cannot be set up.
    pub fn build(self) -> Result<Client> {
        Url::parse(&self.base_url).map_err(|e| Error::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        let user_agent_header = HeaderValue::from_str(&self.user_agent)
            .map_err(|_| Error::InvalidUserAgent(self.user_agent.clone()))?;

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(proxy_url) = &self.proxy {
                    builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(Client {
            http,
            base_url: self.base_url,
            user_agent: self.user_agent,
            user_agent_header,
            proxy: self.proxy,
            verbose_log: self.verbose_log,
        })
    }
}
