use crate::client::{create_http_client, Config};
use crate::error::{CargusError, Result};
use crate::method::Method;
use crate::response::{decode_body, decode_into};
use crate::token::{bearer_header, LoginRequest, LOGIN_ENDPOINT};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Header carrying the subscription key on every request
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Receives the notice emitted when a request is made with an explicit token.
pub type DeprecationHook = Arc<dyn Fn(&str) + Send + Sync>;

const EXPLICIT_TOKEN_NOTICE: &str =
    "Passing a token to Client::request() is deprecated, use Client::set_access_token() instead.";

/// Client for the UrgentCargus API.
///
/// Every request carries the subscription key. Once a token has been set or
/// obtained through [`Client::get_token`], it is sent as a bearer token until
/// it is replaced or cleared; tokens never expire on the client side.
///
/// Token operations take `&mut self`. A client shared between threads has to
/// be wrapped in a lock by the caller, otherwise two threads could both log in.
#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    config: Config,
    base_url: Url,
    subscription_key: String,
    subscription_header: HeaderValue,
    access_token: Option<String>,
    deprecation_hook: Option<DeprecationHook>,
}

impl Client {
    /// Create a client for the given subscription key.
    /// `base_uri` defaults to [`crate::client::API_URI`] when `None` or empty.
    pub fn new(subscription_key: &str, base_uri: Option<&str>) -> Result<Self> {
        Self::with_config(subscription_key, Config::new(base_uri.unwrap_or_default()))
    }

    /// Create a client with a custom configuration
    pub fn with_config(subscription_key: &str, config: Config) -> Result<Self> {
        if subscription_key.is_empty() {
            return Err(CargusError::Configuration(
                "The UrgentCargus API needs a subscription key.".to_string(),
            ));
        }

        let mut subscription_header = HeaderValue::from_str(subscription_key).map_err(|_| {
            CargusError::Configuration("subscription key is not a valid header value".to_string())
        })?;
        subscription_header.set_sensitive(true);

        let base_url = config.base_url()?;
        let http = create_http_client(&config)?;

        Ok(Client {
            http,
            config,
            base_url,
            subscription_key: subscription_key.to_string(),
            subscription_header,
            access_token: None,
            deprecation_hook: None,
        })
    }

    /// Route deprecation notices to the given hook instead of the log
    pub fn with_deprecation_hook(mut self, hook: DeprecationHook) -> Self {
        self.deprecation_hook = Some(hook);
        self
    }

    /// Subscription key sent with every request
    pub fn subscription_key(&self) -> &str {
        &self.subscription_key
    }

    /// Client configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Currently cached access token
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Execute a request against the API.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `endpoint` - Path relative to the base URI
    /// * `params` - Payload, always sent as the JSON body (GET included)
    /// * `token` - Deprecated per-call bearer token, overriding the cached one
    ///
    /// # Returns
    /// The decoded JSON body, or `None` when the body is empty
    pub fn request<P>(
        &self,
        method: Method,
        endpoint: &str,
        params: &P,
        token: Option<&str>,
    ) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        let explicit = token.filter(|t| !t.is_empty());
        if explicit.is_some() {
            self.notify_deprecation(EXPLICIT_TOKEN_NOTICE);
        }
        let bearer_token = explicit.or_else(|| self.access_token().filter(|t| !t.is_empty()));

        let url = self.base_url.join(endpoint)?;
        let body = serde_json::to_vec(params)?;

        let mut request = self
            .http
            .request(method.to_http(), url.clone())
            .header(SUBSCRIPTION_KEY_HEADER, self.subscription_header.clone());

        if let Some(token) = bearer_token {
            request = request.header(AUTHORIZATION, bearer_header(token)?);
        }

        let start = Instant::now();
        let response = request.body(body).send().map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().map_err(transport_error)?;

        tracing::debug!(
            method = %method,
            endpoint,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "urgentcargus request"
        );

        if status.is_client_error() || status.is_server_error() {
            let message = format!("{} {} resulted in a `{}` response", method, url, status);
            let err = CargusError::normalize(&message, Some((status.as_u16(), &body[..])), None);
            tracing::debug!(method = %method, endpoint, code = status.as_u16(), "urgentcargus request failed");
            return Err(err);
        }

        decode_body(&body)
    }

    /// Execute a request and unmarshal the response into the target type
    pub fn apply<T, P>(&self, method: Method, endpoint: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        decode_into(self.request(method, endpoint, params, None)?)
    }

    /// Shorthand for GET request
    pub fn get<P>(&self, endpoint: &str, params: &P, token: Option<&str>) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.request(Method::Get, endpoint, params, token)
    }

    /// Shorthand for POST request
    pub fn post<P>(&self, endpoint: &str, params: &P, token: Option<&str>) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.request(Method::Post, endpoint, params, token)
    }

    /// Shorthand for PUT request
    pub fn put<P>(&self, endpoint: &str, params: &P, token: Option<&str>) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.request(Method::Put, endpoint, params, token)
    }

    /// Shorthand for DELETE request
    pub fn delete<P>(&self, endpoint: &str, params: &P, token: Option<&str>) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.request(Method::Delete, endpoint, params, token)
    }

    /// Return the cached token, logging in first when none is cached
    pub fn get_token(&mut self, username: &str, password: &str) -> Result<&str> {
        if self.access_token.is_none() {
            self.create_access_token(username, password)?;
        }

        self.access_token.as_deref().ok_or(CargusError::InvalidToken)
    }

    /// Replace the cached token; `None` clears it
    pub fn set_access_token(&mut self, access_token: Option<String>) {
        self.access_token = access_token;
    }

    /// Log in and cache the token returned by the service.
    /// The cached token is left untouched when the service returns no token.
    pub fn create_access_token(&mut self, username: &str, password: &str) -> Result<()> {
        let response = self.post(LOGIN_ENDPOINT, &LoginRequest::new(username, password), None)?;

        match response {
            Some(Value::String(token)) if !token.is_empty() => {
                self.set_access_token(Some(token));
                Ok(())
            }
            _ => Err(CargusError::InvalidToken),
        }
    }

    fn notify_deprecation(&self, notice: &str) {
        match &self.deprecation_hook {
            Some(hook) => (hook.as_ref())(notice),
            None => tracing::warn!(target: "urgentcargus::deprecation", "{}", notice),
        }
    }
}

fn transport_error(err: reqwest::Error) -> CargusError {
    let message = err.to_string();
    CargusError::normalize(&message, None, Some(Box::new(err)))
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("subscription_key", &"<redacted>")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("deprecation_hook", &self.deprecation_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::API_URI;
    use std::sync::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Metadata, Subscriber};

    type Recorded = Arc<Mutex<Vec<(String, Level, String)>>>;

    /// Collects every event as (target, level, message)
    #[derive(Default)]
    struct EventRecorder {
        events: Recorded,
    }

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{:?}", value);
            }
        }
    }

    impl Subscriber for EventRecorder {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _: &Id, _: &Record<'_>) {}

        fn record_follows_from(&self, _: &Id, _: &Id) {}

        fn event(&self, event: &Event<'_>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            let metadata = event.metadata();
            self.events.lock().unwrap().push((
                metadata.target().to_string(),
                *metadata.level(),
                visitor.0,
            ));
        }

        fn enter(&self, _: &Id) {}

        fn exit(&self, _: &Id) {}
    }

    fn unreachable_api_uri() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}/api/", listener.local_addr().unwrap());
        drop(listener);
        uri
    }

    #[test]
    fn test_client_creation() {
        let client = Client::new("key", None).unwrap();
        assert_eq!(client.subscription_key(), "key");
        assert_eq!(client.config().base_uri, API_URI);
        assert_eq!(client.access_token(), None);
    }

    #[test]
    fn test_empty_subscription_key() {
        for base_uri in [None, Some(""), Some("http://localhost:8080/api/"), Some("not a uri")] {
            let err = Client::new("", base_uri).unwrap_err();
            assert!(matches!(err, CargusError::Configuration(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_empty_base_uri_uses_default() {
        let client = Client::new("key", Some("")).unwrap();
        assert_eq!(client.config().base_uri, API_URI);
    }

    #[test]
    fn test_invalid_base_uri() {
        let err = Client::new("key", Some("not a uri")).unwrap_err();
        assert!(matches!(err, CargusError::Configuration(_)));
    }

    #[test]
    fn test_set_access_token() {
        let mut client = Client::new("key", None).unwrap();
        client.set_access_token(Some("abc".to_string()));
        assert_eq!(client.access_token(), Some("abc"));
        client.set_access_token(None);
        assert_eq!(client.access_token(), None);
    }

    #[test]
    fn test_get_token_returns_cached_without_login() {
        // Unroutable base URI: a login attempt would fail
        let mut client = Client::new("key", Some("http://127.0.0.1:9/api/")).unwrap();
        client.set_access_token(Some("cached".to_string()));
        assert_eq!(client.get_token("user", "pass").unwrap(), "cached");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut client = Client::new("secret-key", None).unwrap();
        client.set_access_token(Some("secret-token".to_string()));
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_explicit_token_warns_without_hook() {
        let recorder = EventRecorder::default();
        let events = recorder.events.clone();
        let client = Client::new("key", Some(&unreachable_api_uri())).unwrap();

        let result = tracing::subscriber::with_default(recorder, || {
            client.get("Countries", &serde_json::json!({}), Some("explicit"))
        });
        assert!(matches!(result, Err(CargusError::Request { code: 0, .. })));

        let events = events.lock().unwrap();
        let notices: Vec<_> = events
            .iter()
            .filter(|(target, _, _)| target == "urgentcargus::deprecation")
            .collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].1, Level::WARN);
        assert_eq!(notices[0].2, EXPLICIT_TOKEN_NOTICE);
    }

    #[test]
    fn test_cached_token_does_not_warn() {
        let recorder = EventRecorder::default();
        let events = recorder.events.clone();
        let mut client = Client::new("key", Some(&unreachable_api_uri())).unwrap();
        client.set_access_token(Some("cached".to_string()));

        let _ = tracing::subscriber::with_default(recorder, || {
            client.get("Countries", &serde_json::json!({}), None)
        });

        let events = events.lock().unwrap();
        assert!(events
            .iter()
            .all(|(target, _, _)| target != "urgentcargus::deprecation"));
    }
}
