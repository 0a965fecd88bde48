use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
///
/// `param_name` is the query parameter name (the air pollution provider
/// expects `"appid"`) and `key` is its value.
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub key: String,
}

impl<C> UrlParam<C> {
    /// Constructor for the `appid=<key>` scheme used by the air pollution
    /// provider.
    pub fn appid(inner: C, key: String) -> Self {
        Self {
            inner,
            param_name: "appid".to_string(),
            key,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Capture(Mutex<Option<String>>);

    #[async_trait]
    impl HttpClient for Capture {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            *self.0.lock().unwrap() = Some(req.url().to_string());
            reqwest::Client::new().execute(req).await
        }
    }

    #[tokio::test]
    async fn test_appid_param_is_appended() {
        let client = UrlParam::appid(Capture(Mutex::new(None)), "abc123".to_string());

        let req = reqwest::Request::new(
            reqwest::Method::GET,
            "http://127.0.0.1:9/air_pollution?lat=38.9&lon=-77.0".parse().unwrap(),
        );
        let _ = client.execute(req).await;

        let url = client.inner.0.lock().unwrap().clone().unwrap();
        assert!(url.contains("lat=38.9"));
        assert!(url.contains("appid=abc123"));
    }
}
