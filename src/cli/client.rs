use anyhow::{anyhow, Context};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

/// Thin JSON client for the Bookshelf API.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str, token: Option<String>) -> anyhow::Result<Self> {
        let mut base = Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(anyhow!("server URL must use http or https, got '{}'", base.scheme()));
        }
        // Url::join replaces the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid API path '{}'", path))
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        self.send(Method::GET, url, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(Method::POST, self.endpoint(path)?, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(Method::PUT, self.endpoint(path)?, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(Method::PATCH, self.endpoint(path)?, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.send(Method::DELETE, self.endpoint(path)?, None).await
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> anyhow::Result<Value> {
        tracing::debug!("{} {}", method, url);
        let mut request = self.http.request(method, url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let text = response.text().await?;
        let value: Value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok(value)
        } else {
            Err(anyhow!(error_message(status, &value)))
        }
    }
}

/// Render an API error body as a single line.
pub fn error_message(status: StatusCode, body: &Value) -> String {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| body.as_str().map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    let fields = body
        .get("field_errors")
        .and_then(Value::as_object)
        .map(|errors| {
            errors
                .iter()
                .map(|(field, msg)| format!("{}: {}", field, msg.as_str().unwrap_or_default()))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|s| !s.is_empty());

    match fields {
        Some(fields) => format!("{} ({}) [{}]", message, status.as_u16(), fields),
        None => format!("{} ({})", message, status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_paths_under_base_prefix() {
        let client = ApiClient::new("http://localhost:3000/bookshelf", None).unwrap();
        assert_eq!(
            client.endpoint("/api/books/3").unwrap().as_str(),
            "http://localhost:3000/bookshelf/api/books/3"
        );
    }

    #[test]
    fn rejects_non_http_servers() {
        assert!(ApiClient::new("ftp://example.com", None).is_err());
        assert!(ApiClient::new("not a url", None).is_err());
    }

    #[test]
    fn blank_token_is_ignored() {
        assert!(!ApiClient::new("http://localhost:3000", Some("  ".into())).unwrap().has_token());
    }

    #[test]
    fn formats_field_errors() {
        let body = json!({
            "error": true,
            "message": "Invalid input",
            "code": "VALIDATION_ERROR",
            "field_errors": {"publication_year": "Publication year cannot be in the future."}
        });
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, &body),
            "Invalid input (400) [publication_year: Publication year cannot be in the future.]"
        );
        assert_eq!(error_message(StatusCode::FORBIDDEN, &Value::Null), "Forbidden (403)");
    }
}
