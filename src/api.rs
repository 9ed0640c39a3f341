/// Client for the link shortener REST API (`<base>/api/v2`)
use crate::base_url::api_root;
use crate::error::{Result, ShortenError};
use crate::link_data::{CreateLink, LinkPage, ShortLink};
use crate::ports::{HttpPort, HttpRequest, Method};
use crate::settings::Settings;

pub const API_KEY_HEADER: &str = "X-API-KEY";
const REQUEST_FAILED: &str = "Request failed";

/// Body of a successful response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// 204 or nothing but whitespace
    Empty,
    Json(String),
    /// Anything the server did not label as JSON
    Text(String),
}

fn is_json(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

pub struct ApiClient<'a> {
    http: &'a dyn HttpPort,
    api_key: &'a str,
    base_url: &'a str,
}

impl<'a> ApiClient<'a> {
    pub fn new(http: &'a dyn HttpPort, settings: &'a Settings) -> Self {
        ApiClient {
            http,
            api_key: &settings.api_key,
            base_url: &settings.base_url,
        }
    }

    /// Send an authenticated request and classify the successful body
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<ResponseBody> {
        if self.api_key.is_empty() {
            return Err(ShortenError::MissingApiKey);
        }

        let request = HttpRequest {
            method,
            url: format!("{}{}", api_root(self.base_url), path),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (API_KEY_HEADER.to_string(), self.api_key.to_string()),
            ],
            body,
        };

        log::debug!("{} {}", method.as_str(), request.url);
        let response = self.http.send(request).await?;

        if !(200..300).contains(&response.status) {
            let message = error_message(&response.body);
            log::warn!("API responded {}: {}", response.status, message);
            return Err(match response.status {
                401 => ShortenError::Unauthorized(message),
                status => ShortenError::Api { status, message },
            });
        }

        Ok(if response.status == 204 || response.body.trim().is_empty() {
            ResponseBody::Empty
        } else if is_json(&response.content_type) {
            ResponseBody::Json(response.body)
        } else {
            ResponseBody::Text(response.body)
        })
    }

    /// A success without a JSON body still means the link exists; the
    /// returned link then only carries the target.
    pub async fn create_link(&self, target: &str, custom_slug: Option<&str>) -> Result<ShortLink> {
        let payload = CreateLink::new(target, custom_slug);
        if payload.target.is_empty() {
            return Err(ShortenError::validation("Target URL cannot be empty."));
        }

        let body =
            serde_json::to_string(&payload).map_err(|e| ShortenError::Decode(e.to_string()))?;
        match self.request(Method::Post, "/links", Some(body)).await? {
            ResponseBody::Json(text) => {
                serde_json::from_str(&text).map_err(|e| ShortenError::Decode(e.to_string()))
            }
            other => {
                log::warn!("Link created without a JSON body: {:?}", other);
                Ok(ShortLink {
                    id: String::new(),
                    link: String::new(),
                    target: payload.target,
                    created_at: String::new(),
                })
            }
        }
    }

    pub async fn list_links(&self, limit: u32) -> Result<Vec<ShortLink>> {
        let path = format!("/links?limit={}", limit);
        match self.request(Method::Get, &path, None).await? {
            ResponseBody::Json(text) => {
                let page: LinkPage =
                    serde_json::from_str(&text).map_err(|e| ShortenError::Decode(e.to_string()))?;
                Ok(page.data)
            }
            ResponseBody::Text(_) | ResponseBody::Empty => Ok(Vec::new()),
        }
    }

    pub async fn delete_link(&self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(ShortenError::validation("Link id cannot be empty."));
        }

        let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
        self.request(Method::Delete, &format!("/links/{}", encoded), None)
            .await?;
        Ok(())
    }
}

/// Pull a readable message out of an error body
///
/// JSON bodies use their `error` or `message` field, other bodies are used
/// verbatim, and anything else falls back to a generic message.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => ["error", "message"]
            .iter()
            .filter_map(|key| json.get(key).and_then(|v| v.as_str()))
            .find(|text| !text.is_empty())
            .unwrap_or(REQUEST_FAILED)
            .to_string(),
        Err(_) if !body.is_empty() => body.to_string(),
        Err(_) => REQUEST_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHttp;
    use futures::executor::block_on;

    fn settings() -> Settings {
        Settings {
            api_key: "secret".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_create_link_returns_created_link() {
        let http = FakeHttp::new();
        http.respond(200, r#"{"id":"1","link":"kutt.it/abc","target":"https://x"}"#);
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        let link = block_on(client.create_link("https://x", None)).unwrap();

        assert_eq!(link.id, "1");
        assert_eq!(link.link, "kutt.it/abc");
        assert_eq!(link.target, "https://x");

        let sent = http.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, "https://kutt.it/api/v2/links");
        assert!(sent[0]
            .headers
            .contains(&("X-API-KEY".to_string(), "secret".to_string())));
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"target":"https://x"}"#));
    }

    #[test]
    fn test_create_link_sends_custom_slug() {
        let http = FakeHttp::new();
        http.respond(201, r#"{"id":"2","link":"kutt.it/mine","target":"https://x"}"#);
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        block_on(client.create_link(" https://x ", Some("mine"))).unwrap();

        assert_eq!(
            http.requests()[0].body.as_deref(),
            Some(r#"{"target":"https://x","customurl":"mine"}"#)
        );
    }

    #[test]
    fn test_blank_target_never_hits_network() {
        let http = FakeHttp::new();
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        let err = block_on(client.create_link("   ", None)).unwrap_err();

        assert!(matches!(err, ShortenError::Validation(_)));
        assert!(http.requests().is_empty());
    }

    #[test]
    fn test_missing_api_key_never_hits_network() {
        let http = FakeHttp::new();
        let settings = Settings::default();
        let client = ApiClient::new(&http, &settings);

        let err = block_on(client.list_links(20)).unwrap_err();

        assert_eq!(err, ShortenError::MissingApiKey);
        assert!(http.requests().is_empty());
    }

    #[test]
    fn test_unauthorized_requires_auth() {
        let http = FakeHttp::new();
        http.respond(401, r#"{"error":"API key is not correct."}"#);
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        let err = block_on(client.list_links(20)).unwrap_err();

        assert!(err.requires_auth());
        assert_eq!(err.user_message(), "API key is not correct.");
    }

    #[test]
    fn test_plain_text_error_body() {
        let http = FakeHttp::new();
        http.respond(500, "oops");
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        let err = block_on(client.create_link("https://x", None)).unwrap_err();

        assert_eq!(
            err,
            ShortenError::Api {
                status: 500,
                message: "oops".to_string()
            }
        );
        assert_eq!(err.user_message(), "oops");
    }

    #[test]
    fn test_list_links_uses_limit_and_data() {
        let http = FakeHttp::new();
        http.respond(
            200,
            r#"{"data":[{"id":"1","link":"kutt.it/a","target":"https://a","created_at":"2024-01-02T03:04:05Z"}],"limit":20}"#,
        );
        let settings = Settings {
            base_url: "https://links.example.com/kutt".to_string(),
            ..settings()
        };
        let client = ApiClient::new(&http, &settings);

        let links = block_on(client.list_links(20)).unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].created_at, "2024-01-02T03:04:05Z");
        assert_eq!(
            http.requests()[0].url,
            "https://links.example.com/kutt/api/v2/links?limit=20"
        );
    }

    #[test]
    fn test_delete_link_accepts_no_content() {
        let http = FakeHttp::new();
        http.respond(204, "");
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        block_on(client.delete_link("abc")).unwrap();

        let sent = http.requests();
        assert_eq!(sent[0].method, Method::Delete);
        assert_eq!(sent[0].url, "https://kutt.it/api/v2/links/abc");
        assert_eq!(sent[0].body, None);
    }

    #[test]
    fn test_transport_error_is_propagated() {
        let http = FakeHttp::new();
        http.fail("connection refused");
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        let err = block_on(client.list_links(20)).unwrap_err();

        assert_eq!(err, ShortenError::Transport("connection refused".to_string()));
    }

    #[test]
    fn test_create_link_with_text_body_still_succeeds() {
        let http = FakeHttp::new();
        http.respond_with(201, "text/plain", "Created");
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        let link = block_on(client.create_link(" https://x ", None)).unwrap();

        assert_eq!(link.target, "https://x");
        assert!(link.id.is_empty());
        assert!(link.link.is_empty());
    }

    #[test]
    fn test_create_link_with_empty_body_still_succeeds() {
        let http = FakeHttp::new();
        http.respond(204, "");
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        let link = block_on(client.create_link("https://x", None)).unwrap();

        assert_eq!(link.target, "https://x");
    }

    #[test]
    fn test_response_body_follows_content_type() {
        let http = FakeHttp::new();
        http.respond_with(200, "application/json; charset=utf-8", r#"{"ok":true}"#);
        http.respond_with(200, "text/html", "<p>ok</p>");
        http.respond_with(200, "text/plain", "  ");
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        let json = block_on(client.request(Method::Get, "/a", None)).unwrap();
        let text = block_on(client.request(Method::Get, "/b", None)).unwrap();
        let empty = block_on(client.request(Method::Get, "/c", None)).unwrap();

        assert_eq!(json, ResponseBody::Json(r#"{"ok":true}"#.to_string()));
        assert_eq!(text, ResponseBody::Text("<p>ok</p>".to_string()));
        assert_eq!(empty, ResponseBody::Empty);
    }

    #[test]
    fn test_list_links_with_text_body_is_empty() {
        let http = FakeHttp::new();
        http.respond_with(200, "text/plain", "nothing here");
        let settings = settings();
        let client = ApiClient::new(&http, &settings);

        assert!(block_on(client.list_links(20)).unwrap().is_empty());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error":"Bad slug"}"#), "Bad slug");
        assert_eq!(error_message(r#"{"message":"Too many requests"}"#), "Too many requests");
        assert_eq!(error_message(r#"{"error":"","message":"fallback"}"#), "fallback");
        assert_eq!(error_message(r#"{"status":500}"#), "Request failed");
        assert_eq!(error_message("oops"), "oops");
        assert_eq!(error_message(""), "Request failed");
    }
}
