/// Data structures exchanged with the link API and the browser
use serde::{Deserialize, Serialize};

/// A short link as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortLink {
    pub id: String,
    pub link: String,
    pub target: String,
    #[serde(default)]
    pub created_at: String,
}

/// Body of `POST /links`; empty optional fields are left out entirely
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateLink {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customurl: Option<String>,
}

impl CreateLink {
    pub fn new(target: &str, custom_slug: Option<&str>) -> CreateLink {
        CreateLink {
            target: target.trim().to_string(),
            customurl: custom_slug
                .map(str::trim)
                .filter(|slug| !slug.is_empty())
                .map(str::to_string),
        }
    }
}

/// Body of `GET /links`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkPage {
    #[serde(default)]
    pub data: Vec<ShortLink>,
}

/// The part of a browser tab we care about
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TabInfo {
    pub id: Option<i32>,
    pub url: Option<String>,
}

/// `contextMenus.onClicked` info
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    pub menu_item_id: String,
    pub link_url: Option<String>,
    pub page_url: Option<String>,
    pub selection_text: Option<String>,
}

/// A context menu entry to register
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MenuEntry {
    pub id: String,
    pub title: String,
    pub contexts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_link_omits_empty_slug() {
        let body = CreateLink::new("  https://example.com/page  ", Some("   "));

        assert_eq!(body.target, "https://example.com/page");
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"target":"https://example.com/page"}"#
        );
    }

    #[test]
    fn test_create_link_with_slug() {
        let body = CreateLink::new("https://example.com", Some("my-slug"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["customurl"], "my-slug");
    }

    #[test]
    fn test_short_link_without_date() {
        let link: ShortLink =
            serde_json::from_str(r#"{"id":"1","link":"kutt.it/abc","target":"https://x"}"#).unwrap();

        assert_eq!(link.link, "kutt.it/abc");
        assert_eq!(link.created_at, "");
    }

    #[test]
    fn test_link_page_without_data() {
        let page: LinkPage = serde_json::from_str(r#"{"total":0}"#).unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_menu_click_camel_case() {
        let click: MenuClick = serde_json::from_str(
            r#"{"menuItemId":"shorten-link","linkUrl":"https://a.b","editable":false}"#,
        )
        .unwrap();

        assert_eq!(click.menu_item_id, "shorten-link");
        assert_eq!(click.link_url.as_deref(), Some("https://a.b"));
        assert_eq!(click.page_url, None);
    }
}
