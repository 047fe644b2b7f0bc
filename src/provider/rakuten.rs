use crate::item::BookRecord;
use crate::provider;
use crate::provider::ClientError;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

pub mod utils;

/// 라쿠텐 북스 도서 검색 API 엔드포인트 URL
pub const RAKUTEN_BOOKS_ENDPOINT: &str = "https://app.rakuten.co.jp/services/api/BooksBook/Search/20170404";

/// 라쿠텐 북스 API 응답을 표현하는 구조체
///
/// `error`가 있는 응답은 이 구조체로 변환하기 전에 걸러진다.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// 검색 결과 목록, 첫 번째 결과만 [`BookItem`]으로 변환 되므로 나머지는 형식을 검사하지 않는다.
    #[serde(rename = "Items")]
    pub items: Option<Vec<Value>>,
}

/// 개별 도서 정보를 표현하는 구조체
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookItem {
    /// 저자
    pub author: Option<String>,
    /// 도서 제목
    pub title: Option<String>,
    /// 부제
    pub sub_title: Option<String>,
    /// 도서 소개
    pub item_caption: Option<String>,
    /// 출판사
    pub publisher_name: Option<String>,
    /// 발매일 (`2004年09月15日` 같은 형식)
    pub sales_date: Option<String>,
    /// 큰 크기의 표지 이미지 주소
    pub large_image_url: Option<String>,
}

impl BookItem {
    fn to_book_record(&self) -> Result<BookRecord, ClientError> {
        let mut builder = BookRecord::builder()
            .author(self.author.clone().unwrap_or_default())
            .title(self.title.clone().unwrap_or_default())
            .subtitle(self.sub_title.clone().unwrap_or_default())
            .description(self.item_caption.clone().unwrap_or_default())
            .publisher(self.publisher_name.clone().unwrap_or_default());

        if let Some(sales_date) = &self.sales_date {
            builder = builder.published_at(sales_date.clone());
        }

        // 빈 문자열은 변환 없이 그대로 둔다.
        match self.large_image_url.as_deref() {
            Some("") => builder = builder.image_url(String::new()),
            Some(image_url) => builder = builder.image_url(utils::strip_resize_directive(image_url)?),
            None => {}
        }

        Ok(builder.build())
    }
}

/// 라쿠텐 북스 API 클라이언트
///
/// 어플리케이션 아이디는 생성 시에 고정 되며 이후 변경 되지 않는다.
/// 내부 상태가 불변이므로 여러 조회를 동시에 실행해도 된다.
#[derive(Debug, Clone)]
pub struct Client {
    /// 라쿠텐 어플리케이션 아이디
    application_id: String,
    endpoint: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new<S: Into<String>>(application_id: S) -> Self {
        Self::with_endpoint(application_id, RAKUTEN_BOOKS_ENDPOINT)
    }

    pub fn with_endpoint<S: Into<String>, E: Into<String>>(application_id: S, endpoint: E) -> Self {
        Self {
            application_id: application_id.into(),
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    /// 타임아웃 등을 직접 설정한 HTTP 클라이언트를 사용한다. 기본 클라이언트는 타임아웃이 없다.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_search_url(&self, isbn: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|_| ClientError::InvalidBaseUrl)?;

        url.query_pairs_mut()
            .append_pair("applicationId", &self.application_id)
            .append_pair("isbn", isbn);

        Ok(url)
    }

    pub async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, ClientError> {
        let url = self.build_search_url(isbn)?;

        debug!(isbn = isbn, endpoint = self.endpoint.as_str(), "Searching book");
        let response = self.http.get(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(format!("ISBN: {}, ERROR: {}", isbn, e)))?;

        // 라쿠텐 API는 4xx 응답에도 본문에 error를 담아 보내므로 상태 코드는 확인하지 않는다.
        debug!(isbn = isbn, status = response.status().as_u16(), "Received response");
        let text = response.text()
            .await
            .map_err(|e| ClientError::ResponseTextExtractionFailed(format!("ISBN: {}, ERROR: {}", isbn, e)))?;

        parse_search_response(isbn, &text)
    }
}

impl provider::Client for Client {
    fn lookup_by_isbn(&self, isbn: &str) -> impl Future<Output = Result<Option<BookRecord>, ClientError>> + Send {
        Client::lookup_by_isbn(self, isbn)
    }
}

/// 응답 본문을 검사하고 첫 번째 검색 결과를 [`BookRecord`]로 변환한다.
///
/// `error` 필드가 있으면 `Items`와 관계 없이 [`ClientError::Upstream`]을 반환한다.
fn parse_search_response(isbn: &str, text: &str) -> Result<Option<BookRecord>, ClientError> {
    let payload = serde_json::from_str::<Value>(text)
        .map_err(|e| ClientError::ResponseParseFailed(format!("ISBN: {}, ERROR: {}", isbn, e)))?;

    if let Some(message) = upstream_error(&payload) {
        let description = payload.get("error_description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        warn!(isbn = isbn, error = message.as_str(), description = description, "Upstream returned an error");
        return Err(ClientError::Upstream(message));
    }

    let response = serde_json::from_value::<SearchResponse>(payload)
        .map_err(|e| ClientError::ResponseParseFailed(format!("ISBN: {}, ERROR: {}", isbn, e)))?;
    let items = response.items
        .ok_or_else(|| ClientError::ResponseParseFailed(format!("ISBN: {}, ERROR: missing Items", isbn)))?;

    match items.first() {
        Some(envelope) => {
            if items.len() > 1 {
                debug!(isbn = isbn, count = items.len(), "Multiple items found, using the first one");
            }
            let item = match envelope.get("Item") {
                Some(item) => serde_json::from_value::<BookItem>(item.clone())
                    .map_err(|e| ClientError::ResponseParseFailed(format!("ISBN: {}, ERROR: {}", isbn, e)))?,
                None => BookItem::default(),
            };
            let record = item.to_book_record()?;
            info!(isbn = isbn, title = record.title(), "Book found");
            Ok(Some(record))
        }
        None => {
            info!(isbn = isbn, "Book not found");
            Ok(None)
        }
    }
}

/// `error` 필드가 참으로 평가 되는 값일 때만 오류 메시지를 반환한다. 빈 문자열, `null`, `false`, `0`은 무시한다.
fn upstream_error(payload: &Value) -> Option<String> {
    match payload.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const SEARCH_PATH: &str = "/services/api/BooksBook/Search/20170404";
    const APPLICATION_ID: &str = "test-application-id";

    fn client_for(server: &Server) -> Client {
        Client::with_endpoint(APPLICATION_ID, format!("{}{}", server.url(), SEARCH_PATH))
    }

    fn query_for(isbn: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("applicationId".into(), APPLICATION_ID.into()),
            Matcher::UrlEncoded("isbn".into(), isbn.into()),
        ])
    }

    fn single_item_body(title: &str, image_url: &str) -> String {
        format!(r#"{{
            "count": 1,
            "page": 1,
            "Items": [
                {{
                    "Item": {{
                        "author": "村上 春樹",
                        "title": "{}",
                        "subTitle": "上",
                        "itemCaption": "限りない喪失と再生を描く究極の恋愛小説。",
                        "publisherName": "講談社",
                        "salesDate": "2004年09月15日",
                        "isbn": "9784062748681",
                        "largeImageUrl": "{}"
                    }}
                }}
            ]
        }}"#, title, image_url)
    }

    #[tokio::test]
    async fn maps_first_item_into_record() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", SEARCH_PATH)
            .match_query(query_for("9784062748681"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(single_item_body(
                "ノルウェイの森",
                "https://thumbnail.image.rakuten.co.jp/@0_mall/book/cabinet/8681/9784062748681.jpg?_ex=200x200",
            ))
            .create_async().await;

        let record = client_for(&server)
            .lookup_by_isbn("9784062748681").await
            .unwrap()
            .unwrap();

        assert_eq!("村上 春樹", record.author());
        assert_eq!("ノルウェイの森", record.title());
        assert_eq!("上", record.subtitle());
        assert_eq!("限りない喪失と再生を描く究極の恋愛小説。", record.description());
        assert_eq!("講談社", record.publisher());
        assert_eq!(Some("2004年09月15日"), record.published_at());
        assert_eq!(
            Some("https://thumbnail.image.rakuten.co.jp/@0_mall/book/cabinet/8681/9784062748681.jpg"),
            record.image_url()
        );
        assert_eq!(None, record.vendor_url());
    }

    #[tokio::test]
    async fn empty_items_is_not_found() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", SEARCH_PATH)
            .match_query(query_for("9780000000000"))
            .with_status(200)
            .with_body(r#"{"count": 0, "Items": []}"#)
            .create_async().await;

        let result = client_for(&server).lookup_by_isbn("9780000000000").await;

        assert_eq!(Ok(None), result);
    }

    #[tokio::test]
    async fn upstream_error_is_returned_verbatim() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": "wrong_parameter", "error_description": "specify valid applicationId"}"#)
            .create_async().await;

        let result = client_for(&server).lookup_by_isbn("invalid").await;

        assert_eq!(Err(ClientError::Upstream("wrong_parameter".to_owned())), result);
        assert_eq!("wrong_parameter", result.unwrap_err().to_string());
    }

    #[tokio::test]
    async fn upstream_error_takes_priority_over_items() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(single_item_body("ignored", "https://example.com/img.jpg").replacen('{', r#"{"error": "wrong_parameter","#, 1))
            .create_async().await;

        let result = client_for(&server).lookup_by_isbn("9784062748681").await;

        assert_eq!(Err(ClientError::Upstream("wrong_parameter".to_owned())), result);
    }

    #[tokio::test]
    async fn missing_large_image_url_gives_no_image() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Items": [{"Item": {"author": "著者", "title": "題名"}}]}"#)
            .create_async().await;

        let record = client_for(&server)
            .lookup_by_isbn("9784000000000").await
            .unwrap()
            .unwrap();

        assert_eq!("題名", record.title());
        assert_eq!("", record.subtitle());
        assert_eq!(None, record.published_at());
        assert_eq!(None, record.image_url());
    }

    #[tokio::test]
    async fn only_first_item_is_used() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Items": [
                {"Item": {"title": "first"}},
                {"Item": {"title": "second"}}
            ]}"#)
            .create_async().await;

        let record = client_for(&server)
            .lookup_by_isbn("9784000000000").await
            .unwrap()
            .unwrap();

        assert_eq!("first", record.title());
    }

    #[tokio::test]
    async fn non_json_body_is_parse_error() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async().await;

        let result = client_for(&server).lookup_by_isbn("9784000000000").await;

        assert!(matches!(result, Err(ClientError::ResponseParseFailed(_))));
        assert!(!result.unwrap_err().is_upstream());
    }

    #[tokio::test]
    async fn invalid_endpoint_is_base_url_error() {
        let client = Client::with_endpoint(APPLICATION_ID, "not an endpoint");

        let result = client.lookup_by_isbn("9784000000000").await;

        assert_eq!(Err(ClientError::InvalidBaseUrl), result);
    }

    #[tokio::test]
    async fn concurrent_lookups_return_their_own_records() {
        let mut server = Server::new_async().await;
        let _first = server.mock("GET", SEARCH_PATH)
            .match_query(query_for("9784062748681"))
            .with_status(200)
            .with_body(single_item_body("ノルウェイの森", "https://example.com/a.jpg?_ex=100x100&other=1"))
            .create_async().await;
        let _second = server.mock("GET", SEARCH_PATH)
            .match_query(query_for("9784101001616"))
            .with_status(200)
            .with_body(single_item_body("人間失格", "https://example.com/b.jpg"))
            .create_async().await;

        let client = client_for(&server);
        let (first, second) = tokio::join!(
            client.lookup_by_isbn("9784062748681"),
            client.lookup_by_isbn("9784101001616"),
        );

        let first = first.unwrap().unwrap();
        let second = second.unwrap().unwrap();
        assert_eq!("ノルウェイの森", first.title());
        assert_eq!(Some("https://example.com/a.jpg?other=1"), first.image_url());
        assert_eq!("人間失格", second.title());
        assert_eq!(Some("https://example.com/b.jpg"), second.image_url());
    }

    #[test]
    fn empty_or_false_error_field_is_ignored() {
        assert_eq!(None, upstream_error(&serde_json::json!({"error": ""})));
        assert_eq!(None, upstream_error(&serde_json::json!({"error": null})));
        assert_eq!(None, upstream_error(&serde_json::json!({"Items": []})));
        assert_eq!(Some("500".to_owned()), upstream_error(&serde_json::json!({"error": 500})));
    }

    #[test]
    fn zero_error_field_is_not_found_instead_of_error() {
        assert_eq!(None, upstream_error(&serde_json::json!({"error": 0})));
        assert_eq!(None, upstream_error(&serde_json::json!({"error": 0.0})));

        let result = parse_search_response("9784000000000", r#"{"error": 0, "Items": []}"#);

        assert_eq!(Ok(None), result);
    }

    #[test]
    fn malformed_later_items_are_ignored() {
        let missing_item = parse_search_response(
            "9784000000000",
            r#"{"Items": [{"Item": {"title": "first"}}, {"notItem": 1}]}"#,
        ).unwrap().unwrap();
        let wrong_type = parse_search_response(
            "9784000000000",
            r#"{"Items": [{"Item": {"title": "first"}}, {"Item": {"title": 42}}]}"#,
        ).unwrap().unwrap();

        assert_eq!("first", missing_item.title());
        assert_eq!("first", wrong_type.title());
    }

    #[test]
    fn empty_large_image_url_is_kept_as_empty_string() {
        let record = parse_search_response(
            "9784000000000",
            r#"{"Items": [{"Item": {"title": "t", "largeImageUrl": ""}}]}"#,
        ).unwrap().unwrap();

        assert_eq!(Some(""), record.image_url());
    }

    #[test]
    fn missing_items_without_error_is_parse_error() {
        let result = parse_search_response("9784000000000", r#"{"count": 0}"#);

        assert!(matches!(result, Err(ClientError::ResponseParseFailed(_))));
    }

    #[test]
    fn search_url_carries_credential_and_isbn() {
        let client = Client::new("app id");

        let url = client.build_search_url("978-4-06-274868-1").unwrap();

        assert_eq!(
            "https://app.rakuten.co.jp/services/api/BooksBook/Search/20170404?applicationId=app+id&isbn=978-4-06-274868-1",
            url.as_str()
        );
    }
}
