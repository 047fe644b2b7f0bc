use serde::Serialize;

/// 도서 검색 결과로 반환 되는 정규화된 도서 정보
///
/// 외부 API의 응답 형식과 관계 없이 같은 모양으로 반환 되며, 필드 단위의 검증은 하지 않는다.
/// 응답에 없는 문자열 필드는 빈 문자열로 채워진다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    author: String,
    title: String,
    subtitle: String,
    description: String,
    publisher: String,

    /// 외부 API에서 받은 날짜 문자열 그대로 (파싱하지 않음)
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,

    /// 판매처 상세 페이지 주소, 현재 매핑에서는 설정 되지 않는다.
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_url: Option<String>,
}

impl BookRecord {
    pub fn builder() -> BookRecordBuilder {
        BookRecordBuilder::new()
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn published_at(&self) -> Option<&str> {
        self.published_at.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn vendor_url(&self) -> Option<&str> {
        self.vendor_url.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct BookRecordBuilder {
    author: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    description: Option<String>,
    publisher: Option<String>,
    published_at: Option<String>,
    image_url: Option<String>,
    vendor_url: Option<String>,
}

impl BookRecordBuilder {
    pub fn new() -> Self {
        BookRecordBuilder::default()
    }

    pub fn author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle<S: Into<String>>(mut self, subtitle: S) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn publisher<S: Into<String>>(mut self, publisher: S) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn published_at<S: Into<String>>(mut self, published_at: S) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn image_url<S: Into<String>>(mut self, image_url: S) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn vendor_url<S: Into<String>>(mut self, vendor_url: S) -> Self {
        self.vendor_url = Some(vendor_url.into());
        self
    }

    /// 필수 필드도 검증 하지 않으며 설정 되지 않은 문자열 필드는 빈 문자열이 된다.
    pub fn build(self) -> BookRecord {
        BookRecord {
            author: self.author.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            subtitle: self.subtitle.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            publisher: self.publisher.unwrap_or_default(),
            published_at: self.published_at,
            image_url: self.image_url,
            vendor_url: self.vendor_url,
        }
    }
}
