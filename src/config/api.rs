use crate::provider::rakuten;
use serde::Deserialize;

/// 라쿠텐 API 접속 정보
#[derive(Debug, Deserialize)]
pub struct Rakuten {
    application_id: String,

    /// 설정 하지 않을 시 [`rakuten::RAKUTEN_BOOKS_ENDPOINT`]를 사용한다.
    endpoint: Option<String>,
}

impl Rakuten {
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(rakuten::RAKUTEN_BOOKS_ENDPOINT)
    }

    pub fn new_client(&self) -> rakuten::Client {
        rakuten::Client::with_endpoint(self.application_id.clone(), self.endpoint())
    }
}
