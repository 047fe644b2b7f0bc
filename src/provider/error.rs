use std::fmt;
use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// 외부 API가 응답 본문의 `error` 필드로 직접 알린 오류, 메시지는 받은 값 그대로 보관한다.
    Upstream(String),

    InvalidBaseUrl,
    RequestFailed(String),
    ResponseTextExtractionFailed(String),
    ResponseParseFailed(String),
    InvalidImageUrl(String),
}

impl ClientError {
    /// 외부 API가 보낸 오류인지 여부, `false`라면 네트워크/파싱 단계의 오류이다.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ClientError::Upstream(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Upstream(message) => write!(f, "{}", message),
            ClientError::InvalidBaseUrl => write!(f, "Invalid base url"),
            ClientError::RequestFailed(message) => write!(f, "Request failed, {}", message),
            ClientError::ResponseTextExtractionFailed(message) => write!(f, "Response text extraction failed, {}", message),
            ClientError::ResponseParseFailed(message) => write!(f, "Response parse failed, {}", message),
            ClientError::InvalidImageUrl(message) => write!(f, "Invalid image url, {}", message),
        }
    }
}

impl std::error::Error for ClientError {}
