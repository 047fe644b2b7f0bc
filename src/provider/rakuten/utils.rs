use crate::provider::ClientError;
use reqwest::Url;

/// 이미지 크기 조절 파라미터 (`_ex=200x200` 과 같은 형태)
const RESIZE_DIRECTIVE_KEY: &str = "_ex";

/// 이미지 주소에서 크기 조절 파라미터(`_ex`)를 제거해 원본 크기의 이미지 주소를 반환한다.
///
/// 나머지 쿼리 파라미터와 경로, 프래그먼트는 그대로 유지 되며 제거 후 남은 파라미터가 없으면 `?`도 함께 제거 된다.
/// 파라미터가 없는 주소는 파싱 후 다시 직렬화만 하므로 인코딩 외에는 달라지지 않는다.
pub fn strip_resize_directive(raw: &str) -> Result<String, ClientError> {
    let mut url = Url::parse(raw)
        .map_err(|e| ClientError::InvalidImageUrl(format!("URL: {}, ERROR: {}", raw, e)))?;

    let has_directive = url.query_pairs()
        .any(|(key, _)| key == RESIZE_DIRECTIVE_KEY);
    if !has_directive {
        return Ok(url.to_string());
    }

    let retained: Vec<(String, String)> = url.query_pairs()
        .filter(|(key, _)| key != RESIZE_DIRECTIVE_KEY)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if retained.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained);
    }

    Ok(url.to_string())
}
