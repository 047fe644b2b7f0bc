use crate::item::BookRecord;

pub mod error;
pub mod rakuten;

pub use error::ClientError;

/// ISBN으로 도서를 조회하는 클라이언트
///
/// 검색 결과가 없는 경우는 오류가 아니며 `Ok(None)`으로 반환 된다.
pub trait Client {
    fn lookup_by_isbn(&self, isbn: &str) -> impl Future<Output = Result<Option<BookRecord>, ClientError>> + Send;
}
