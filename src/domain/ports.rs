use crate::utils::error::Result;
use crate::xml::response::Response;
use async_trait::async_trait;

/// Twinfield ProcessXml 服務：送出一份 XML 文件並取回回應文件
#[async_trait]
pub trait ProcessXml: Send + Sync {
    async fn send_document(&self, document: &str) -> Result<Response>;
}

#[async_trait]
impl<T: ProcessXml + ?Sized> ProcessXml for std::sync::Arc<T> {
    async fn send_document(&self, document: &str) -> Result<Response> {
        (**self).send_document(document).await
    }
}
