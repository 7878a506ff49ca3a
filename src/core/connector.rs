use crate::domain::bank_transaction::BankTransaction;
use crate::domain::ports::ProcessXml;
use crate::utils::error::{Result, TwinfieldError};
use crate::xml::element::Element;
use crate::xml::mapper::BankTransactionMapper;
use crate::xml::response::Response;
use crate::xml::writer::BankTransactionsDocument;

/// 每份請求文件最多包含的項目數
pub const DEFAULT_CHUNK_SIZE: usize = 25;

/// 單一項目的結果：成功時為對應的物件，失敗時為 Twinfield 回報的錯誤
pub type ItemResult<T> = std::result::Result<T, TwinfieldError>;

pub struct BankTransactionApiConnector<P: ProcessXml> {
    service: P,
    chunk_size: usize,
}

impl<P: ProcessXml> BankTransactionApiConnector<P> {
    pub fn new(service: P) -> Self {
        Self {
            service,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn service(&self) -> &P {
        &self.service
    }

    /// 送出單筆交易，失敗時直接回傳該筆的錯誤
    pub async fn send(&self, transaction: BankTransaction) -> Result<BankTransaction> {
        let results = self.send_all(vec![transaction]).await?;
        let actual = results.len();
        match results.into_iter().next() {
            Some(result) if actual == 1 => result,
            _ => Err(TwinfieldError::ResponseMismatch {
                expected: 1,
                actual,
            }),
        }
    }

    /// 批次送出交易。
    ///
    /// 回傳的列表與輸入順序一一對應；單筆被拒絕不會讓整批失敗。
    /// 外層錯誤只代表整份文件的問題 (傳輸、XML 解析、項目數不符)。
    pub async fn send_all(
        &self,
        transactions: Vec<BankTransaction>,
    ) -> Result<Vec<ItemResult<BankTransaction>>> {
        if transactions.is_empty() {
            tracing::debug!("No bank transactions to send");
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(transactions.len());

        for (index, chunk) in transactions.chunks(self.chunk_size).enumerate() {
            let document = BankTransactionsDocument::new(chunk).to_xml()?;
            tracing::debug!(
                "📤 Sending chunk {} with {} bank transactions ({} bytes)",
                index + 1,
                chunk.len(),
                document.len()
            );

            let response = self.service.send_document(&document).await?;
            results.extend(map_items(
                response,
                "transaction",
                chunk.len(),
                BankTransactionMapper::map,
            )?);
        }

        let rejected = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            "📨 Sent {} bank transactions: {} accepted, {} rejected",
            results.len(),
            results.len() - rejected,
            rejected
        );

        Ok(results)
    }
}

/// 依位置把回應項目對回請求項目，各自判斷成功與否。
pub fn map_items<T, F>(
    response: Response,
    item_name: &str,
    expected: usize,
    map: F,
) -> Result<Vec<ItemResult<T>>>
where
    F: Fn(&Element) -> Result<T>,
{
    // 整份文件被拒絕時不會有任何項目，錯誤訊息掛在根元素上
    let document_errors = if response.is_successful() {
        Vec::new()
    } else {
        response.error_messages()
    };

    let items = response.into_items(item_name);
    if items.is_empty() && !document_errors.is_empty() {
        return Err(TwinfieldError::Rejected {
            messages: document_errors,
        });
    }
    if items.len() != expected {
        return Err(TwinfieldError::ResponseMismatch {
            expected,
            actual: items.len(),
        });
    }

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            item.assert_successful()?;
            for warning in item.warning_messages() {
                tracing::warn!("⚠️ Item {} accepted with warning: {}", index + 1, warning);
            }
            map(item.root())
        })
        .collect())
}
