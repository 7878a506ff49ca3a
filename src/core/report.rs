use crate::core::connector::ItemResult;
use crate::domain::bank_transaction::BankTransaction;
use crate::utils::error::TwinfieldError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub index: usize,
    pub status: ItemStatus,
    pub number: Option<String>,
    pub messages: Vec<String>,
}

/// 批次送出結果的摘要，CLI 以 JSON 輸出
#[derive(Debug, Clone, Serialize)]
pub struct SendReport {
    pub accepted: usize,
    pub rejected: usize,
    pub items: Vec<ItemReport>,
}

impl SendReport {
    pub fn from_results(results: &[ItemResult<BankTransaction>]) -> Self {
        let items: Vec<ItemReport> = results
            .iter()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(transaction) => ItemReport {
                    index,
                    status: ItemStatus::Accepted,
                    number: transaction.number.clone(),
                    messages: Vec::new(),
                },
                Err(TwinfieldError::Rejected { messages }) => ItemReport {
                    index,
                    status: ItemStatus::Rejected,
                    number: None,
                    messages: messages.clone(),
                },
                Err(other) => ItemReport {
                    index,
                    status: ItemStatus::Rejected,
                    number: None,
                    messages: vec![other.to_string()],
                },
            })
            .collect();

        let rejected = items
            .iter()
            .filter(|i| i.status == ItemStatus::Rejected)
            .count();

        Self {
            accepted: items.len() - rejected,
            rejected,
            items,
        }
    }

    pub fn has_rejections(&self) -> bool {
        self.rejected > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_and_json() {
        let mut accepted = BankTransaction::new();
        accepted.number = Some("201700334".to_string());
        let results = vec![
            Err(TwinfieldError::Rejected {
                messages: vec!["Not balanced.".to_string()],
            }),
            Ok(accepted),
            Err(TwinfieldError::MissingElement("transaction/header".to_string())),
        ];

        let report = SendReport::from_results(&results);

        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected, 2);
        assert!(report.has_rejections());
        assert_eq!(report.items[1].number.as_deref(), Some("201700334"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["items"][0]["status"], "rejected");
        assert_eq!(json["items"][0]["messages"][0], "Not balanced.");
        assert_eq!(json["items"][1]["status"], "accepted");
        assert!(json["items"][2]["messages"][0]
            .as_str()
            .unwrap()
            .contains("transaction/header"));
    }
}
