use crate::domain::model::{Currency, DebitCredit, Destiny, LineType, Money, Office};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 銀行交易 (banktransaction)，欄位直接對應 Twinfield XML 的 header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankTransaction {
    pub destiny: Option<Destiny>,
    pub raise_warning: Option<bool>,
    pub auto_balance_vat: Option<bool>,
    pub office: Option<Office>,
    pub code: Option<String>,
    /// 由 Twinfield 產生的交易編號，只出現在回應中
    pub number: Option<String>,
    /// 格式 `YYYY/PP`
    pub period: Option<String>,
    pub currency: Option<Currency>,
    pub date: Option<NaiveDate>,
    pub statement_number: Option<u32>,
    pub origin: Option<String>,
    pub start_value: Option<Money>,
    pub close_value: Option<Money>,
    pub lines: Vec<BankTransactionLine>,
}

impl BankTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destiny(mut self, destiny: Destiny) -> Self {
        self.destiny = Some(destiny);
        self
    }

    pub fn with_raise_warning(mut self, raise_warning: bool) -> Self {
        self.raise_warning = Some(raise_warning);
        self
    }

    pub fn with_auto_balance_vat(mut self, auto_balance_vat: bool) -> Self {
        self.auto_balance_vat = Some(auto_balance_vat);
        self
    }

    pub fn with_office(mut self, office: Office) -> Self {
        self.office = Some(office);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_statement_number(mut self, statement_number: u32) -> Self {
        self.statement_number = Some(statement_number);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_start_value(mut self, value: Money) -> Self {
        self.start_value = Some(value);
        self
    }

    pub fn with_close_value(mut self, value: Money) -> Self {
        self.close_value = Some(value);
        self
    }

    pub fn add_line(&mut self, line: BankTransactionLine) {
        self.lines.push(line);
    }

    pub fn total_line(&self) -> Option<&BankTransactionLine> {
        self.lines.iter().find(|l| l.line_type == LineType::Total)
    }

    pub fn detail_lines(&self) -> impl Iterator<Item = &BankTransactionLine> {
        self.lines.iter().filter(|l| l.line_type == LineType::Detail)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransactionLine {
    pub line_type: LineType,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub dim1: Option<String>,
    #[serde(default)]
    pub dim2: Option<String>,
    #[serde(default)]
    pub dim3: Option<String>,
    #[serde(default)]
    pub debit_credit: Option<DebitCredit>,
    #[serde(default)]
    pub value: Option<Money>,
    #[serde(default)]
    pub vat_code: Option<String>,
    #[serde(default)]
    pub vat_value: Option<Money>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl BankTransactionLine {
    pub fn new(line_type: LineType) -> Self {
        Self {
            line_type,
            id: None,
            dim1: None,
            dim2: None,
            dim3: None,
            debit_credit: None,
            value: None,
            vat_code: None,
            vat_value: None,
            invoice_number: None,
            description: None,
            comment: None,
        }
    }

    pub fn total() -> Self {
        Self::new(LineType::Total)
    }

    pub fn detail() -> Self {
        Self::new(LineType::Detail)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_dim1(mut self, dim1: impl Into<String>) -> Self {
        self.dim1 = Some(dim1.into());
        self
    }

    pub fn with_dim2(mut self, dim2: impl Into<String>) -> Self {
        self.dim2 = Some(dim2.into());
        self
    }

    pub fn with_dim3(mut self, dim3: impl Into<String>) -> Self {
        self.dim3 = Some(dim3.into());
        self
    }

    pub fn with_debit_credit(mut self, debit_credit: DebitCredit) -> Self {
        self.debit_credit = Some(debit_credit);
        self
    }

    pub fn with_value(mut self, value: Money) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_vat_code(mut self, vat_code: impl Into<String>) -> Self {
        self.vat_code = Some(vat_code.into());
        self
    }

    pub fn with_vat_value(mut self, vat_value: Money) -> Self {
        self.vat_value = Some(vat_value);
        self
    }

    pub fn with_invoice_number(mut self, invoice_number: impl Into<String>) -> Self {
        self.invoice_number = Some(invoice_number.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
