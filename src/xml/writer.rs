use crate::domain::bank_transaction::{BankTransaction, BankTransactionLine};
use crate::utils::error::{Result, TwinfieldError};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub(crate) const DATE_FORMAT: &str = "%Y%m%d";

/// 將多筆銀行交易序列化成一份 `<transactions>` 請求文件
pub struct BankTransactionsDocument<'a> {
    transactions: &'a [BankTransaction],
}

impl<'a> BankTransactionsDocument<'a> {
    pub fn new(transactions: &'a [BankTransaction]) -> Self {
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        writer.write_event(Event::Start(BytesStart::new("transactions")))?;
        for transaction in self.transactions {
            write_transaction(&mut writer, transaction)?;
        }
        writer.write_event(Event::End(BytesEnd::new("transactions")))?;

        into_string(writer)
    }
}

pub(crate) fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner())
        .map_err(|e| TwinfieldError::invalid_value("document", e.to_string()))
}

pub(crate) fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_optional(writer: &mut Writer<Vec<u8>>, name: &str, text: Option<&str>) -> Result<()> {
    match text {
        Some(text) => write_text_element(writer, name, text),
        None => Ok(()),
    }
}

fn bool_attribute(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn write_transaction(writer: &mut Writer<Vec<u8>>, transaction: &BankTransaction) -> Result<()> {
    let mut start = BytesStart::new("transaction");
    if let Some(destiny) = transaction.destiny {
        start.push_attribute(("destiny", destiny.as_str()));
    }
    if let Some(raise_warning) = transaction.raise_warning {
        start.push_attribute(("raisewarning", bool_attribute(raise_warning)));
    }
    if let Some(auto_balance_vat) = transaction.auto_balance_vat {
        start.push_attribute(("autobalancevat", bool_attribute(auto_balance_vat)));
    }
    writer.write_event(Event::Start(start))?;

    writer.write_event(Event::Start(BytesStart::new("header")))?;
    write_optional(writer, "office", transaction.office.as_ref().map(|o| o.code()))?;
    write_optional(writer, "code", transaction.code.as_deref())?;
    write_optional(writer, "number", transaction.number.as_deref())?;
    write_optional(writer, "period", transaction.period.as_deref())?;
    write_optional(writer, "currency", transaction.currency.as_ref().map(|c| c.code()))?;
    if let Some(date) = transaction.date {
        write_text_element(writer, "date", &date.format(DATE_FORMAT).to_string())?;
    }
    if let Some(statement_number) = transaction.statement_number {
        write_text_element(writer, "statementnumber", &statement_number.to_string())?;
    }
    write_optional(writer, "origin", transaction.origin.as_deref())?;
    if let Some(start_value) = &transaction.start_value {
        write_text_element(writer, "startvalue", &start_value.to_wire())?;
    }
    if let Some(close_value) = &transaction.close_value {
        write_text_element(writer, "closevalue", &close_value.to_wire())?;
    }
    writer.write_event(Event::End(BytesEnd::new("header")))?;

    writer.write_event(Event::Start(BytesStart::new("lines")))?;
    for line in &transaction.lines {
        write_line(writer, line)?;
    }
    writer.write_event(Event::End(BytesEnd::new("lines")))?;

    writer.write_event(Event::End(BytesEnd::new("transaction")))?;
    Ok(())
}

fn write_line(writer: &mut Writer<Vec<u8>>, line: &BankTransactionLine) -> Result<()> {
    let mut start = BytesStart::new("line");
    start.push_attribute(("type", line.line_type.as_str()));
    if let Some(id) = &line.id {
        start.push_attribute(("id", id.as_str()));
    }
    writer.write_event(Event::Start(start))?;

    write_optional(writer, "dim1", line.dim1.as_deref())?;
    write_optional(writer, "dim2", line.dim2.as_deref())?;
    write_optional(writer, "dim3", line.dim3.as_deref())?;
    write_optional(writer, "debitcredit", line.debit_credit.map(|dc| dc.as_str()))?;
    if let Some(value) = &line.value {
        write_text_element(writer, "value", &value.to_wire())?;
    }
    write_optional(writer, "vatcode", line.vat_code.as_deref())?;
    if let Some(vat_value) = &line.vat_value {
        write_text_element(writer, "vatvalue", &vat_value.to_wire())?;
    }
    write_optional(writer, "invoicenumber", line.invoice_number.as_deref())?;
    write_optional(writer, "description", line.description.as_deref())?;
    write_optional(writer, "comment", line.comment.as_deref())?;

    writer.write_event(Event::End(BytesEnd::new("line")))?;
    Ok(())
}
