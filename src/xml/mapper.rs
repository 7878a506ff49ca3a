use crate::domain::bank_transaction::{BankTransaction, BankTransactionLine};
use crate::domain::model::{Currency, Destiny, LineType, Money, Office};
use crate::utils::error::{Result, TwinfieldError};
use crate::xml::element::Element;
use crate::xml::writer::DATE_FORMAT;
use chrono::NaiveDate;
use std::str::FromStr;

/// 將回應中的 `<transaction>` 節點轉回 [`BankTransaction`]
pub struct BankTransactionMapper;

impl BankTransactionMapper {
    pub fn map(element: &Element) -> Result<BankTransaction> {
        if element.name != "transaction" {
            return Err(TwinfieldError::MissingElement(format!(
                "transaction (found <{}>)",
                element.name
            )));
        }

        let header = element
            .child("header")
            .ok_or_else(|| TwinfieldError::MissingElement("transaction/header".to_string()))?;

        let currency = header.child_text("currency").map(Currency::new).transpose()?;
        let amount_currency = currency.clone().unwrap_or_else(Currency::eur);

        let mut transaction = BankTransaction {
            destiny: element
                .attribute("destiny")
                .or_else(|| element.attribute("location"))
                .map(Destiny::from_str)
                .transpose()?,
            raise_warning: parse_bool(element, "raisewarning")?,
            auto_balance_vat: parse_bool(element, "autobalancevat")?,
            office: header.child_text("office").map(Office::from_code),
            code: owned(header.child_text("code")),
            number: owned(header.child_text("number")),
            period: owned(header.child_text("period")),
            currency,
            date: parse_date(header, "date")?,
            statement_number: parse_number(header, "statementnumber")?,
            origin: owned(header.child_text("origin")),
            start_value: parse_money(header, "startvalue", &amount_currency)?,
            close_value: parse_money(header, "closevalue", &amount_currency)?,
            lines: Vec::new(),
        };

        if let Some(lines) = element.child("lines") {
            for line in lines.children_named("line") {
                transaction.add_line(Self::map_line(line, &amount_currency)?);
            }
        }

        Ok(transaction)
    }

    fn map_line(element: &Element, currency: &Currency) -> Result<BankTransactionLine> {
        let line_type = element
            .attribute("type")
            .ok_or_else(|| TwinfieldError::MissingElement("line/@type".to_string()))?
            .parse::<LineType>()?;

        Ok(BankTransactionLine {
            line_type,
            id: element.attribute("id").map(str::to_string),
            dim1: owned(element.child_text("dim1")),
            dim2: owned(element.child_text("dim2")),
            dim3: owned(element.child_text("dim3")),
            debit_credit: element
                .child_text("debitcredit")
                .map(str::parse)
                .transpose()?,
            value: parse_money(element, "value", currency)?,
            vat_code: owned(element.child_text("vatcode")),
            vat_value: parse_money(element, "vatvalue", currency)?,
            invoice_number: owned(element.child_text("invoicenumber")),
            description: owned(element.child_text("description")),
            comment: owned(element.child_text("comment")),
        })
    }
}

fn owned(text: Option<&str>) -> Option<String> {
    text.map(str::to_string)
}

fn parse_bool(element: &Element, name: &str) -> Result<Option<bool>> {
    match element.attribute(name) {
        None => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(other) => Err(TwinfieldError::invalid_value(
            name,
            format!("'{}' is not a boolean", other),
        )),
    }
}

fn parse_number<T>(element: &Element, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    element
        .child_text(name)
        .map(|text| {
            text.parse::<T>().map_err(|e| {
                TwinfieldError::invalid_value(name, format!("'{}' is not a number: {}", text, e))
            })
        })
        .transpose()
}

fn parse_date(element: &Element, name: &str) -> Result<Option<NaiveDate>> {
    element
        .child_text(name)
        .map(|text| {
            NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| {
                TwinfieldError::invalid_value(name, format!("'{}' is not a date: {}", text, e))
            })
        })
        .transpose()
}

fn parse_money(element: &Element, name: &str, currency: &Currency) -> Result<Option<Money>> {
    element
        .child_text(name)
        .map(|text| Money::parse(name, text, currency.clone()))
        .transpose()
}
