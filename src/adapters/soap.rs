use crate::domain::ports::ProcessXml;
use crate::utils::error::{Result, TwinfieldError};
use crate::xml::element::Element;
use crate::xml::response::Response;
use crate::xml::writer::{into_string, write_text_element};
use async_trait::async_trait;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use reqwest::Client;
use std::time::Duration;

pub const PROCESS_XML_PATH: &str = "/webservices/processxml.asmx";
const SOAP_ACTION: &str = "http://www.twinfield.com/ProcessXmlString";
const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const TWINFIELD_NS: &str = "http://www.twinfield.com/";

/// 已取得的 Twinfield 憑證 (不負責登入流程)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Session {
        session_id: String,
    },
    AccessToken {
        access_token: String,
        company_code: String,
    },
}

#[derive(Debug, Clone)]
pub struct SoapProcessXmlClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl SoapProcessXmlClient {
    pub fn new(cluster_url: &str, credentials: Credentials) -> Result<Self> {
        Self::with_options(cluster_url, credentials, Duration::from_secs(30), 0, Duration::ZERO)
    }

    pub fn with_options(
        cluster_url: &str,
        credentials: Credentials,
        timeout: Duration,
        retry_attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", cluster_url.trim_end_matches('/'), PROCESS_XML_PATH),
            credentials,
            retry_attempts,
            retry_delay,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 建立 SOAP 1.1 envelope，請求文件以跳脫後的文字放在 `xmlRequest` 中
    pub fn envelope(&self, document: &str) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut envelope = BytesStart::new("soap:Envelope");
        envelope.push_attribute(("xmlns:soap", SOAP_ENVELOPE_NS));
        writer.write_event(Event::Start(envelope))?;

        writer.write_event(Event::Start(BytesStart::new("soap:Header")))?;
        let mut header = BytesStart::new("Header");
        header.push_attribute(("xmlns", TWINFIELD_NS));
        writer.write_event(Event::Start(header))?;
        match &self.credentials {
            Credentials::Session { session_id } => {
                write_text_element(&mut writer, "SessionID", session_id)?;
            }
            Credentials::AccessToken {
                access_token,
                company_code,
            } => {
                write_text_element(&mut writer, "AccessToken", access_token)?;
                write_text_element(&mut writer, "CompanyCode", company_code)?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("Header")))?;
        writer.write_event(Event::End(BytesEnd::new("soap:Header")))?;

        writer.write_event(Event::Start(BytesStart::new("soap:Body")))?;
        let mut process = BytesStart::new("ProcessXmlString");
        process.push_attribute(("xmlns", TWINFIELD_NS));
        writer.write_event(Event::Start(process))?;
        write_text_element(&mut writer, "xmlRequest", document)?;
        writer.write_event(Event::End(BytesEnd::new("ProcessXmlString")))?;
        writer.write_event(Event::End(BytesEnd::new("soap:Body")))?;

        writer.write_event(Event::End(BytesEnd::new("soap:Envelope")))?;
        into_string(writer)
    }

    async fn post_envelope(&self, envelope: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.post_once(envelope).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt <= self.retry_attempts && is_retryable(&e) => {
                    tracing::warn!(
                        "🔄 ProcessXml request failed (attempt {}/{}): {}",
                        attempt,
                        self.retry_attempts + 1,
                        e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_once(&self, envelope: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}\"", SOAP_ACTION))
            .body(envelope.to_string())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 ProcessXml response status: {}", status);
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        // SOAP 1.1 以 HTTP 500 回傳 fault
        if let Some(fault) = soap_fault(&body) {
            return Err(fault);
        }

        Err(TwinfieldError::HttpStatus {
            status: status.as_u16(),
            body,
        })
    }
}

fn is_retryable(error: &TwinfieldError) -> bool {
    match error {
        TwinfieldError::Http(_) => true,
        TwinfieldError::HttpStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

fn soap_fault(body: &str) -> Option<TwinfieldError> {
    let envelope = Element::parse(body).ok()?;
    envelope.child("Body")?.child("Fault").map(fault_error)
}

fn fault_error(fault: &Element) -> TwinfieldError {
    TwinfieldError::SoapFault {
        code: fault.child_text("faultcode").unwrap_or_default().to_string(),
        message: fault.child_text("faultstring").unwrap_or_default().to_string(),
    }
}

/// 從 SOAP 回應中取出 `ProcessXmlStringResult` 並解析成 [`Response`]
pub fn parse_envelope(body: &str) -> Result<Response> {
    let envelope = Element::parse(body)?;
    let soap_body = envelope
        .child("Body")
        .ok_or_else(|| TwinfieldError::MissingElement("Envelope/Body".to_string()))?;

    if let Some(fault) = soap_body.child("Fault") {
        return Err(fault_error(fault));
    }

    let result = soap_body
        .child("ProcessXmlStringResponse")
        .and_then(|r| r.child("ProcessXmlStringResult"))
        .ok_or_else(|| {
            TwinfieldError::MissingElement(
                "Envelope/Body/ProcessXmlStringResponse/ProcessXmlStringResult".to_string(),
            )
        })?;

    result.text.parse()
}

#[async_trait]
impl ProcessXml for SoapProcessXmlClient {
    async fn send_document(&self, document: &str) -> Result<Response> {
        let envelope = self.envelope(document)?;
        tracing::debug!(
            "📡 Posting ProcessXml request to {} ({} bytes)",
            self.endpoint,
            envelope.len()
        );

        let body = self.post_envelope(&envelope).await?;
        tracing::debug!("📡 ProcessXml response received ({} bytes)", body.len());

        parse_envelope(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_client() -> SoapProcessXmlClient {
        SoapProcessXmlClient::new(
            "https://c3.twinfield.com/",
            Credentials::Session {
                session_id: "abc-123".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_cluster_url() {
        assert_eq!(
            session_client().endpoint(),
            "https://c3.twinfield.com/webservices/processxml.asmx"
        );
    }

    #[test]
    fn test_envelope_carries_session_and_escaped_document() {
        let envelope = session_client()
            .envelope("<transactions><transaction destiny=\"temporary\"/></transactions>")
            .unwrap();

        assert!(envelope.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(envelope.contains("<SessionID>abc-123</SessionID>"));
        assert!(envelope.contains("<xmlRequest>&lt;transactions&gt;"));

        let parsed = Element::parse(&envelope).unwrap();
        let request = parsed
            .child("Body")
            .and_then(|b| b.child("ProcessXmlString"))
            .and_then(|p| p.child("xmlRequest"))
            .unwrap();
        assert_eq!(
            request.text,
            "<transactions><transaction destiny=\"temporary\"/></transactions>"
        );
    }

    #[test]
    fn test_envelope_with_access_token() {
        let client = SoapProcessXmlClient::new(
            "https://api.accounting.twinfield.com",
            Credentials::AccessToken {
                access_token: "token".to_string(),
                company_code: "NL001".to_string(),
            },
        )
        .unwrap();

        let envelope = client.envelope("<transactions/>").unwrap();

        assert!(envelope.contains("<AccessToken>token</AccessToken><CompanyCode>NL001</CompanyCode>"));
        assert!(!envelope.contains("SessionID"));
    }

    #[test]
    fn test_parse_envelope_result_and_fault() {
        let ok = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>
<ProcessXmlStringResponse xmlns="http://www.twinfield.com/"><ProcessXmlStringResult>&lt;transactions result="1"&gt;&lt;transaction result="1"/&gt;&lt;/transactions&gt;</ProcessXmlStringResult></ProcessXmlStringResponse>
</soap:Body></soap:Envelope>"#;
        let response = parse_envelope(ok).unwrap();
        assert!(response.is_successful());

        let fault = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Client</faultcode><faultstring>Access denied</faultstring></soap:Fault></soap:Body></soap:Envelope>"#;
        match parse_envelope(fault) {
            Err(TwinfieldError::SoapFault { code, message }) => {
                assert_eq!(code, "soap:Client");
                assert_eq!(message, "Access denied");
            }
            other => panic!("expected SOAP fault, got {:?}", other),
        }

        let empty = r#"<soap:Envelope xmlns:soap="x"><soap:Body/></soap:Envelope>"#;
        assert!(matches!(
            parse_envelope(empty),
            Err(TwinfieldError::MissingElement(_))
        ));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable(&TwinfieldError::HttpStatus {
            status: 503,
            body: String::new()
        }));
        assert!(!is_retryable(&TwinfieldError::HttpStatus {
            status: 400,
            body: String::new()
        }));
        assert!(!is_retryable(&TwinfieldError::SoapFault {
            code: String::new(),
            message: String::new()
        }));
    }
}
