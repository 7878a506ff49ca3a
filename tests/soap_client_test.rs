use httpmock::prelude::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use twinfield::{
    BankTransaction, BankTransactionApiConnector, Credentials, Destiny, Office, ProcessXml,
    SendReport, SoapProcessXmlClient, TwinfieldConfig, TwinfieldError,
};

const MIXED_RESPONSE: &str =
    include_str!("fixtures/2-failed-and-1-successful-banktransactions.xml");

const PROCESS_XML_PATH: &str = "/webservices/processxml.asmx";

fn soap_response(document: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <ProcessXmlStringResponse xmlns="http://www.twinfield.com/">
      <ProcessXmlStringResult>{}</ProcessXmlStringResult>
    </ProcessXmlStringResponse>
  </soap:Body>
</soap:Envelope>"#,
        quick_xml::escape::escape(document)
    )
}

fn session_client(server: &MockServer, retry_attempts: u32) -> SoapProcessXmlClient {
    SoapProcessXmlClient::with_options(
        &server.base_url(),
        Credentials::Session {
            session_id: "session-123".to_string(),
        },
        Duration::from_secs(5),
        retry_attempts,
        Duration::from_millis(10),
    )
    .unwrap()
}

fn create_bank_transaction() -> BankTransaction {
    BankTransaction::new()
        .with_destiny(Destiny::Temporary)
        .with_office(Office::from_code("XXX101"))
}

#[tokio::test]
async fn test_send_document_posts_soap_envelope() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(PROCESS_XML_PATH)
            .header("SOAPAction", "\"http://www.twinfield.com/ProcessXmlString\"")
            .body_contains("<SessionID>session-123</SessionID>")
            .body_contains("<xmlRequest>&lt;transactions&gt;");
        then.status(200)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(soap_response(r#"<transactions result="1"><transaction result="1"><header/></transaction></transactions>"#));
    });

    let client = session_client(&server, 0);
    let response = client
        .send_document("<transactions><transaction/></transactions>")
        .await
        .unwrap();

    api_mock.assert();
    assert!(response.is_successful());
}

#[tokio::test]
async fn test_soap_fault_is_reported() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(PROCESS_XML_PATH);
        then.status(500).header("Content-Type", "text/xml").body(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Server</faultcode><faultstring>Session expired</faultstring></soap:Fault></soap:Body></soap:Envelope>"#,
        );
    });

    let client = session_client(&server, 2);
    let err = client.send_document("<transactions/>").await.unwrap_err();

    // SOAP faults are not retried
    api_mock.assert_hits(1);
    match err {
        TwinfieldError::SoapFault { code, message } => {
            assert_eq!(code, "soap:Server");
            assert_eq!(message, "Session expired");
        }
        other => panic!("expected SOAP fault, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(PROCESS_XML_PATH);
        then.status(503).body("Service Unavailable");
    });

    let client = session_client(&server, 2);
    let err = client.send_document("<transactions/>").await.unwrap_err();

    api_mock.assert_hits(3);
    assert!(matches!(err, TwinfieldError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(PROCESS_XML_PATH);
        then.status(404).body("Not Found");
    });

    let client = session_client(&server, 3);
    let err = client.send_document("<transactions/>").await.unwrap_err();

    api_mock.assert_hits(1);
    assert!(matches!(err, TwinfieldError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_end_to_end_from_config_file() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(PROCESS_XML_PATH)
            .body_contains("<AccessToken>token-abc</AccessToken>")
            .body_contains("<CompanyCode>NL001</CompanyCode>");
        then.status(200)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(soap_response(MIXED_RESPONSE));
    });

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[connection]
cluster_url = "{}"
access_token = "token-abc"
company_code = "NL001"

[request]
timeout_seconds = 5
chunk_size = 25
"#,
        server.base_url()
    )
    .unwrap();

    let config = TwinfieldConfig::from_file(config_file.path()).unwrap();
    let connector = BankTransactionApiConnector::new(config.build_client().unwrap())
        .with_chunk_size(config.chunk_size());

    let results = connector
        .send_all(vec![
            create_bank_transaction(),
            create_bank_transaction(),
            create_bank_transaction(),
        ])
        .await
        .unwrap();

    api_mock.assert();
    let report = SendReport::from_results(&results);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected, 2);
    assert_eq!(report.items[2].number.as_deref(), Some("201700334"));
}
