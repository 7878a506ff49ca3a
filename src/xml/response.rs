use crate::utils::error::{Result, TwinfieldError};
use crate::xml::element::Element;
use std::str::FromStr;

/// ProcessXml 回應文件。
///
/// Twinfield 在每個節點上以 `msgtype` / `msg` 屬性回報訊息，
/// 並在根節點以 `result="1"` 表示成功。
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    root: Element,
}

impl Response {
    pub fn from_element(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    pub fn is_successful(&self) -> bool {
        self.root.attribute("result") == Some("1")
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.messages("error")
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.messages("warning")
    }

    fn messages(&self, msgtype: &str) -> Vec<String> {
        self.root
            .descendants()
            .into_iter()
            .filter(|e| e.attribute("msgtype") == Some(msgtype))
            .filter_map(|e| e.attribute("msg"))
            .map(str::to_string)
            .collect()
    }

    pub fn assert_successful(&self) -> Result<()> {
        if self.is_successful() {
            Ok(())
        } else {
            Err(TwinfieldError::Rejected {
                messages: self.error_messages(),
            })
        }
    }

    /// 把回應拆成每個項目自己的子文件。
    ///
    /// 若根節點本身就是該項目 (只送出一筆時 Twinfield 可能不包外層)，
    /// 則回傳只含自己的列表。
    pub fn into_items(self, item_name: &str) -> Vec<Response> {
        if self.root.name == item_name {
            return vec![self];
        }
        self.root
            .children
            .into_iter()
            .filter(|child| child.name == item_name)
            .map(Response::from_element)
            .collect()
    }
}

impl FromStr for Response {
    type Err = TwinfieldError;

    fn from_str(s: &str) -> Result<Self> {
        Element::parse(s).map(Response::from_element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = r#"<transactions result="0">
  <transaction result="0">
    <header><office msgtype="error" msg="Office unknown.">NOPE</office></header>
    <lines><line type="total"><value msgtype="error" msg="Value missing."/></line></lines>
  </transaction>
  <transaction result="1">
    <header><office>OFFICE001</office><period msgtype="warning" msg="Period is closing.">2017/08</period></header>
  </transaction>
</transactions>"#;

    #[test]
    fn test_mixed_response_is_not_successful() {
        let response: Response = MIXED.parse().unwrap();

        assert!(!response.is_successful());
        assert_eq!(
            response.error_messages(),
            vec!["Office unknown.".to_string(), "Value missing.".to_string()]
        );
        assert_eq!(response.warning_messages(), vec!["Period is closing.".to_string()]);

        let err = response.assert_successful().unwrap_err();
        assert_eq!(err.to_string(), "Office unknown., Value missing.");
    }

    #[test]
    fn test_items_are_judged_independently() {
        let items = MIXED.parse::<Response>().unwrap().into_items("transaction");

        assert_eq!(items.len(), 2);
        assert!(!items[0].is_successful());
        assert_eq!(items[0].error_messages().len(), 2);
        assert!(items[1].is_successful());
        assert!(items[1].error_messages().is_empty());
        assert!(items[1].assert_successful().is_ok());
    }

    #[test]
    fn test_root_item_is_its_own_item() {
        let response: Response = r#"<transaction result="1"><header/></transaction>"#.parse().unwrap();
        let items = response.into_items("transaction");
        assert_eq!(items.len(), 1);
        assert!(items[0].is_successful());
    }

    #[test]
    fn test_missing_result_attribute_is_unsuccessful() {
        let response: Response = "<transactions/>".parse().unwrap();
        assert!(!response.is_successful());
        assert!(response.into_items("transaction").is_empty());
    }
}
