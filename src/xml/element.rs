use crate::utils::error::{Result, TwinfieldError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// 從 quick-xml 事件建立的簡易節點樹。
///
/// 只保留 local name (去掉 namespace prefix)、屬性、文字與子節點，
/// 足以讀取 Twinfield 的回應文件。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let element = Self::open(&start)?;
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        Self::attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = stack.last() {
            return Err(TwinfieldError::MissingElement(format!(
                "closing tag for <{}>",
                unclosed.name
            )));
        }

        root.ok_or_else(|| TwinfieldError::MissingElement("document root".to_string()))
    }

    fn open(start: &BytesStart<'_>) -> Result<Element> {
        let mut element = Element::new(String::from_utf8_lossy(start.local_name().as_ref()));

        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }

        Ok(element)
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => {
                if root.is_none() {
                    *root = Some(element);
                }
            }
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// 子節點的文字；空字串視為不存在
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.trim())
            .filter(|text| !text.is_empty())
    }

    /// Pre-order walk, starting with `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(element) = pending.pop() {
            out.push(element);
            pending.extend(element.children.iter().rev());
        }
        out
    }
}
