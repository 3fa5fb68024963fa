use crate::sanitize::strip_forum_chrome;

pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

/// html2md conversion: no hard wrapping, hyperlinks kept inline as `[text](href)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        let cleaned = strip_forum_chrome(html);
        html2md::parse_html(&cleaned).trim().to_string()
    }
}
