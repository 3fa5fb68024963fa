use scraper::{Html, Selector};

/// Discourse markup that converts to noise: heading permalinks, lightbox
/// captions and inline icons.
const FORUM_CHROME: &str = "a.anchor, div.lightbox-wrapper div.meta, svg";

/// Removes forum chrome from a cooked post, returning the remaining HTML fragment.
pub fn strip_forum_chrome(html: &str) -> String {
    let Ok(selector) = Selector::parse(FORUM_CHROME) else {
        return html.to_string();
    };
    let mut fragment = Html::parse_fragment(html);
    let doomed: Vec<_> = fragment.select(&selector).map(|element| element.id()).collect();
    if doomed.is_empty() {
        return html.to_string();
    }
    for id in doomed {
        if let Some(mut node) = fragment.tree.get_mut(id) {
            node.detach();
        }
    }
    fragment.root_element().inner_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_anchors_are_removed() {
        let html = r##"<h2><a name="intro-1" class="anchor" href="#intro-1"></a>Intro</h2>"##;
        let cleaned = strip_forum_chrome(html);
        assert!(!cleaned.contains("anchor"));
        assert!(cleaned.contains("Intro"));
    }

    #[test]
    fn lightbox_meta_is_removed_but_image_kept() {
        let html = r#"<div class="lightbox-wrapper"><a class="lightbox" href="/big.png"><img src="/small.png"><div class="meta"><svg class="fa"></svg><span class="filename">big.png</span></div></a></div>"#;
        let cleaned = strip_forum_chrome(html);
        assert!(cleaned.contains("small.png"));
        assert!(!cleaned.contains("filename"));
        assert!(!cleaned.contains("svg"));
    }

    #[test]
    fn plain_markup_is_returned_untouched() {
        let html = "<p>Hello <a href=\"https://example.com\">world</a></p>";
        assert_eq!(strip_forum_chrome(html), html);
    }
}
