//! Plain text from the HTML fragments that route instructions arrive in.

use regex::Regex;
use std::sync::OnceLock;

static TAG: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

// `&amp;` goes last so an escaped entity such as `&amp;lt;` decodes once.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Reduce planner instruction markup to plain, speakable text.
///
/// Tags become word breaks so adjacent blocks do not run together, common
/// entities are decoded and whitespace is collapsed.
///
/// ```
/// use wayfarer_journey::strip_markup;
///
/// let html = "Walk to <b>Derby Bus Station</b><div style=\"font-size:0.9em\">Destination will be on the left</div>";
/// assert_eq!(
///     strip_markup(html),
///     "Walk to Derby Bus Station Destination will be on the left"
/// );
/// ```
pub fn strip_markup(html: &str) -> String {
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
    let whitespace =
        WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

    let mut text = tag.replace_all(html, " ").into_owned();
    for (entity, plain) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, plain);
        }
    }
    whitespace.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(strip_markup("Head north"), "Head north");
    }

    #[test]
    fn inline_tags_do_not_split_words_oddly() {
        assert_eq!(
            strip_markup("Turn <b>left</b> onto <b>Osmaston Rd</b>"),
            "Turn left onto Osmaston Rd"
        );
    }

    #[test]
    fn entities_are_decoded_once() {
        assert_eq!(
            strip_markup("Fish&nbsp;&amp;&nbsp;Chips &amp;lt;b&amp;gt;"),
            "Fish & Chips &lt;b&gt;"
        );
    }

    #[test]
    fn markup_only_input_is_empty() {
        assert_eq!(strip_markup("<div></div>  <br/>"), "");
    }
}
