//! Standard HTML vocabulary
//!
//! Names are lower-case. Elements not listed here are `Normal`.

use super::ElementType;
use ElementType::{EscapableRawText, Normal, RawText, Void};

pub const STANDARD_ELEMENTS: &[(&str, ElementType)] = &[
    // Document structure
    ("html", Normal),
    ("head", Normal),
    ("title", EscapableRawText),
    ("base", Void),
    ("link", Void),
    ("meta", Void),
    ("style", RawText),
    ("script", RawText),
    ("noscript", Normal),
    ("body", Normal),
    // Sections
    ("article", Normal),
    ("section", Normal),
    ("nav", Normal),
    ("aside", Normal),
    ("h1", Normal),
    ("h2", Normal),
    ("h3", Normal),
    ("h4", Normal),
    ("h5", Normal),
    ("h6", Normal),
    ("hgroup", Normal),
    ("header", Normal),
    ("footer", Normal),
    ("address", Normal),
    ("main", Normal),
    // Grouping
    ("p", Normal),
    ("hr", Void),
    ("pre", Normal),
    ("blockquote", Normal),
    ("ol", Normal),
    ("ul", Normal),
    ("li", Normal),
    ("dl", Normal),
    ("dt", Normal),
    ("dd", Normal),
    ("figure", Normal),
    ("figcaption", Normal),
    ("div", Normal),
    // Text-level
    ("a", Normal),
    ("em", Normal),
    ("strong", Normal),
    ("small", Normal),
    ("s", Normal),
    ("cite", Normal),
    ("g", Normal),
    ("dfn", Normal),
    ("abbr", Normal),
    ("time", Normal),
    ("code", Normal),
    ("var", Normal),
    ("samp", Normal),
    ("kbd", Normal),
    ("sub", Normal),
    ("sup", Normal),
    ("i", Normal),
    ("b", Normal),
    ("u", Normal),
    ("mark", Normal),
    ("ruby", Normal),
    ("rb", Normal),
    ("rt", Normal),
    ("rtc", Normal),
    ("rp", Normal),
    ("bdi", Normal),
    ("bdo", Normal),
    ("span", Normal),
    ("br", Void),
    ("wbr", Void),
    // Edits
    ("ins", Normal),
    ("del", Normal),
    // Embedded content
    ("img", Void),
    ("iframe", Normal),
    ("embed", Void),
    ("object", Normal),
    ("param", Void),
    ("video", Normal),
    ("audio", Normal),
    ("source", Void),
    ("track", Void),
    ("canvas", Normal),
    ("map", Normal),
    ("area", Void),
    // Tables
    ("table", Normal),
    ("caption", Normal),
    ("colgroup", Normal),
    ("col", Void),
    ("tbody", Normal),
    ("thead", Normal),
    ("tfoot", Normal),
    ("tr", Normal),
    ("td", Normal),
    ("th", Normal),
    // Forms
    ("form", Normal),
    ("fieldset", Normal),
    ("legend", Normal),
    ("label", Normal),
    ("input", Void),
    ("button", Normal),
    ("select", Normal),
    ("datalist", Normal),
    ("optgroup", Normal),
    ("option", Normal),
    ("textarea", EscapableRawText),
    ("keygen", Void),
    ("output", Normal),
    ("progress", Normal),
    ("meter", Normal),
    // Interactive
    ("details", Normal),
    ("summary", Normal),
    ("command", Normal),
    ("menu", Normal),
    ("menuitem", Void),
    ("dialog", Normal),
    // Web components
    ("template", RawText),
    ("element", Normal),
    ("decorator", Normal),
    ("content", Normal),
    ("shadow", Normal),
];

pub const STANDARD_ATTRIBUTE_NAMES: &[&str] = &[
    "abbr", "accept", "accept-charset", "accesskey", "action", "align", "alt", "archive",
    "async", "autocomplete", "autofocus", "autoplay", "axis", "border", "cellpadding",
    "cellspacing", "challenge", "char", "charoff", "charset", "checked", "cite", "class",
    "classid", "codebase", "codetype", "cols", "colspan", "command", "content",
    "contenteditable", "contextmenu", "controls", "coords", "data", "datetime", "declare",
    "default", "defer", "dir", "disabled", "draggable", "dropzone", "enctype", "for", "form",
    "formaction", "formenctype", "formmethod", "formnovalidate", "formtarget", "frame",
    "headers", "height", "hidden", "high", "href", "hreflang", "http-equiv", "icon", "id",
    "ismap", "keytype", "kind", "label", "lang", "list", "longdesc", "loop", "low", "max",
    "maxlength", "media", "method", "min", "multiple", "muted", "name", "nohref",
    "novalidate", "nowrap", "onabort", "onafterprint", "onbeforeprint", "onbeforeunload",
    "onblur", "oncanplay", "oncanplaythrough", "onchange", "onclick", "oncontextmenu",
    "oncuechange", "ondblclick", "ondrag", "ondragend", "ondragenter", "ondragleave",
    "ondragover", "ondragstart", "ondrop", "ondurationchange", "onemptied", "onended",
    "onerror", "onfocus", "onformchange", "onforminput", "onhaschange", "oninput",
    "oninvalid", "onkeydown", "onkeypress", "onkeyup", "onload", "onloadeddata",
    "onloadedmetadata", "onloadstart", "onmessage", "onmousedown", "onmousemove",
    "onmouseout", "onmouseover", "onmouseup", "onmousewheel", "onoffline", "ononline",
    "onpagehide", "onpageshow", "onpause", "onplay", "onplaying", "onpopstate", "onprogress",
    "onratechange", "onredo", "onreset", "onresize", "onscroll", "onseeked", "onseeking",
    "onselect", "onstalled", "onstorage", "onsubmit", "onsuspend", "ontimeupdate", "onundo",
    "onunload", "onvolumechange", "onwaiting", "open", "optimum", "pattern", "placeholder",
    "poster", "preload", "profile", "pubdate", "radiogroup", "readonly", "rel", "required",
    "rev", "reversed", "rows", "rowspan", "rules", "scheme", "scope", "scoped", "seamless",
    "selected", "shape", "size", "span", "spellcheck", "src", "srclang", "standby", "style",
    "summary", "tabindex", "title", "translate", "type", "usemap", "valign", "value",
    "valuetype", "width", "xml:lang", "xml:space", "xmlns",
];

/// Attributes whose presence alone means "true" (`<input disabled>`).
pub const BOOLEAN_ATTRIBUTE_NAMES: &[&str] = &[
    "async", "autofocus", "autoplay", "checked", "controls", "declare", "default", "defer",
    "disabled", "formnovalidate", "hidden", "ismap", "loop", "multiple", "novalidate",
    "nowrap", "open", "pubdate", "readonly", "required", "reversed", "scoped", "seamless",
    "selected",
];

#[inline]
pub fn is_boolean_attribute(name: &str) -> bool {
    BOOLEAN_ATTRIBUTE_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_duplicate_names() {
        let elements: HashSet<_> = STANDARD_ELEMENTS.iter().map(|(n, _)| *n).collect();
        assert_eq!(elements.len(), STANDARD_ELEMENTS.len());
        let attributes: HashSet<_> = STANDARD_ATTRIBUTE_NAMES.iter().collect();
        assert_eq!(attributes.len(), STANDARD_ATTRIBUTE_NAMES.len());
    }

    #[test]
    fn test_boolean_attributes_are_standard() {
        for name in BOOLEAN_ATTRIBUTE_NAMES {
            assert!(STANDARD_ATTRIBUTE_NAMES.contains(name), "{name}");
        }
    }
}
