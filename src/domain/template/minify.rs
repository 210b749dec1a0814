//! HTML minification of rendered templates.
//!
//! [`HtmlMinifier`] parses markup into a light node tree, applies the
//! enabled [`MinifyOptions`] and serializes it back. It does not validate
//! HTML: unclosed elements are kept unclosed, end tags with no open element
//! are dropped, and a `<` that never forms a tag stays text.

use serde::Deserialize;
use thiserror::Error;

const SHORT_DOCTYPE: &str = "doctype html";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is read verbatim up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// Elements whose descendants keep their whitespace
const WHITESPACE_SENSITIVE_ELEMENTS: &[&str] = &["pre", "textarea", "script", "style"];

/// Elements that flow with text; whitespace next to them is significant
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdi", "bdo", "big", "br", "button", "cite", "code", "del", "dfn",
    "em", "font", "i", "img", "input", "ins", "kbd", "label", "mark", "math", "nobr", "object",
    "q", "rp", "rt", "rtc", "ruby", "s", "samp", "select", "small", "span", "strike", "strong",
    "sub", "sup", "svg", "textarea", "time", "tt", "u", "var", "wbr",
];

/// Attributes dropped when their value is blank
const EMPTY_REMOVABLE_ATTRIBUTES: &[&str] = &["class", "id", "style", "title", "lang", "dir"];

const EXECUTABLE_SCRIPT_TYPES: &[&str] = &[
    "text/javascript",
    "text/ecmascript",
    "text/jscript",
    "application/javascript",
    "application/x-javascript",
    "application/ecmascript",
];

/// Minification switches. Every switch is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MinifyOptions {
    pub collapse_whitespace: bool,
    pub remove_comments: bool,
    pub remove_empty_attributes: bool,
    pub remove_empty_elements: bool,
    pub remove_redundant_attributes: bool,
    pub remove_script_type_attributes: bool,
    pub remove_style_link_type_attributes: bool,
    pub use_short_doctype: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            remove_comments: true,
            remove_empty_attributes: true,
            remove_empty_elements: true,
            remove_redundant_attributes: true,
            remove_script_type_attributes: true,
            remove_style_link_type_attributes: true,
            use_short_doctype: true,
        }
    }
}

impl MinifyOptions {
    /// All switches off; markup is only re-serialized
    pub fn disabled() -> Self {
        Self {
            collapse_whitespace: false,
            remove_comments: false,
            remove_empty_attributes: false,
            remove_empty_elements: false,
            remove_redundant_attributes: false,
            remove_script_type_attributes: false,
            remove_style_link_type_attributes: false,
            use_short_doctype: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinifyError {
    #[error("Unterminated comment at byte {0}")]
    UnterminatedComment(usize),

    #[error("Unterminated tag <{tag}> at byte {position}")]
    UnterminatedTag { tag: String, position: usize },
}

/// Compacts rendered markup
pub trait Minifier: Send + Sync {
    fn minify(&self, markup: &str, options: &MinifyOptions) -> Result<String, MinifyError>;
}

/// Built-in HTML minifier
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMinifier;

impl Minifier for HtmlMinifier {
    fn minify(&self, markup: &str, options: &MinifyOptions) -> Result<String, MinifyError> {
        let nodes = Parser::new(markup).parse()?;
        let nodes = process_nodes(nodes, Scope::ROOT, options);

        let mut out = String::with_capacity(markup.len());
        for node in &nodes {
            write_node(&mut out, node);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    /// Inner text of `<!...>` when it is a doctype
    Doctype(String),
    /// Body between `<!--` and `-->`
    Comment(String),
    /// Any other `<!...>` or `<?...>` construct, verbatim
    Declaration(String),
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: String,
    attrs: Vec<Attribute>,
    children: Vec<Node>,
    self_closing: bool,
    has_end_tag: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Attribute {
    name: String,
    value: Option<String>,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    stack: Vec<Element>,
    root: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
            root: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<Node>, MinifyError> {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];

            if rest.starts_with("<!--") {
                self.parse_comment()?;
            } else if rest.starts_with("</") && starts_name(&rest[2..]) {
                self.parse_end_tag();
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.parse_declaration()?;
            } else if rest.starts_with('<') && starts_name(&rest[1..]) {
                self.parse_start_tag()?;
            } else {
                self.parse_text();
            }
        }

        while let Some(unclosed) = self.stack.pop() {
            self.append(Node::Element(unclosed));
        }

        Ok(self.root)
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn parse_text(&mut self) {
        let start = self.pos;
        // A '<' that opens nothing is plain text
        let skip = usize::from(self.input[start..].starts_with('<'));
        let end = self.input[start + skip..]
            .find('<')
            .map_or(self.input.len(), |offset| start + skip + offset);

        self.append(Node::Text(self.input[start..end].to_string()));
        self.pos = end;
    }

    fn parse_comment(&mut self) -> Result<(), MinifyError> {
        let body_start = self.pos + 4;
        let end = self.input[body_start..]
            .find("-->")
            .ok_or(MinifyError::UnterminatedComment(self.pos))?;

        let body = self.input[body_start..body_start + end].to_string();
        self.pos = body_start + end + 3;
        self.append(Node::Comment(body));
        Ok(())
    }

    fn parse_declaration(&mut self) -> Result<(), MinifyError> {
        let start = self.pos;
        let end = self.input[start..]
            .find('>')
            .ok_or_else(|| unterminated("!", start))?;

        let raw = &self.input[start..=start + end];
        let node = if raw.len() >= 9 && raw.as_bytes()[..9].eq_ignore_ascii_case(b"<!doctype") {
            Node::Doctype(raw[2..raw.len() - 1].to_string())
        } else {
            Node::Declaration(raw.to_string())
        };

        self.pos = start + end + 1;
        self.append(node);
        Ok(())
    }

    fn parse_end_tag(&mut self) {
        let start = self.pos;
        let close = match self.input[start + 2..].find(&['<', '>'][..]) {
            Some(offset) if self.input.as_bytes()[start + 2 + offset] == b'>' => offset + 2,
            _ => {
                self.parse_text();
                return;
            }
        };

        let name = self.input[start + 2..start + close]
            .split(|c: char| c.is_ascii_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        self.pos = start + close + 1;

        let Some(depth) = self.stack.iter().rposition(|open| open.name == name) else {
            // Browsers read a stray </br> as <br> and </p> as an empty paragraph
            match name.as_str() {
                "br" => self.append(Node::Element(Element::new("br".to_string()))),
                "p" => {
                    let mut paragraph = Element::new("p".to_string());
                    paragraph.has_end_tag = true;
                    self.append(Node::Element(paragraph));
                }
                _ => {}
            }
            return;
        };

        // Elements opened after the matching one stay unclosed
        while self.stack.len() > depth + 1 {
            if let Some(unclosed) = self.stack.pop() {
                self.append(Node::Element(unclosed));
            }
        }
        if let Some(mut open) = self.stack.pop() {
            open.has_end_tag = true;
            self.append(Node::Element(open));
        }
    }

    fn parse_start_tag(&mut self) -> Result<(), MinifyError> {
        let start = self.pos;
        let Some((mut element, end)) = scan_start_tag(self.input, start) else {
            self.parse_text();
            return Ok(());
        };
        self.pos = end;

        if element.self_closing || is_void(&element.name) {
            self.append(Node::Element(element));
        } else if RAW_TEXT_ELEMENTS.contains(&element.name.as_str()) {
            self.read_raw_text(&mut element, start)?;
            self.append(Node::Element(element));
        } else {
            self.stack.push(element);
        }

        Ok(())
    }

    fn read_raw_text(&mut self, element: &mut Element, start: usize) -> Result<(), MinifyError> {
        let closing = format!("</{}", element.name);
        // ASCII lower-casing keeps byte offsets intact
        let lowered = self.input[self.pos..].to_ascii_lowercase();

        let Some(offset) = lowered.find(&closing) else {
            let content = &self.input[self.pos..];
            if !content.is_empty() {
                element.children.push(Node::Text(content.to_string()));
            }
            self.pos = self.input.len();
            return Ok(());
        };

        let content = &self.input[self.pos..self.pos + offset];
        if !content.is_empty() {
            element.children.push(Node::Text(content.to_string()));
        }

        let end_tag = self.pos + offset;
        let close = self.input[end_tag..]
            .find('>')
            .ok_or_else(|| unterminated(&element.name, start))?;

        element.has_end_tag = true;
        self.pos = end_tag + close + 1;
        Ok(())
    }
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
            self_closing: false,
            has_end_tag: false,
        }
    }
}

/// Read the start tag opening at `start`.
///
/// Returns the element and the byte after its `>`, or `None` when the markup
/// never forms a complete tag.
fn scan_start_tag(input: &str, start: usize) -> Option<(Element, usize)> {
    let bytes = input.as_bytes();

    let name_end = scan(bytes, start + 1, |b| {
        !(b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'<'))
    });
    let mut element = Element::new(input[start + 1..name_end].to_ascii_lowercase());
    let mut pos = name_end;

    loop {
        pos = scan(bytes, pos, |b| b.is_ascii_whitespace());
        match *bytes.get(pos)? {
            b'>' => return Some((element, pos + 1)),
            b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                element.self_closing = true;
                return Some((element, pos + 2));
            }
            b'/' | b'<' | b'=' | b'"' | b'\'' => return None,
            _ => {}
        }

        let name_end = scan(bytes, pos, is_attribute_name_byte);
        let name = input[pos..name_end].to_ascii_lowercase();
        pos = scan(bytes, name_end, |b| b.is_ascii_whitespace());

        let mut value = None;
        if bytes.get(pos) == Some(&b'=') {
            pos = scan(bytes, pos + 1, |b| b.is_ascii_whitespace());
            match *bytes.get(pos)? {
                quote @ (b'"' | b'\'') => {
                    let close = input[pos + 1..].find(char::from(quote))?;
                    value = Some(input[pos + 1..pos + 1 + close].to_string());
                    pos += close + 2;
                }
                _ => {
                    let end = scan(bytes, pos, is_unquoted_value_byte);
                    if end == pos {
                        return None;
                    }
                    value = Some(input[pos..end].to_string());
                    pos = end;
                }
            }
        }

        element.attrs.push(Attribute { name, value });
    }
}

fn is_attribute_name_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'<' | b'>' | b'/' | b'='))
}

fn is_unquoted_value_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'`' | b'=' | b'<' | b'>'))
}

fn unterminated(tag: &str, position: usize) -> MinifyError {
    MinifyError::UnterminatedTag {
        tag: tag.to_string(),
        position,
    }
}

fn starts_name(rest: &str) -> bool {
    rest.as_bytes()
        .first()
        .is_some_and(|b| b.is_ascii_alphabetic())
}

/// First index at or after `pos` whose byte fails `keep`
fn scan(bytes: &[u8], mut pos: usize, keep: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && keep(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

fn is_inline(name: &str) -> bool {
    INLINE_ELEMENTS.contains(&name)
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    preserve_whitespace: bool,
    inline: bool,
}

impl Scope {
    const ROOT: Scope = Scope {
        preserve_whitespace: false,
        inline: false,
    };
}

fn process_nodes(nodes: Vec<Node>, scope: Scope, options: &MinifyOptions) -> Vec<Node> {
    let mut kept: Vec<Node> = Vec::with_capacity(nodes.len());

    for node in nodes {
        let node = match node {
            Node::Comment(body) if options.remove_comments && !body.starts_with('!') => continue,
            Node::Doctype(_) if options.use_short_doctype => Node::Doctype(SHORT_DOCTYPE.to_string()),
            Node::Element(element) => match process_element(element, scope, options) {
                Some(node) => node,
                None => continue,
            },
            other => other,
        };

        // Removed nodes can leave two text runs side by side
        if let Node::Text(text) = &node {
            if let Some(Node::Text(previous)) = kept.last_mut() {
                previous.push_str(text);
                continue;
            }
        }
        kept.push(node);
    }

    if options.collapse_whitespace && !scope.preserve_whitespace {
        collapse_text_nodes(&mut kept, scope);
    }

    kept
}

fn process_element(mut element: Element, scope: Scope, options: &MinifyOptions) -> Option<Node> {
    element.attrs = clean_attributes(&element.name, std::mem::take(&mut element.attrs), options);

    let child_scope = Scope {
        preserve_whitespace: scope.preserve_whitespace
            || WHITESPACE_SENSITIVE_ELEMENTS.contains(&element.name.as_str()),
        inline: is_inline(&element.name),
    };
    element.children = process_nodes(std::mem::take(&mut element.children), child_scope, options);

    if options.remove_empty_elements && element.children.is_empty() && is_removable(&element) {
        return None;
    }
    Some(Node::Element(element))
}

fn collapse_text_nodes(nodes: &mut Vec<Node>, scope: Scope) {
    let count = nodes.len();

    for i in 0..count {
        let trim_start = if i == 0 {
            !scope.inline
        } else {
            is_block_boundary(&nodes[i - 1])
        };
        let trim_end = if i + 1 == count {
            !scope.inline
        } else {
            is_block_boundary(&nodes[i + 1])
        };

        if let Node::Text(text) = &mut nodes[i] {
            let mut collapsed = collapse_whitespace(text);
            if trim_end {
                collapsed.truncate(collapsed.trim_end_matches(' ').len());
            }
            if trim_start {
                collapsed = collapsed.trim_start_matches(' ').to_string();
            }
            *text = collapsed;
        }
    }

    nodes.retain(|node| !matches!(node, Node::Text(text) if text.is_empty()));
}

fn is_block_boundary(node: &Node) -> bool {
    match node {
        Node::Element(element) => !is_inline(&element.name),
        Node::Doctype(_) | Node::Declaration(_) => true,
        Node::Comment(_) | Node::Text(_) => false,
    }
}

/// Replace each run of HTML whitespace with a single space
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c') {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out
}

fn is_removable(element: &Element) -> bool {
    if element.self_closing || is_void(&element.name) {
        return false;
    }

    let has = |name: &str| element.attrs.iter().any(|attr| attr.name == name);
    match element.name.as_str() {
        "textarea" => false,
        "audio" | "video" | "script" => !has("src"),
        "iframe" => !(has("src") || has("srcdoc")),
        "object" => !has("data"),
        _ => true,
    }
}

fn clean_attributes(tag: &str, attrs: Vec<Attribute>, options: &MinifyOptions) -> Vec<Attribute> {
    let has_src = attrs.iter().any(|attr| attr.name == "src");
    let id = attrs
        .iter()
        .find(|attr| attr.name == "id")
        .and_then(|attr| attr.value.clone());

    attrs
        .into_iter()
        .filter(|attr| {
            let value = attr.value.as_deref().unwrap_or_default();

            let drop = (options.remove_empty_attributes && is_blank_removable(&attr.name, value))
                || (options.remove_redundant_attributes
                    && is_redundant(tag, &attr.name, value, has_src, id.as_deref()))
                || (options.remove_script_type_attributes
                    && tag == "script"
                    && attr.name == "type"
                    && is_script_type(value))
                || (options.remove_style_link_type_attributes
                    && (tag == "style" || tag == "link")
                    && attr.name == "type"
                    && is_style_type(value));

            !drop
        })
        .collect()
}

fn is_blank_removable(name: &str, value: &str) -> bool {
    let event_handler = name.len() > 2
        && name.starts_with("on")
        && name.bytes().all(|b| b.is_ascii_alphabetic());

    (EMPTY_REMOVABLE_ATTRIBUTES.contains(&name) || event_handler) && value.trim().is_empty()
}

fn is_redundant(tag: &str, name: &str, value: &str, has_src: bool, id: Option<&str>) -> bool {
    let trimmed = value.trim();
    match (tag, name) {
        ("script", "language") => trimmed.to_ascii_lowercase().starts_with("javascript"),
        ("script", "charset") => !has_src,
        ("form", "method") => trimmed.eq_ignore_ascii_case("get"),
        ("input", "type") => trimmed.eq_ignore_ascii_case("text"),
        ("area", "shape") => trimmed.eq_ignore_ascii_case("rect"),
        ("a", "name") => id == Some(value),
        _ => false,
    }
}

/// MIME type without parameters, lower-cased
fn base_mime_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_script_type(value: &str) -> bool {
    let mime = base_mime_type(value);
    mime.is_empty() || EXECUTABLE_SCRIPT_TYPES.contains(&mime.as_str())
}

fn is_style_type(value: &str) -> bool {
    let mime = base_mime_type(value);
    mime.is_empty() || mime == "text/css"
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        }
        Node::Doctype(inner) => {
            out.push_str("<!");
            out.push_str(inner);
            out.push('>');
        }
        Node::Declaration(raw) => out.push_str(raw),
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);

    for attr in &element.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = &attr.value {
            out.push('=');
            if value.contains('"') && !value.contains('\'') {
                out.push('\'');
                out.push_str(value);
                out.push('\'');
            } else {
                out.push('"');
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }
    }

    if element.self_closing && !is_void(&element.name) {
        out.push('/');
    }
    out.push('>');

    for child in &element.children {
        write_node(out, child);
    }

    if element.has_end_tag {
        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minify(markup: &str) -> String {
        HtmlMinifier
            .minify(markup, &MinifyOptions::default())
            .unwrap()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(minify("  Hello   Ada\n"), "Hello Ada");
    }

    #[test]
    fn test_full_document() {
        let markup = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\">\n\
            <html>\n  <head>\n    <title> Hi </title>\n  </head>\n  <body>\n    \
            <!-- note -->\n    <p class=\"\" id=\"intro\">Hello   <b>Ada</b> !</p>\n    \
            <div></div>\n  </body>\n</html>\n";

        assert_eq!(
            minify(markup),
            "<!doctype html><html><head><title>Hi</title></head>\
             <body><p id=\"intro\">Hello <b>Ada</b> !</p></body></html>"
        );
    }

    #[test]
    fn test_inline_spacing_is_kept() {
        assert_eq!(minify("<p>a <em>b</em> c</p>"), "<p>a <em>b</em> c</p>");
        assert_eq!(minify("<span> a </span>"), "<span> a </span>");
    }

    #[test]
    fn test_removed_element_does_not_double_spaces() {
        assert_eq!(minify("<p>a <span></span> b</p>"), "<p>a b</p>");
        assert_eq!(minify("a <!-- gone --> b"), "a b");
    }

    #[test]
    fn test_whitespace_sensitive_content() {
        assert_eq!(
            minify("<div>\n<pre>  a\n  b </pre>\n</div>"),
            "<div><pre>  a\n  b </pre></div>"
        );
        assert_eq!(
            minify("<textarea>  keep\n me </textarea>"),
            "<textarea>  keep\n me </textarea>"
        );
    }

    #[test]
    fn test_script_and_style_types() {
        assert_eq!(
            minify("<script type=\"text/javascript\">  if (a < b) {}  </script>"),
            "<script>  if (a < b) {}  </script>"
        );
        assert_eq!(
            minify("<script type=\"module\">x()</script>"),
            "<script type=\"module\">x()</script>"
        );
        assert_eq!(
            minify("<link rel=\"stylesheet\" type=\"text/css\" href=\"a.css\"><style type=\"text/css\">p{}</style>"),
            "<link rel=\"stylesheet\" href=\"a.css\"><style>p{}</style>"
        );
    }

    #[test]
    fn test_redundant_attributes() {
        assert_eq!(
            minify("<form method=\"GET\" action=\"/s\"><input type=\"text\" name=\"q\"><input type=checkbox checked></form>"),
            "<form action=\"/s\"><input name=\"q\"><input type=\"checkbox\" checked></form>"
        );
        assert_eq!(
            minify("<a id=\"top\" name=\"top\" href=\"#\">up</a>"),
            "<a id=\"top\" href=\"#\">up</a>"
        );
        assert_eq!(
            minify("<script language=\"JavaScript\" charset=\"utf-8\">go()</script>"),
            "<script>go()</script>"
        );
    }

    #[test]
    fn test_empty_attributes() {
        assert_eq!(
            minify("<p class=\" \" style=\"\" onclick=\"\" data-x=\"\">x</p>"),
            "<p data-x=\"\">x</p>"
        );
    }

    #[test]
    fn test_empty_elements() {
        assert_eq!(minify("<div><span></span><p> </p></div>x"), "x");
        assert_eq!(minify("<p><br/></p>"), "<p><br></p>");
        assert_eq!(minify("<textarea></textarea>"), "<textarea></textarea>");
        assert_eq!(
            minify("<iframe src=\"/frame\"></iframe>"),
            "<iframe src=\"/frame\"></iframe>"
        );
        assert_eq!(
            minify("<svg><path d=\"M0\"/></svg>"),
            "<svg><path d=\"M0\"/></svg>"
        );
    }

    #[test]
    fn test_preserved_comments() {
        assert_eq!(minify("<!--! legal --><p>x</p>"), "<!--! legal --><p>x</p>");
    }

    #[test]
    fn test_quote_handling() {
        assert_eq!(
            minify("<p title='say \"hi\"'>x</p>"),
            "<p title='say \"hi\"'>x</p>"
        );
    }

    #[test]
    fn test_unclosed_elements_stay_unclosed() {
        assert_eq!(minify("<ul><li>a<li>b</ul>"), "<ul><li>a<li>b</ul>");
    }

    #[test]
    fn test_disabled_options_only_normalize_tags() {
        let markup = "<!DOCTYPE html>\n<P CLASS=\"\">  x  <!-- c --></P>\n";
        let output = HtmlMinifier
            .minify(markup, &MinifyOptions::disabled())
            .unwrap();
        assert_eq!(output, "<!DOCTYPE html>\n<p class=\"\">  x  <!-- c --></p>\n");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "<!DOCTYPE html><html><body>\n<h1> Title </h1>\n<p>a <b> b </b> c</p>\n</body></html>",
            "<div>\n  <span>x</span>\n  <span>y</span>\n</div>",
            "<table><tr><td> 1 </td><td></td></tr></table>",
            "<p>a < b &amp; c</p>",
            "<ul><li>a<li>b</ul><pre>\n x \n</pre>",
            "Hello Ada",
        ];

        for sample in samples {
            let once = minify(sample);
            assert_eq!(minify(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_stray_end_tags() {
        assert_eq!(minify("hi</b>"), "hi");
        assert_eq!(minify("<div>a</span>b</div>"), "<div>ab</div>");
        assert_eq!(minify("a</br>b"), "a<br>b");
        assert_eq!(
            HtmlMinifier
                .minify("x</p>y", &MinifyOptions::disabled())
                .unwrap(),
            "x<p></p>y"
        );
        assert_eq!(minify("x</p>y"), "xy");
    }

    #[test]
    fn test_incomplete_tags_stay_text() {
        assert_eq!(minify("a <b"), "a <b");
        assert_eq!(minify("<p>x <y and <b>bold</b></p>"), "<p>x <y and <b>bold</b></p>");
        assert_eq!(minify("<p>1 </x</p>"), "<p>1 </x</p>");
        assert_eq!(minify("<a href=\"/x>go"), "<a href=\"/x>go");
    }

    #[test]
    fn test_lenient_parsing_is_idempotent() {
        let samples = [
            "hi</b> there",
            "a</br>b</p>c",
            "<p>x <y and <b>bold</b></p>",
            "<div>1 < 2 <q</div>",
            "<span>a <b c=</span>",
        ];

        for sample in samples {
            let once = minify(sample);
            assert_eq!(minify(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_errors() {
        let minifier = HtmlMinifier;
        let options = MinifyOptions::default();

        assert_eq!(
            minifier.minify("<!-- open", &options),
            Err(MinifyError::UnterminatedComment(0))
        );
        assert!(matches!(
            minifier.minify("<!DOCTYPE html", &options),
            Err(MinifyError::UnterminatedTag { tag, position: 0 }) if tag == "!"
        ));
        assert!(matches!(
            minifier.minify("<script>go()</script", &options),
            Err(MinifyError::UnterminatedTag { tag, .. }) if tag == "script"
        ));
    }
}
