use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*```[\w-]*[ \t]*$\n?").expect("valid regex"));

static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style\s*>").expect("valid regex"));

// `selector { prop: value; ... }` or a bare `{ prop: value }`
static CSS_RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[.#@]?[\w-][\w\-.#:, >]*)?\{\s*(?:[A-Za-z-]+\s*:\s*[^{};]+;?\s*)+\}")
        .expect("valid regex")
});

static STYLE_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+style\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex")
});

/// Remove presentation noise the model was told not to produce.
///
/// Drops code-fence lines, `<style>` blocks, CSS rules and `style`
/// attributes, and normalizes line endings. Text content is untouched.
pub fn clean_text(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = CODE_FENCE_LINE.replace_all(&text, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = CSS_RULE.replace_all(&text, "");
    let text = STYLE_ATTRIBUTE.replace_all(&text, "");
    text.into_owned()
}
