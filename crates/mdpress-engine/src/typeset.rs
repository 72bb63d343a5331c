//! Typesetting passes applied to text runs: CJK/Latin spacing, punctuation
//! width normalization, and term casing fixes.

/// Known lowercase term forms and their canonical casing, sorted by key.
const TERM_FIXES: &[(&str, &str)] = &[
    ("ajax", "AJAX"),
    ("coffeescript", "CoffeeScript"),
    ("css3", "CSS3"),
    ("github", "GitHub"),
    ("gitlab", "GitLab"),
    ("html5", "HTML5"),
    ("ios", "iOS"),
    ("ipad", "iPad"),
    ("iphone", "iPhone"),
    ("javascript", "JavaScript"),
    ("jquery", "jQuery"),
    ("macos", "macOS"),
    ("mongodb", "MongoDB"),
    ("mysql", "MySQL"),
    ("nodejs", "Node.js"),
    ("postgresql", "PostgreSQL"),
    ("redis", "Redis"),
    ("typescript", "TypeScript"),
    ("wifi", "Wi-Fi"),
    ("wordpress", "WordPress"),
];

/// CJK letters: kana plus the common CJK Unified Ideographs blocks.
pub(crate) fn is_cjk(c: char) -> bool {
    matches!(
        u32::from(c),
        0x3040..=0x30FF | 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF
    )
}

/// Insert a space between adjacent CJK and Latin alphanumeric characters.
pub(crate) fn auto_space(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if let Some(p) = prev
            && ((is_cjk(p) && c.is_ascii_alphanumeric()) || (p.is_ascii_alphanumeric() && is_cjk(c)))
        {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Replace ASCII punctuation that directly follows a CJK character with its
/// full-width equivalent.
pub(crate) fn chinese_punct(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        let after_cjk = prev.is_some_and(is_cjk);
        let converted = match c {
            ',' if after_cjk => '，',
            '.' if after_cjk => '。',
            '!' if after_cjk => '！',
            '?' if after_cjk => '？',
            ':' if after_cjk => '：',
            ';' if after_cjk => '；',
            _ => c,
        };
        out.push(converted);
        prev = Some(c);
    }
    out
}

/// Correct the casing of known technical terms, matching whole words only.
pub(crate) fn fix_term_typo(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            word.push(c);
        } else {
            flush_word(&mut out, &mut word);
            out.push(c);
        }
    }
    flush_word(&mut out, &mut word);
    out
}

fn flush_word(out: &mut String, word: &mut String) {
    if word.is_empty() {
        return;
    }
    match TERM_FIXES.binary_search_by_key(&word.as_str(), |&(key, _)| key) {
        Ok(i) => out.push_str(TERM_FIXES[i].1),
        Err(_) => out.push_str(word),
    }
    word.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_term_fixes_sorted() {
        // Binary search relies on the table staying sorted.
        assert!(TERM_FIXES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_auto_space() {
        assert_eq!(auto_space("你好Hexo"), "你好 Hexo");
        assert_eq!(auto_space("Hexo你好"), "Hexo 你好");
        assert_eq!(auto_space("你好 Hexo"), "你好 Hexo");
        assert_eq!(auto_space("hello world"), "hello world");
        assert_eq!(auto_space("第2章"), "第 2 章");
    }

    #[test]
    fn test_auto_space_ignores_punctuation() {
        assert_eq!(auto_space("你好,world"), "你好,world");
    }

    #[test]
    fn test_chinese_punct() {
        assert_eq!(chinese_punct("你好,世界."), "你好，世界。");
        assert_eq!(chinese_punct("Hello, world."), "Hello, world.");
        assert_eq!(chinese_punct("对吗?是:不;好!"), "对吗？是：不；好！");
    }

    #[test]
    fn test_chinese_punct_decimal_untouched() {
        assert_eq!(chinese_punct("圆周率3.14"), "圆周率3.14");
    }

    #[test]
    fn test_fix_term_typo() {
        assert_eq!(fix_term_typo("jquery"), "jQuery");
        assert_eq!(fix_term_typo("use jquery and javascript"), "use jQuery and JavaScript");
        assert_eq!(fix_term_typo("jqueryx"), "jqueryx");
        assert_eq!(fix_term_typo("jQuery"), "jQuery");
        assert_eq!(fix_term_typo("nodejs"), "Node.js");
    }
}
