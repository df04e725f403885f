use std::sync::OnceLock;

use regex::Regex;

const IDENT: &str = r"[_\-$&%*!?a-zA-Z][\-$&%*!?\w]*";

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("lexical regex must compile"))
}

pub(crate) fn is_var(text: &str) -> bool {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, &format!("^(GF|LF|TF)@{}$", IDENT)).is_match(text)
}

pub(crate) fn is_label(text: &str) -> bool {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, &format!("^{}$", IDENT)).is_match(text)
}

pub(crate) fn is_string(text: &str) -> bool {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"^(?:[^\s#\\]|\\[0-9]{3})*$").is_match(text)
}

pub(crate) fn is_int(text: &str) -> bool {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"^[-+]?[0-9]+$").is_match(text)
}

pub(crate) fn is_float(text: &str) -> bool {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(
        &CELL,
        r"^[-+]?(?:0[xX])?(?:[0-9a-fA-F]+\.?[0-9a-fA-F]*|\.[0-9a-fA-F]+)(?:[pP][-+]?[0-9]+)?$",
    )
    .is_match(text)
}

pub(crate) fn is_bool(text: &str) -> bool {
    matches!(text, "true" | "false")
}

pub(crate) fn is_nil(text: &str) -> bool {
    text == "nil"
}

pub(crate) fn is_type_name(text: &str) -> bool {
    matches!(text, "int" | "bool" | "string" | "float")
}

#[cfg(test)]
mod lexical_tests {
    use super::*;

    #[test]
    fn var_requires_frame_prefix_and_identifier() {
        assert!(is_var("GF@counter"));
        assert!(is_var("LF@_tmp-1"));
        assert!(is_var("TF@$x&y%z*!?"));
        assert!(!is_var("gf@x"));
        assert!(!is_var("GF@1x"));
        assert!(!is_var("GF@"));
        assert!(!is_var("GF@a b"));
    }

    #[test]
    fn label_shares_identifier_rules() {
        assert!(is_label("loop_start"));
        assert!(is_label("*end"));
        assert!(!is_label("9lives"));
        assert!(!is_label(""));
    }

    #[test]
    fn string_forbids_whitespace_hash_and_bare_backslash() {
        assert!(is_string(""));
        assert!(is_string("hello\\032world"));
        assert!(is_string("a@b"));
        assert!(is_string("\u{10d}esky"));
        assert!(!is_string("a b"));
        assert!(!is_string("a#b"));
        assert!(!is_string("a\\12"));
    }

    #[test]
    fn numeric_literals() {
        assert!(is_int("-12"));
        assert!(is_int("+0"));
        assert!(!is_int("1.0"));
        assert!(!is_int(""));
        assert!(is_float("0x1.8p+1"));
        assert!(is_float("-0x0p+0"));
        assert!(is_float("1p3"));
        assert!(is_float("0x.8"));
        assert!(!is_float("0x"));
        assert!(!is_float("."));
        assert!(!is_float("0x1p"));
    }

    #[test]
    fn keyword_literals() {
        assert!(is_bool("true"));
        assert!(!is_bool("TRUE"));
        assert!(is_nil("nil"));
        assert!(!is_nil("null"));
        assert!(is_type_name("float"));
        assert!(!is_type_name("nil"));
    }
}
