//! Kubernetes object-name syntax checks.
//!
//! Each check returns the list of rules the value breaks; an empty list means
//! the value is valid. Semantics follow
//! https://github.com/kubernetes/apimachinery/blob/v0.29.0/pkg/util/validation/validation.go.

use once_cell::sync::Lazy;
use regex::Regex;

const QUALIFIED_NAME_FMT: &str = "([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]";
const QUALIFIED_NAME_MAX_LEN: usize = 63;
const QUALIFIED_NAME_ERR: &str = "must consist of alphanumeric characters, '-', '_' or '.', and \
     must start and end with an alphanumeric character";

const DNS1123_SUBDOMAIN_FMT: &str = r"[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*";
const DNS1123_SUBDOMAIN_MAX_LEN: usize = 253;
const DNS1123_SUBDOMAIN_ERR: &str = "a lowercase RFC 1123 subdomain must consist of lower case \
     alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character";

const DNS1035_LABEL_FMT: &str = "[a-z]([-a-z0-9]*[a-z0-9])?";
const DNS1035_LABEL_MAX_LEN: usize = 63;
const DNS1035_LABEL_ERR: &str = "a DNS-1035 label must consist of lower case alphanumeric \
     characters or '-', start with an alphabetic character, and end with an alphanumeric character";

static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| anchored(QUALIFIED_NAME_FMT));
static DNS1123_SUBDOMAIN: Lazy<Regex> = Lazy::new(|| anchored(DNS1123_SUBDOMAIN_FMT));
static DNS1035_LABEL: Lazy<Regex> = Lazy::new(|| anchored(DNS1035_LABEL_FMT));

fn anchored(fmt: &str) -> Regex {
    Regex::new(&format!("^{fmt}$")).expect("name patterns must compile")
}

fn regex_error(msg: &str, fmt: &str, examples: &[&str]) -> String {
    let examples = examples
        .iter()
        .map(|e| format!("'{e}'"))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("{msg} (e.g. {examples}, regex used for validation is '{fmt}')")
}

fn max_len_error(len: usize) -> String {
    format!("must be no more than {len} characters")
}

/// Checks a name with an optional DNS subdomain prefix, e.g. `MyName` or
/// `example.com/MyName`.
pub fn is_qualified_name(value: &str) -> Vec<String> {
    let mut errs = Vec::new();

    let name = match value.split('/').collect::<Vec<_>>().as_slice() {
        [name] => *name,
        [prefix, name] => {
            if prefix.is_empty() {
                errs.push("prefix part must be non-empty".to_string());
            } else {
                errs.extend(
                    is_dns1123_subdomain(prefix)
                        .into_iter()
                        .map(|e| format!("prefix part {e}")),
                );
            }
            *name
        }
        _ => {
            let msg = format!("a qualified name {QUALIFIED_NAME_ERR}");
            return vec![format!(
                "{} with an optional DNS subdomain prefix and '/' (e.g. 'example.com/MyName')",
                regex_error(&msg, QUALIFIED_NAME_FMT, &["MyName", "my.name", "123-abc"]),
            )];
        }
    };

    if name.is_empty() {
        errs.push("name part must be non-empty".to_string());
    } else if name.len() > QUALIFIED_NAME_MAX_LEN {
        errs.push(format!("name part {}", max_len_error(QUALIFIED_NAME_MAX_LEN)));
    }
    if !QUALIFIED_NAME.is_match(name) {
        errs.push(format!(
            "name part {}",
            regex_error(
                QUALIFIED_NAME_ERR,
                QUALIFIED_NAME_FMT,
                &["MyName", "my.name", "123-abc"]
            )
        ));
    }

    errs
}

/// Checks a lowercase RFC 1123 subdomain, e.g. `example.com`.
pub fn is_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_SUBDOMAIN_MAX_LEN {
        errs.push(max_len_error(DNS1123_SUBDOMAIN_MAX_LEN));
    }
    if !DNS1123_SUBDOMAIN.is_match(value) {
        errs.push(regex_error(
            DNS1123_SUBDOMAIN_ERR,
            DNS1123_SUBDOMAIN_FMT,
            &["example.com"],
        ));
    }
    errs
}

/// Checks an RFC 1035 label, e.g. `my-name`.
pub fn is_dns1035_label(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1035_LABEL_MAX_LEN {
        errs.push(max_len_error(DNS1035_LABEL_MAX_LEN));
    }
    if !DNS1035_LABEL.is_match(value) {
        errs.push(regex_error(
            DNS1035_LABEL_ERR,
            DNS1035_LABEL_FMT,
            &["my-name", "abc-123"],
        ));
    }
    errs
}

/// Checks an object name (or, with `prefix`, a `generateName` prefix, which
/// may end in a dash) as an RFC 1035 label.
pub fn name_is_dns1035_label(value: &str, prefix: bool) -> Vec<String> {
    match value.strip_suffix('-') {
        Some(rest) if prefix && !rest.is_empty() => is_dns1035_label(&format!("{rest}a")),
        _ => is_dns1035_label(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::simple("hello")]
    #[case::revision("hello-00001")]
    #[case::mixed_case("MyName")]
    #[case::dots_and_underscores("my.name_v2")]
    #[case::digits("123-abc")]
    #[case::single_char("a")]
    #[case::prefixed("example.com/MyName")]
    fn valid_qualified_names(#[case] name: &str) {
        assert!(is_qualified_name(name).is_empty(), "{name} should be valid");
    }

    #[rstest]
    #[case::empty("")]
    #[case::leading_dash("-hello")]
    #[case::trailing_dot("hello.")]
    #[case::space("hello world")]
    #[case::empty_prefix("/hello")]
    #[case::empty_name("example.com/")]
    #[case::bad_prefix("Example.com/hello")]
    #[case::too_many_slashes("a/b/c")]
    fn invalid_qualified_names(#[case] name: &str) {
        assert!(!is_qualified_name(name).is_empty(), "{name} should be invalid");
    }

    #[test]
    fn qualified_name_too_long() {
        let errs = is_qualified_name(&"a".repeat(64));
        assert_eq!(errs, vec!["name part must be no more than 63 characters"]);
        assert!(is_qualified_name(&"a".repeat(63)).is_empty());
    }

    #[test]
    fn qualified_name_reports_each_part() {
        let errs = is_qualified_name("/");
        assert_eq!(errs.len(), 3);
        assert_eq!(errs[0], "prefix part must be non-empty");
        assert_eq!(errs[1], "name part must be non-empty");
        assert!(errs[2].starts_with("name part must consist of alphanumeric characters"));
    }

    #[test]
    fn too_many_slashes_is_a_single_error() {
        let errs = is_qualified_name("a/b/c");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].ends_with("(e.g. 'example.com/MyName')"));
    }

    #[rstest]
    #[case::simple("my-name", true)]
    #[case::digits("abc-123", true)]
    #[case::leading_digit("1abc", false)]
    #[case::uppercase("MyName", false)]
    #[case::dotted("my.name", false)]
    #[case::trailing_dash("abc-", false)]
    #[case::empty("", false)]
    fn dns1035_labels(#[case] label: &str, #[case] valid: bool) {
        assert_eq!(is_dns1035_label(label).is_empty(), valid, "{label}");
    }

    #[test]
    fn dns1035_prefix_tolerates_trailing_dash() {
        assert!(name_is_dns1035_label("hello-", true).is_empty());
        assert!(!name_is_dns1035_label("hello-", false).is_empty());
        assert!(!name_is_dns1035_label("-", true).is_empty());
    }

    #[test]
    fn dns1123_subdomains() {
        assert!(is_dns1123_subdomain("example.com").is_empty());
        assert!(!is_dns1123_subdomain("example..com").is_empty());
        assert_eq!(
            is_dns1123_subdomain(&"a".repeat(254)),
            vec!["must be no more than 253 characters"]
        );
    }
}
