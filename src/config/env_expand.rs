//! `$VAR` / `${VAR}` expansion for string config values.

use std::env;

/// Expands environment references using the process environment.
/// Unset variables expand to the empty string.
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| env::var(name).ok())
}

/// Expands `$NAME` and `${NAME}` using `lookup`. A `$` not followed by a name
/// is kept as is.
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    // unterminated, keep verbatim
                    out.push_str(&rest[pos..]);
                    rest = "";
                }
            }
            continue;
        }

        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..name_len]).unwrap_or_default());
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/checker".to_string()),
            "ENV" => Some("prod".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expands_plain_and_braced() {
        assert_eq!(expand_with("$HOME/checks", lookup), "/home/checker/checks");
        assert_eq!(expand_with("${HOME}/checks-${ENV}", lookup), "/home/checker/checks-prod");
    }

    #[test]
    fn test_unset_expands_to_empty() {
        assert_eq!(expand_with("a${MISSING}b$MISSING", lookup), "ab");
    }

    #[test]
    fn test_literal_dollars_survive() {
        assert_eq!(expand_with("cost: 5$", lookup), "cost: 5$");
        assert_eq!(expand_with("$-x", lookup), "$-x");
        assert_eq!(expand_with("${HOME", lookup), "${HOME");
        assert_eq!(expand_with("no refs", lookup), "no refs");
    }
}
