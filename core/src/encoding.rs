//! Percent-encoding for query strings and form bodies.
//!
//! Components are escaped with a query-component set that leaves `+`
//! literal, then every `+` is rewritten to `%2B` so a receiver that decodes
//! `+` as a space still recovers the original text.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a query key or value. Non-ASCII bytes are
/// always escaped by `utf8_percent_encode`.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'&')
    .add(b'=');

/// Encode `key=value` pairs joined by `&`, in iteration order.
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let query = pairs
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    query.replace('+', "%2B")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_becomes_percent_2b() {
        assert_eq!(encode_pairs([("sum", "1+1=2")]), "sum=1%2B1%3D2");
    }

    #[test]
    fn space_is_percent_20() {
        assert_eq!(encode_pairs([("q", "a b")]), "q=a%20b");
    }

    #[test]
    fn separators_inside_values_are_escaped() {
        assert_eq!(encode_pairs([("a&b", "c=d#e")]), "a%26b=c%3Dd%23e");
    }

    #[test]
    fn percent_sign_is_escaped() {
        assert_eq!(encode_pairs([("p", "100%")]), "p=100%25");
    }

    #[test]
    fn non_ascii_is_utf8_escaped() {
        assert_eq!(encode_pairs([("city", "Zürich")]), "city=Z%C3%BCrich");
    }

    #[test]
    fn unreserved_and_sub_delims_stay_literal() {
        assert_eq!(encode_pairs([("k", "a-b_c.d~e!$()*,;:@/?")]), "k=a-b_c.d~e!$()*,;:@/?");
    }

    #[test]
    fn apostrophe_is_escaped() {
        assert_eq!(encode_pairs([("q", "it's")]), "q=it%27s");
    }

    #[test]
    fn pairs_join_with_ampersand() {
        assert_eq!(encode_pairs([("a", "1"), ("b", "2")]), "a=1&b=2");
        assert_eq!(encode_pairs(std::iter::empty()), "");
    }
}
