//! Query parameters and RFC 3986 query component encoding.
//!
//! Keys and values are plain strings, so every parameter set can be encoded
//! without a runtime type check. Pairs keep their insertion order, which
//! makes the encoded query string deterministic.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except the RFC 3986 unreserved characters.
///
/// <https://www.rfc-editor.org/rfc/rfc3986#section-2.3>
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes a single query key or value.
///
/// ASCII letters, digits, `-`, `.`, `_` and `~` are left as they are. Every
/// other byte of the UTF-8 encoding becomes `%XX`.
#[must_use]
pub fn encode_query_component(input: &str) -> Cow<'_, str> {
    utf8_percent_encode(input, QUERY_COMPONENT).into()
}

/// An ordered set of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. Repeated keys are kept.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Appends a parameter, returning the updated set.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the parameters as `key1=value1&key2=value2`.
    ///
    /// Keys and values are escaped with [`encode_query_component`]. An empty
    /// set encodes to an empty string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = String::new();
        for (key, value) in self.iter() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&encode_query_component(key));
            query.push('=');
            query.push_str(&encode_query_component(value));
        }
        query
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.pairs
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for QueryParams {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for QueryParams {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

/// Pairs follow the map's iteration order, which `HashMap` leaves unspecified.
impl<K: Into<String>, V: Into<String>, S: BuildHasher> From<HashMap<K, V, S>> for QueryParams {
    fn from(map: HashMap<K, V, S>) -> Self {
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use percent_encoding::percent_decode_str;

    use super::*;

    #[test]
    fn unreserved_characters_are_not_escaped() {
        let params = QueryParams::from([("api-key_1", "v1.2~beta"), ("Page", "10")]);

        assert_eq!(params.to_query_string(), "api-key_1=v1.2~beta&Page=10");
    }

    #[test]
    fn space_is_escaped_as_percent_20() {
        let params = QueryParams::from([("q", "a b")]);

        assert_eq!(params.to_query_string(), "q=a%20b");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(encode_query_component("a&b=c?d/e"), "a%26b%3Dc%3Fd%2Fe");
        assert_eq!(encode_query_component("+:@#[]!$'()*,;"), "%2B%3A%40%23%5B%5D%21%24%27%28%29%2A%2C%3B");
        assert_eq!(encode_query_component("100%"), "100%25");
    }

    #[test]
    fn non_ascii_is_escaped_per_utf8_byte() {
        assert_eq!(encode_query_component("café"), "caf%C3%A9");
        assert_eq!(encode_query_component("日"), "%E6%97%A5");
    }

    #[test]
    fn percent_decoding_restores_original() {
        let originals = [
            "a b",
            "key=value&other=thing",
            "what?/where#now",
            "100% sure, isn't it",
            "emoji 🔥 and ümlauts",
            "",
        ];

        for original in originals {
            let encoded = encode_query_component(original);
            assert!(
                encoded
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b"-._~%".contains(&b)),
                "unexpected character left in {encoded:?}"
            );

            let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn keys_are_escaped_too() {
        let params = QueryParams::new().with("filter[name]", "x y");

        assert_eq!(params.to_query_string(), "filter%5Bname%5D=x%20y");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut params = QueryParams::new();
        params.push("z", "1");
        params.push("a", "2");
        params.extend([("m", "3")]);

        assert_eq!(params.to_query_string(), "z=1&a=2&m=3");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn btree_map_encodes_in_key_order() {
        let map = BTreeMap::from([("b", "2"), ("a", "1")]);

        assert_eq!(QueryParams::from(map).to_query_string(), "a=1&b=2");
    }

    #[test]
    fn hash_map_encodes_every_pair() {
        let map = HashMap::from([
            ("id".to_owned(), "42".to_owned()),
            ("name".to_owned(), "a b".to_owned()),
        ]);
        let query = QueryParams::from(map).to_query_string();

        let mut pairs: Vec<&str> = query.split('&').collect();
        pairs.sort_unstable();
        assert_eq!(pairs, ["id=42", "name=a%20b"]);
    }

    #[test]
    fn empty_params_encode_to_empty_string() {
        let params = QueryParams::new();

        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
    }

    #[test]
    fn repeated_keys_are_kept() {
        let params = QueryParams::from(vec![("tag", "a"), ("tag", "b")]);

        assert_eq!(params.to_query_string(), "tag=a&tag=b");
    }
}
