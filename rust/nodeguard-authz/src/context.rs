use http::Extensions;
use nodeguard_content::Principal;

/// The query string of a request.
///
/// Names are matched without regard to ASCII case. When a name occurs more
/// than once, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Parse a raw, form-encoded query string. A leading `?` is ignored.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self {
            pairs: url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// The value of the first parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether a parameter called `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of parameters, duplicates included.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the query string has no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryString
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// What an authorization check gets to see of the request it runs for.
#[derive(Debug)]
pub struct RequestContext {
    /// The authenticated user
    pub principal: Principal,
    /// The request's query string
    pub query: QueryString,
    /// Values shared with later stages of request handling, one per type.
    /// Authorization checks leave the node they loaded here, so a cached
    /// content node and, say, a cached media item never overwrite each
    /// other.
    pub items: Extensions,
}

impl RequestContext {
    /// Create a context with no cached items.
    pub fn new(principal: Principal, query: QueryString) -> Self {
        Self {
            principal,
            query,
            items: Extensions::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_parses_raw_query_strings() {
        let query = QueryString::parse("?id=1234&contentId=umb%3A%2F%2Fdocument&id=5");
        assert_eq!(query.len(), 3);
        assert_eq!(query.get("id"), Some("1234"));
        assert_eq!(query.get("contentId"), Some("umb://document"));
        assert_eq!(query.get("missing"), None);
    }

    #[test]
    fn it_matches_names_without_regard_to_case() {
        let query: QueryString = [("ContentId", "42")].into_iter().collect();
        assert_eq!(query.get("contentid"), Some("42"));
        assert!(query.contains("CONTENTID"));
    }

    #[test]
    fn it_keeps_one_item_per_type() {
        #[derive(Debug, Clone, PartialEq)]
        struct Media(u32);

        let mut context = RequestContext::new(
            Principal::new(nodeguard_content::UserId(1), "admin"),
            QueryString::default(),
        );
        let items = &mut context.items;
        assert_eq!(items.insert(String::from("first")), None);
        assert_eq!(items.insert(Media(7)), None);
        assert_eq!(
            items.insert(String::from("second")),
            Some(String::from("first"))
        );

        assert_eq!(items.len(), 2);
        assert_eq!(items.get::<String>().map(String::as_str), Some("second"));
        assert_eq!(items.get::<Media>(), Some(&Media(7)));
        assert_eq!(items.remove::<Media>(), Some(Media(7)));
        assert_eq!(items.get::<Media>(), None);
    }
}
