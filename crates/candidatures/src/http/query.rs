use std::collections::BTreeMap;

use url::form_urlencoded;

/// Flat query parameters. `None` values are left out of the query string.
///
/// Keys are serialized in sorted order, not in the order they were inserted. Callers that
/// need a specific order pass pairs straight to [`build_query_string`], which keeps the
/// order of its input.
pub type QueryParams = BTreeMap<String, Option<String>>;

/// Serializes parameters as `application/x-www-form-urlencoded`, prefixed with `?`.
/// Returns an empty string when no parameter carries a value.
pub fn build_query_string<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut appended = false;
    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            appended = true;
        }
    }

    if appended {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_produce_no_question_mark() {
        assert_eq!(build_query_string(std::iter::empty()), "");
    }

    #[test]
    fn missing_values_are_omitted() {
        let query = build_query_string([("poste", None), ("statut", Some("Accepté"))]);
        assert_eq!(query, "?statut=Accept%C3%A9");

        assert_eq!(build_query_string([("poste", None::<&str>)]), "");
    }

    #[test]
    fn query_params_serialize_in_key_order() {
        let mut params = QueryParams::new();
        params.insert("statut".to_string(), Some("Refusé".to_string()));
        params.insert("_sort".to_string(), Some("nom".to_string()));
        params.insert("localisation".to_string(), Some("Oran".to_string()));

        let query = build_query_string(
            params
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_deref())),
        );
        assert_eq!(query, "?_sort=nom&localisation=Oran&statut=Refus%C3%A9");

        let ordered = build_query_string([("statut", Some("Refusé")), ("_sort", Some("nom"))]);
        assert_eq!(ordered, "?statut=Refus%C3%A9&_sort=nom");
    }

    #[test]
    fn values_are_form_encoded() {
        let query = build_query_string([("_sort", Some("nom")), ("ville", Some("Alger & Oran"))]);
        assert_eq!(query, "?_sort=nom&ville=Alger+%26+Oran");
    }
}
