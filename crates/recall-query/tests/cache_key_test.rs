use proptest::prelude::*;
use recall_core::models::QueryRequest;
use recall_query::query_cache_key;

proptest! {
    #[test]
    fn key_ignores_filter_insertion_order(
        filters in proptest::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 0..8),
        text in "[a-zA-Z ?]{1,30}",
    ) {
        let forward = filters
            .iter()
            .fold(QueryRequest::new(text.clone()), |r, (k, v)| r.with_filter(k.clone(), v.clone()));
        let backward = filters
            .iter()
            .rev()
            .fold(QueryRequest::new(text), |r, (k, v)| r.with_filter(k.clone(), v.clone()));
        prop_assert_eq!(query_cache_key(&forward), query_cache_key(&backward));
    }

    #[test]
    fn different_pages_never_collide(a in 0i64..500, b in 0i64..500) {
        prop_assume!(a != b);
        let x = QueryRequest::new("q").with_page(10, a);
        let y = QueryRequest::new("q").with_page(10, b);
        prop_assert_ne!(query_cache_key(&x), query_cache_key(&y));
    }
}

#[test]
fn filter_values_containing_separators_get_their_own_key() {
    let split = QueryRequest::new("q").with_filter("a", "b").with_filter("c", "d");
    let joined = QueryRequest::new("q").with_filter("a", "b&c=d");
    assert_ne!(query_cache_key(&split), query_cache_key(&joined));
}

#[test]
fn field_names_containing_commas_get_their_own_key() {
    let one = QueryRequest::new("q").with_fields(["a,b"]);
    let two = QueryRequest::new("q").with_fields(["a", "b"]);
    assert_ne!(query_cache_key(&one), query_cache_key(&two));
}
