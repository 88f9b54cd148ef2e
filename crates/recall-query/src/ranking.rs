//! FILTER and SORT stages applied to backend candidates.

use std::cmp::Ordering;

use recall_core::constants::{PARTITION_FILTER_KEY, ROLE_FILTER_KEY};
use recall_core::models::{QueryRequest, ScoredDocument, SortOrder};

/// Whether a filter key is consumed by backend routing instead of the
/// metadata-equality stage.
pub fn is_routing_filter(key: &str) -> bool {
    key == ROLE_FILTER_KEY || key == PARTITION_FILTER_KEY
}

/// Drop candidates below `min_score` or failing a metadata-equality filter.
pub fn apply_filters(
    candidates: Vec<ScoredDocument>,
    request: &QueryRequest,
) -> Vec<ScoredDocument> {
    let filters: Vec<(&str, &str)> = request
        .filters
        .iter()
        .filter(|(k, _)| !is_routing_filter(k))
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    candidates
        .into_iter()
        .filter(|c| c.score >= request.min_score)
        .filter(|c| {
            filters
                .iter()
                .all(|(key, value)| c.document.field(key) == Some(*value))
        })
        .collect()
}

/// Numeric values order before non-numeric ones. Numbers compare by value,
/// everything else lexicographically.
fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Stable sort in place. RELEVANCE orders by descending score; ASC/DESC
/// order by `sort_field` (missing values last in both directions) or by
/// score when no field is named.
pub fn sort_candidates(candidates: &mut [ScoredDocument], request: &QueryRequest) {
    let by_score_desc = |a: &ScoredDocument, b: &ScoredDocument| b.score.total_cmp(&a.score);

    match (request.sort_order, request.sort_field.as_deref()) {
        (SortOrder::Relevance, _) => candidates.sort_by(by_score_desc),
        (SortOrder::Asc, None) => candidates.sort_by(|a, b| a.score.total_cmp(&b.score)),
        (SortOrder::Desc, None) => candidates.sort_by(by_score_desc),
        (order, Some(field)) => candidates.sort_by(|a, b| {
            match (a.document.field(field), b.document.field(field)) {
                (Some(x), Some(y)) => {
                    let ord = compare_values(x, y);
                    if order == SortOrder::Desc {
                        ord.reverse()
                    } else {
                        ord
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::models::Document;

    fn doc(id: &str, score: f64, year: Option<&str>) -> ScoredDocument {
        let mut d = Document::new(id, format!("title {id}"), "");
        if let Some(y) = year {
            d = d.with_metadata("year", y);
        }
        ScoredDocument::new(d, score)
    }

    fn ids(docs: &[ScoredDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.document.id.as_str()).collect()
    }

    #[test]
    fn min_score_and_metadata_filters() {
        let request = QueryRequest::new("q")
            .with_min_score(0.5)
            .with_filter("year", "2023")
            .with_filter("role", "support");
        let kept = apply_filters(
            vec![
                doc("a", 0.9, Some("2023")),
                doc("b", 0.4, Some("2023")),
                doc("c", 0.8, Some("2021")),
                doc("d", 0.7, None),
            ],
            &request,
        );
        assert_eq!(ids(&kept), vec!["a"]);
    }

    #[test]
    fn numeric_sort_with_missing_last() {
        let mut docs = vec![
            doc("a", 0.1, Some("10")),
            doc("b", 0.2, None),
            doc("c", 0.3, Some("9")),
            doc("d", 0.4, Some("100")),
        ];
        sort_candidates(&mut docs, &QueryRequest::new("q").with_sort("year", SortOrder::Asc));
        assert_eq!(ids(&docs), vec!["c", "a", "d", "b"]);
        sort_candidates(&mut docs, &QueryRequest::new("q").with_sort("year", SortOrder::Desc));
        assert_eq!(ids(&docs), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn mixed_numeric_and_text_values_order_consistently() {
        let expected = vec!["nine", "ten", "text"];
        let orders = [
            ["ten", "nine", "text"],
            ["text", "ten", "nine"],
            ["nine", "text", "ten"],
        ];
        for order in orders {
            let mut docs: Vec<ScoredDocument> = order
                .iter()
                .map(|id| {
                    let year = match *id {
                        "ten" => "10",
                        "nine" => "9",
                        _ => "1a",
                    };
                    doc(id, 0.0, Some(year))
                })
                .collect();
            sort_candidates(&mut docs, &QueryRequest::new("q").with_sort("year", SortOrder::Asc));
            assert_eq!(ids(&docs), expected);
        }
        assert_eq!(compare_values("1a", "9"), Ordering::Greater);
        assert_eq!(compare_values("9", "10"), Ordering::Less);
        assert_eq!(compare_values("10", "1a"), Ordering::Less);
    }

    #[test]
    fn lexicographic_when_not_numeric() {
        let mut docs = vec![doc("b", 0.0, None), doc("a", 0.0, None)];
        sort_candidates(&mut docs, &QueryRequest::new("q").with_sort("title", SortOrder::Asc));
        assert_eq!(ids(&docs), vec!["a", "b"]);
    }

    #[test]
    fn relevance_sort_is_stable() {
        let mut docs = vec![doc("x", 0.5, None), doc("y", 0.9, None), doc("z", 0.5, None)];
        sort_candidates(&mut docs, &QueryRequest::new("q"));
        assert_eq!(ids(&docs), vec!["y", "x", "z"]);
    }
}
