//! Query planner — turns a raw gym name into candidate search strings.
//!
//! Korean gym names carry corporate markers ("주식회사", "(주)", "㈜") and
//! branch suffixes ("...점") that hurt place-search recall, so the planner
//! emits the cleaned name in several forms. Order is stable but carries no
//! meaning; duplicates and empties are dropped.

/// Corporate markers stripped before planning.
const CORPORATE_MARKERS: [&str; 5] = ["주식회사", "(주)", "(유)", "㈜", "㈔"];

/// Synonym substitutions applied when the cleaned name contains the source term.
const SYNONYMS: [(&str, &str); 3] = [("짐", "GYM"), ("헬스", "피트니스"), ("피트니스", "헬스")];

/// Plan the ordered, deduplicated query set for one gym name.
pub fn plan(gym_name: &str) -> Vec<String> {
    let cleaned = clean_name(gym_name);
    if cleaned.is_empty() {
        return Vec::new();
    }

    let mut queries = vec![format!("{cleaned} 헬스"), cleaned.clone()];

    if let Some(first) = cleaned.split_whitespace().next() {
        queries.push(format!("{first} 헬스"));
    }

    for (from, to) in SYNONYMS {
        if cleaned.contains(from) {
            queries.push(cleaned.replace(from, to));
        }
    }

    // "강남점" → "강남": branch suffix stripped variant
    if let Some(stripped) = cleaned.strip_suffix('점') {
        queries.push(stripped.trim_end().to_string());
    }

    dedup_stable(queries)
}

/// Strip corporate markers and collapse whitespace.
fn clean_name(raw: &str) -> String {
    let mut name = raw.to_string();
    for marker in CORPORATE_MARKERS {
        name = name.replace(marker, " ");
    }
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn dedup_stable(queries: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    queries
        .into_iter()
        .filter(|q| !q.is_empty() && seen.insert(q.clone()))
        .collect()
}
