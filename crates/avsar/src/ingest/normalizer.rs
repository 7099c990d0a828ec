/// Canonicalizes state and district names from catalog exports: trims,
/// collapses internal whitespace, and title-cases each word so "MAHARASHTRA"
/// and " maharashtra " both land on "Maharashtra".
pub(crate) fn normalize_region(raw: &str) -> String {
    raw.split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}
