const PREFIX_WORDS: [&str; 8] = ["how", "which", "why", "where", "who", "when", "are", "what"];
const SUFFIX_WORDS: [&str; 10] = [
    "like", "for", "without", "with", "versus", "vs", "to", "near", "except", "has",
];
const NUMBERS: std::ops::RangeInclusive<u8> = 0..=9;

/// Number of round-one queries produced for any seed.
pub const VARIANT_COUNT: usize = 1 + (26 + PREFIX_WORDS.len()) + (26 + SUFFIX_WORDS.len()) + 10;

fn letters() -> impl Iterator<Item = String> {
    ('a'..='z').map(String::from)
}

/// Builds the round-one query list for `seed`, in a fixed order:
/// the seed itself, prefixed forms, suffixed forms, then numbered forms.
pub fn variants(seed: &str) -> Vec<String> {
    let mut queries = Vec::with_capacity(VARIANT_COUNT);
    queries.push(seed.to_string());

    let prefixes = letters().chain(PREFIX_WORDS.iter().map(|w| w.to_string()));
    queries.extend(prefixes.map(|p| format!("{p} {seed}")));

    let suffixes = letters().chain(SUFFIX_WORDS.iter().map(|w| w.to_string()));
    queries.extend(suffixes.map(|s| format!("{seed} {s}")));

    queries.extend(NUMBERS.map(|n| format!("{seed} {n}")));

    queries
}
