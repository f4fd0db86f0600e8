use indexmap::IndexSet;

/// Insertion-ordered, capped accumulator of every suggestion seen during one expansion.
///
/// Entries are never removed; once `cap` entries are held, further merges are ignored.
#[derive(Debug)]
pub struct SuggestionSet {
    entries: IndexSet<String>,
    cap: usize,
}

impl SuggestionSet {
    pub fn new(seed: &str, cap: usize) -> Self {
        let mut entries = IndexSet::new();
        entries.insert(seed.to_string());
        Self { entries, cap }
    }

    /// Merges `suggestions` in order, returning how many were new.
    pub fn merge<I>(&mut self, suggestions: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = 0;
        for suggestion in suggestions {
            if self.is_full() {
                break;
            }
            if self.entries.insert(suggestion) {
                added += 1;
            }
        }
        added
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.cap
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The first `limit` entries in insertion order, excluding `seed`.
    pub fn round_two_seeds(&self, seed: &str, limit: usize) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.as_str() != seed)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Every merged suggestion, in insertion order, without the seed.
    pub fn into_suggestions(self) -> impl Iterator<Item = String> {
        self.entries.into_iter().skip(1)
    }
}
