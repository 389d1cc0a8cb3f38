const SENTENCE_DELIMITER: &str = ". ";

/// Naive sentence truncation: keeps leading sentences while their combined
/// length fits the budget. Splitting is on `". "` only, so abbreviations and
/// quoted periods are cut like any other boundary.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    pub fn truncate(&self, text: &str, target_length: usize) -> String {
        let mut selected = Vec::new();
        let mut used = 0usize;
        for sentence in text.split(SENTENCE_DELIMITER) {
            let len = sentence.chars().count();
            if used + len > target_length {
                break;
            }
            selected.push(sentence);
            used += len;
        }
        let mut out = selected.join(SENTENCE_DELIMITER);
        // empty output stays empty rather than becoming a lone "."
        if !out.is_empty() && !out.ends_with('.') {
            out.push('.');
        }
        out
    }
}
