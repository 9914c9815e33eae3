//! Token-budgeted chunking for length-limited models.
//!
//! The per-chunk budget is taken from the document itself: the sum of the
//! token counts of its three longest sentences. Sentences are then packed
//! greedily, in order, extending the current chunk until the next sentence
//! would push it over the budget.

use crate::sentences::split_sentences;
use crate::tokenizer::{TokenCounter, TokenizerError};

/// How many of the longest sentences make up the budget.
pub const BUDGET_SENTENCES: usize = 3;

/// Character width of question-answering windows.
pub const DEFAULT_WINDOW_CHARS: usize = 600;

/// A chunk together with the bookkeeping that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChunk {
    pub text: String,
    /// Sum of the token counts of the sentences in this chunk.
    pub tokens: usize,
    pub sentences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkPlan {
    pub budget: usize,
    pub sentence_count: usize,
    pub chunks: Vec<PlannedChunk>,
}

impl ChunkPlan {
    pub fn texts(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.text.clone()).collect()
    }

    pub fn into_texts(self) -> Vec<String> {
        self.chunks.into_iter().map(|c| c.text).collect()
    }
}

/// Split `text` into token-bounded chunks of whole sentences.
///
/// Whitespace-only input yields no chunks. Counter failures are returned
/// as-is.
pub fn compute_chunks<C>(text: &str, counter: &C) -> Result<Vec<String>, TokenizerError>
where
    C: TokenCounter + ?Sized,
{
    Ok(plan_chunks(text, counter)?.into_texts())
}

/// Like [`compute_chunks`] but also reports the budget and per-chunk totals.
pub fn plan_chunks<C>(text: &str, counter: &C) -> Result<ChunkPlan, TokenizerError>
where
    C: TokenCounter + ?Sized,
{
    let text = text.trim();
    if text.is_empty() {
        return Ok(ChunkPlan::default());
    }

    let sentences = split_sentences(text);
    let counts = sentences
        .iter()
        .map(|s| counter.count_tokens(s))
        .collect::<Result<Vec<_>, _>>()?;

    let budget = token_budget(&counts);
    let chunks = pack_sentences(&sentences, &counts, budget);

    tracing::debug!(
        sentences = sentences.len(),
        budget,
        chunks = chunks.len(),
        "planned chunks"
    );

    Ok(ChunkPlan {
        budget,
        sentence_count: sentences.len(),
        chunks,
    })
}

/// Sum of the [`BUDGET_SENTENCES`] largest counts (all of them if fewer).
pub fn token_budget(counts: &[usize]) -> usize {
    let mut sorted = counts.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.iter().take(BUDGET_SENTENCES).sum()
}

/// Greedy first-fit packing of `sentences` under `budget`.
///
/// A sentence joins the current chunk while the running total stays within
/// the budget; otherwise the chunk is closed and the sentence opens the next
/// one. A sentence that is over budget by itself still gets its own chunk.
///
/// `counts[i]` is the token count of `sentences[i]`.
pub fn pack_sentences(sentences: &[String], counts: &[usize], budget: usize) -> Vec<PlannedChunk> {
    debug_assert_eq!(sentences.len(), counts.len());

    let mut chunks = Vec::new();
    let mut current = PlannedChunk {
        text: String::new(),
        tokens: 0,
        sentences: 0,
    };

    for (sentence, &count) in sentences.iter().zip(counts) {
        let combined = current.tokens + count;
        if combined <= budget {
            if current.sentences > 0 {
                current.text.push(' ');
            }
            current.text.push_str(sentence);
            current.tokens = combined;
            current.sentences += 1;
        } else {
            let next = PlannedChunk {
                text: sentence.clone(),
                tokens: count,
                sentences: 1,
            };
            let done = std::mem::replace(&mut current, next);
            if done.sentences > 0 {
                chunks.push(done);
            }
        }
    }

    if current.sentences > 0 {
        chunks.push(current);
    }

    chunks
}

/// Fixed-width character windows over `text`, no overlap.
///
/// Windows break on `char` boundaries, never inside a code point.
pub fn split_windows(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|window| window.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// Counter that looks sentences up in a fixed table.
    struct Table(HashMap<&'static str, usize>);

    impl Table {
        fn new(entries: &[(&'static str, usize)]) -> Self {
            Self(entries.iter().copied().collect())
        }
    }

    impl TokenCounter for Table {
        fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
            self.0
                .get(text)
                .copied()
                .ok_or_else(|| TokenizerError::Encode(format!("unknown sentence: {text}")))
        }
    }

    struct Failing;

    impl TokenCounter for Failing {
        fn count_tokens(&self, _text: &str) -> Result<usize, TokenizerError> {
            Err(TokenizerError::Encode("boom".to_string()))
        }
    }

    struct Counting<'a>(&'a Cell<usize>);

    impl TokenCounter for Counting<'_> {
        fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
            self.0.set(self.0.get() + 1);
            Ok(text.split_whitespace().count())
        }
    }

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn three_equal_sentences_fill_one_chunk() {
        let counter = Table::new(&[("One.", 5), ("Two.", 5), ("Three.", 5)]);
        let plan = plan_chunks("One. Two. Three.", &counter).unwrap();
        assert_eq!(plan.budget, 15);
        assert_eq!(plan.texts(), vec!["One. Two. Three."]);
        assert_eq!(plan.chunks[0].tokens, 15);
    }

    #[test]
    fn sentence_that_overflows_starts_next_chunk() {
        let counter = Table::new(&[("A.", 10), ("B.", 10), ("C.", 10), ("D.", 1)]);
        let plan = plan_chunks("A. B. C. D.", &counter).unwrap();
        assert_eq!(plan.budget, 30);
        assert_eq!(plan.texts(), vec!["A. B. C.", "D."]);
        assert_eq!(plan.chunks[0].sentences, 3);
        assert_eq!(plan.chunks[1].tokens, 1);
    }

    #[test]
    fn single_long_sentence_is_one_chunk() {
        let counter = Table::new(&[("Only one sentence here.", 500)]);
        let chunks = compute_chunks("Only one sentence here.", &counter).unwrap();
        assert_eq!(chunks, vec!["Only one sentence here."]);
    }

    #[test]
    fn blank_input_has_no_chunks() {
        assert!(compute_chunks("", &Failing).unwrap().is_empty());
        assert!(compute_chunks("  \r\n \t\r", &Failing).unwrap().is_empty());
    }

    #[test]
    fn counter_errors_propagate() {
        let err = compute_chunks("Some text. More text.", &Failing).unwrap_err();
        assert!(matches!(err, TokenizerError::Encode(ref m) if m == "boom"));
    }

    #[test]
    fn budget_uses_three_largest() {
        assert_eq!(token_budget(&[]), 0);
        assert_eq!(token_budget(&[7]), 7);
        assert_eq!(token_budget(&[7, 2]), 9);
        assert_eq!(token_budget(&[1, 9, 4, 8, 2, 7]), 24);
    }

    #[test]
    fn oversized_sentence_stands_alone() {
        let sentences = owned(&["a", "b", "huge", "c", "d"]);
        let chunks = pack_sentences(&sentences, &[2, 2, 50, 2, 2], 10);
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a b", "huge", "c d"]);
        assert_eq!(chunks[1].tokens, 50);
    }

    #[test]
    fn oversized_first_sentence_emits_no_empty_chunk() {
        let sentences = owned(&["huge", "small"]);
        let chunks = pack_sentences(&sentences, &[50, 1], 10);
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["huge", "small"]);
    }

    #[test]
    fn exact_fit_stays_in_chunk() {
        let sentences = owned(&["a", "b", "c"]);
        let chunks = pack_sentences(&sentences, &[4, 6, 1], 10);
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a b", "c"]);
    }

    #[test]
    fn zero_token_sentences_always_fit() {
        let sentences = owned(&["x", "y"]);
        let chunks = pack_sentences(&sentences, &[0, 0], 0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "x y");
    }

    #[test]
    fn chunks_partition_sentences_and_respect_budget() {
        let text = "The quick brown fox jumps. It lands. Then it runs far away into the woods. \
                    Night falls on the forest. Owls call out. The fox sleeps. \
                    Morning comes with a long slow sunrise over the hills. Done.";
        let calls = Cell::new(0);
        let plan = plan_chunks(text, &Counting(&calls)).unwrap();
        let sentences = split_sentences(text);

        // Coverage: chunks rejoined give back the sentence sequence.
        let rejoined = plan.texts().join(" ");
        assert_eq!(rejoined, sentences.join(" "));
        assert_eq!(plan.chunks.iter().map(|c| c.sentences).sum::<usize>(), sentences.len());

        for chunk in &plan.chunks {
            assert!(!chunk.text.is_empty());
            if chunk.sentences > 1 {
                assert!(chunk.tokens <= plan.budget);
            }
        }
        assert!(plan.chunks.len() > 1);
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "One two three. Four five. Six seven eight nine. Ten. Eleven twelve.";
        let calls = Cell::new(0);
        let first = compute_chunks(text, &Counting(&calls)).unwrap();
        let second = compute_chunks(text, &Counting(&calls)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn each_sentence_is_counted_once() {
        let calls = Cell::new(0);
        compute_chunks("A b. C d. E f. G h.", &Counting(&calls)).unwrap();
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn windows_split_by_characters() {
        assert!(split_windows("", 600).is_empty());
        assert_eq!(split_windows("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(split_windows("abcd", 4), vec!["abcd"]);
        assert_eq!(split_windows("héllo wörld", 3), vec!["hél", "lo ", "wör", "ld"]);
    }

    #[test]
    fn zero_width_window_is_treated_as_one() {
        assert_eq!(split_windows("abc", 0), vec!["a", "b", "c"]);
    }
}
