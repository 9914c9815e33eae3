use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use doclens::chunking;
use doclens::extract;
use doclens::inference::{Answer, InferenceError, QuestionAnswerer, Summarizer};
use doclens::pipeline;
use doclens::tokenizer::{self, HfTokenizer, TokenCounter, TokenizerError, WordCounter};

/// Minimal `tokenizer.json`: whitespace/punctuation pre-tokenizer over a
/// word-level vocab, so every word and punctuation run is one token.
const WORD_LEVEL_TOKENIZER: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [],
  "normalizer": null,
  "pre_tokenizer": { "type": "Whitespace" },
  "post_processor": null,
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": { "[UNK]": 0, "the": 1, "cat": 2, "sat": 3, ".": 4 },
    "unk_token": "[UNK]"
  }
}"#;

/// Helper: write a tokenizer fixture into a fresh temp dir.
fn tokenizer_fixture() -> (PathBuf, tempfile::TempDir) {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join(tokenizer::TOKENIZER_FILENAME);
    std::fs::write(&path, WORD_LEVEL_TOKENIZER).unwrap();
    (path, tmp)
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="w"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Echoes the first word of each chunk and records the calls.
#[derive(Default)]
struct EchoModels {
    summarize_calls: Mutex<Vec<(String, usize)>>,
    contexts: Mutex<Vec<String>>,
}

impl Summarizer for EchoModels {
    async fn summarize(&self, text: &str, max_length: usize) -> Result<String, InferenceError> {
        self.summarize_calls
            .lock()
            .unwrap()
            .push((text.to_string(), max_length));
        Ok(format!("About {}", text.split_whitespace().next().unwrap_or("nothing")))
    }
}

impl QuestionAnswerer for EchoModels {
    async fn answer(&self, _question: &str, context: &str) -> Result<Answer, InferenceError> {
        self.contexts.lock().unwrap().push(context.to_string());
        Ok(Answer::text(context.split_whitespace().next().unwrap_or_default()))
    }
}

// ── Tokenizer ────────────────────────────────────────────────────

#[test]
fn test_hf_tokenizer_counts_without_special_tokens() {
    let (path, _tmp) = tokenizer_fixture();
    let tok = HfTokenizer::from_file(&path).unwrap();

    assert_eq!(tok.count_tokens("the cat sat.").unwrap(), 4);
    assert_eq!(tok.count_tokens("unknown words still count").unwrap(), 4);
    assert_eq!(tok.count_tokens("").unwrap(), 0);
    assert_eq!(tok.tokenize("the cat").unwrap(), vec![1, 2]);

    let text = "the dog sat, then the cat sat.";
    assert_eq!(tok.count_tokens(text).unwrap(), tok.tokenize(text).unwrap().len());
}

#[test]
fn test_tokenizer_cache_returns_shared_instance() {
    let (path, _tmp) = tokenizer_fixture();
    let a = tokenizer::get_or_init(&path).unwrap();
    let b = tokenizer::get_or_init(&path).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_missing_tokenizer_is_not_found() {
    let tmp = tempfile::TempDir::new().unwrap();
    let missing = tmp.path().join("nope").join(tokenizer::TOKENIZER_FILENAME);
    match HfTokenizer::from_file(&missing) {
        Err(TokenizerError::NotFound(p)) => assert_eq!(p, missing),
        Err(other) => panic!("expected NotFound, got {other}"),
        Ok(_) => panic!("expected NotFound"),
    }
}

#[test]
fn test_corrupt_tokenizer_is_load_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = write_file(tmp.path(), "tokenizer.json", b"{ not json");
    assert!(matches!(
        HfTokenizer::from_file(&path),
        Err(TokenizerError::Load(_))
    ));
}

// ── Chunking with a real tokenizer ───────────────────────────────

#[test]
fn test_chunks_with_hf_tokenizer() {
    let (path, _tmp) = tokenizer_fixture();
    let tok = HfTokenizer::from_file(&path).unwrap();

    // Token counts: 4, 3, 2, 6 => budget 4 + 3 + 6 = 13.
    let text = "The cat sat. Dogs ran. Hi. A much longer closing line.";
    let plan = chunking::plan_chunks(text, &tok).unwrap();

    assert_eq!(plan.budget, 13);
    assert_eq!(plan.sentence_count, 4);
    assert_eq!(
        plan.texts(),
        vec!["The cat sat. Dogs ran. Hi.", "A much longer closing line."]
    );
    assert_eq!(plan.chunks[0].tokens, 9);
    assert_eq!(plan.chunks[1].tokens, 6);
}

#[test]
fn test_every_chunk_within_budget_unless_single_sentence() {
    let (path, _tmp) = tokenizer_fixture();
    let tok = HfTokenizer::from_file(&path).unwrap();

    let text = "One. Two words. Three words here. Four words right here. \
                Five words are right here. Six. Seven eight. Nine ten eleven.";
    let plan = chunking::plan_chunks(text, &tok).unwrap();

    for chunk in &plan.chunks {
        assert!(chunk.sentences == 1 || chunk.tokens <= plan.budget);
    }
    let total: usize = plan.chunks.iter().map(|c| c.sentences).sum();
    assert_eq!(total, plan.sentence_count);
}

// ── Extraction → pipeline ────────────────────────────────────────

#[test]
fn test_txt_file_end_to_end_chunks() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = write_file(
        tmp.path(),
        "notes.TXT",
        b"\xEF\xBB\xBFFirst sentence here. Second one. Third.\r\n",
    );

    let text = extract::extract_file(&path).unwrap();
    let chunks = chunking::compute_chunks(&text, &WordCounter).unwrap();
    assert_eq!(chunks, vec!["First sentence here. Second one. Third."]);
}

#[test]
fn test_docx_headings_join_the_following_sentence() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = write_file(
        tmp.path(),
        "report.docx",
        &docx_bytes(&[
            "Quarterly Report",
            "Revenue grew four percent this year. Costs were flat.",
        ]),
    );

    let text = extract::extract_file(&path).unwrap();
    assert_eq!(text, "Quarterly Report\nRevenue grew four percent this year. Costs were flat.");

    // Word counts 8 and 3: the heading is part of the first sentence.
    let plan = chunking::plan_chunks(&text, &WordCounter).unwrap();
    assert_eq!(plan.sentence_count, 2);
    assert_eq!(plan.budget, 11);
    assert_eq!(
        plan.texts(),
        vec!["Quarterly Report Revenue grew four percent this year. Costs were flat."]
    );
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = write_file(tmp.path(), "slides.key", b"whatever");
    let err = extract::extract_file(&path).unwrap_err();
    assert!(matches!(err, extract::ExtractError::Unsupported(ref e) if e == "key"));
}

#[tokio::test]
async fn test_docx_summarize_and_download() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = write_file(
        tmp.path(),
        "report.docx",
        &docx_bytes(&[
            "Revenue grew four percent. Costs were flat.",
            "Margins improved. Outlook is stable for the year ahead.",
        ]),
    );

    let text = extract::extract_file(&path).unwrap();
    assert!(text.contains('\n'));

    let models = EchoModels::default();
    let summary = pipeline::summarize_document(&text, &WordCounter, &models, 0.40)
        .await
        .unwrap();

    let calls = models.summarize_calls.lock().unwrap();
    assert!(!calls.is_empty());
    let expected_limit = pipeline::summary_length_limit(&text, 0.40);
    assert!(calls.iter().all(|(_, max)| *max == expected_limit));

    // One output per chunk, in order, single-space separated.
    let outputs: Vec<String> = calls
        .iter()
        .map(|(chunk, _)| format!("About {}", chunk.split_whitespace().next().unwrap()))
        .collect();
    assert_eq!(summary, outputs.join(" "));
    assert!(summary.starts_with("About Revenue"));

    let out = tmp.path().join(pipeline::SUMMARY_FILENAME);
    std::fs::write(&out, pipeline::summary_artifact(&summary)).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), summary);
}

#[tokio::test]
async fn test_query_uses_fixed_windows() {
    let word = "lorem ";
    let text = word.repeat(250); // 1500 chars => 600 + 600 + 300
    let models = EchoModels::default();

    let answer = pipeline::query_document(&text, "What is it?", &models, 600)
        .await
        .unwrap();

    let contexts = models.contexts.lock().unwrap();
    assert_eq!(contexts.len(), 3);
    assert_eq!(contexts.iter().map(|c| c.chars().count()).collect::<Vec<_>>(), vec![600, 600, 300]);
    assert_eq!(contexts.concat(), text);
    assert_eq!(answer, "Lorem lorem lorem.");
}
