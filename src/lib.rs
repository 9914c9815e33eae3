//! Summarize documents and ask questions about them.
//!
//! Text is pulled out of `.txt`, `.docx`, `.pptx` and `.pdf` files, split
//! into token-budgeted chunks of whole sentences, and handed to pretrained
//! summarization and question-answering models.

pub mod chunking;
pub mod config;
pub mod extract;
pub mod http;
pub mod inference;
pub mod pipeline;
pub mod sentences;
pub mod tokenizer;
pub mod validation;
