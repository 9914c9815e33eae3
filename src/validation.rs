//! Input checks shared by the HTTP routes and the CLI.

/// Maximum document text size accepted for summarize/query (2 MB).
pub const MAX_TEXT_SIZE: usize = 2 * 1024 * 1024;
/// Maximum uploaded file size before base64 decoding (16 MB).
pub const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;
pub const MAX_QUESTION_LENGTH: usize = 1000;

/// Reject oversized document text. Blank text is allowed; callers decide
/// what an empty document means.
pub fn validate_text(text: &str) -> Result<(), String> {
    if text.len() > MAX_TEXT_SIZE {
        return Err(format!(
            "Text too large ({} bytes). Maximum is {} bytes.",
            text.len(),
            MAX_TEXT_SIZE
        ));
    }
    Ok(())
}

/// Trimmed question, or an error if it is blank or too long.
pub fn validate_question(question: &str) -> Result<&str, String> {
    let q = question.trim();
    if q.is_empty() {
        return Err("Please enter a question".to_string());
    }
    let chars = q.chars().count();
    if chars > MAX_QUESTION_LENGTH {
        return Err(format!(
            "Question too long ({chars} chars). Maximum is {MAX_QUESTION_LENGTH} chars."
        ));
    }
    Ok(q)
}

/// Reject filenames that carry a directory part.
pub fn validate_filename(filename: &str) -> Result<(), String> {
    if filename.trim().is_empty() {
        return Err("Filename cannot be empty".to_string());
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err("Filename must not contain a path".to_string());
    }
    Ok(())
}

/// Sanitize error messages to avoid leaking internal paths.
pub fn sanitize_error(e: &impl std::fmt::Display) -> String {
    let msg = e.to_string();
    if msg.contains('/') || msg.contains('\\') {
        return "Internal error".to_string();
    }
    msg
}
