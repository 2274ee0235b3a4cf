//! Prompt builder: fixed system message + context/question human turn.

use rag_store::RagHit;

/// System instructions for grounded answers.
pub const SYSTEM_PROMPT: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, say that you don't know. \
Use three sentences maximum and keep the answer concise.";

/// Joins hit texts with blank lines, in rank order.
pub fn build_context(hits: &[RagHit]) -> String {
    hits.iter()
        .map(|h| h.text.trim())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Human turn sent to the model.
///
/// # Example
/// ```
/// # use contextor::prompt::build_user_prompt;
/// let prompt = build_user_prompt("What color is the sky?", &[]);
/// assert_eq!(prompt, "Context:\n\n\nQuestion:\nWhat color is the sky?");
/// ```
pub fn build_user_prompt(question: &str, hits: &[RagHit]) -> String {
    format!(
        "Context:\n{}\n\nQuestion:\n{}",
        build_context(hits),
        question
    )
}
