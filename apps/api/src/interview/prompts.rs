//! All LLM prompt constants for the interview module.
//! Reuses cross-cutting fragments from llm_client::prompts.

use crate::interview::models::{Difficulty, TranscriptEntry};

/// System prompt for resume parsing — enforces JSON-only output.
pub const RESUME_PARSE_SYSTEM: &str = "You are an expert recruitment assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Resume parsing prompt template. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following resume text and extract the candidate's full name, email address, and phone number.
Respond ONLY with a valid JSON object in the format: {"name": "...", "email": "...", "phone": "..."}.
If a field is not found, its value should be null. Do not include any other text, explanations, or markdown formatting.

Resume Text:
---
{resume_text}
---"#;

/// System prompt for question generation — bare question text only.
pub const QUESTION_SYSTEM: &str =
    "You are an expert interviewer hiring for a Full Stack Engineer role \
    with a focus on React and Node.js. \
    Respond ONLY with the question text itself. \
    Do not include any other text, explanations, or markdown formatting.";

/// Question generation prompt template. Replace `{difficulty}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate one, and only one, interview question with a difficulty level of "{difficulty}".
The question should be conceptual, concise, and directly related to full-stack development.
Do not label the difficulty."#;

/// System prompt for answer evaluation — enforces JSON-only output.
pub const EVALUATION_SYSTEM: &str =
    "You are an expert AI assistant evaluating an interview answer for a \
    Full Stack Engineer role. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Evaluation prompt template. Replace `{question}` and `{answer}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Question: "{question}"
Candidate's Answer: "{answer}"

Evaluate the answer based on technical accuracy, clarity, and completeness.
Provide a score from 1 to 10 and a brief, one-sentence justification for the score.
Respond ONLY with a valid JSON object in the format: {"score": number, "justification": "..."}."#;

/// System prompt for the final performance summary.
pub const SUMMARY_SYSTEM: &str = "You are an expert hiring manager for a Full Stack Engineer role. \
    Do not use markdown. Respond ONLY with the summary text.";

/// Summary prompt template. Replace `{transcript}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Based on the following interview transcript, please provide a concise, 3-4 sentence professional summary of the candidate's performance.
Highlight their potential strengths and weaknesses regarding React and Node.js.

Transcript:
---
{transcript}
---"#;

pub fn build_resume_parse_prompt(resume_text: &str) -> String {
    RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}

pub fn build_question_prompt(difficulty: Difficulty) -> String {
    QUESTION_PROMPT_TEMPLATE.replace("{difficulty}", difficulty.as_str())
}

pub fn build_evaluation_prompt(question: &str, answer: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

pub fn build_summary_prompt(transcript: &[TranscriptEntry]) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("{transcript}", &format_transcript(transcript))
}

/// Renders the transcript in the question/answer/score block format the summary
/// prompt expects. Unanswered entries render their fields as "null".
pub fn format_transcript(transcript: &[TranscriptEntry]) -> String {
    transcript
        .iter()
        .map(|entry| {
            format!(
                "Question: {}\nAnswer: {}\nScore: {}/10\nJustification: {}",
                entry.text,
                entry.answer.as_deref().unwrap_or("null"),
                entry
                    .score
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "null".to_string()),
                entry.justification.as_deref().unwrap_or("null"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_names_difficulty() {
        let prompt = build_question_prompt(Difficulty::Medium);
        assert!(prompt.contains("\"medium\""));
    }

    #[test]
    fn test_evaluation_prompt_embeds_both_sides() {
        let prompt = build_evaluation_prompt("What is JSX?", "A syntax extension.");
        assert!(prompt.contains("What is JSX?"));
        assert!(prompt.contains("A syntax extension."));
    }

    #[test]
    fn test_format_transcript_blocks() {
        let transcript = vec![
            TranscriptEntry {
                text: "Q1".to_string(),
                answer: Some("A1".to_string()),
                score: Some(8),
                justification: Some("good".to_string()),
            },
            TranscriptEntry {
                text: "Q2".to_string(),
                answer: None,
                score: None,
                justification: None,
            },
        ];
        let rendered = format_transcript(&transcript);
        assert!(rendered.contains("Question: Q1\nAnswer: A1\nScore: 8/10\nJustification: good"));
        assert!(rendered.contains("Question: Q2\nAnswer: null\nScore: null/10"));
    }
}
