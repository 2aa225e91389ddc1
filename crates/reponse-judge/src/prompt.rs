//! Rubric prompt construction.
//!
//! Two prompts: the grading rubric for the semantic fallback tier, and
//! the short difficulty-rating prompt used by the batch reclassifier.

use reponse_core::model::Difficulty;
use reponse_core::traits::JudgeRequest;

/// System prompt for the grading judge.
pub const JUDGE_SYSTEM_PROMPT: &str = "You are a strict but encouraging French teacher grading \
a learner's typed answer. Respond ONLY with a single JSON object, no markdown, no prose outside \
the JSON.";

/// System prompt for the difficulty rater.
pub const RATER_SYSTEM_PROMPT: &str = "You classify French practice questions by difficulty. \
Respond with exactly one word: beginner, intermediate, or advanced.";

/// Build the grading rubric prompt for one evaluation.
pub fn build_judgment_prompt(request: &JudgeRequest) -> String {
    let mut prompt = String::new();
    prompt.push_str("Grade the learner's French answer.\n\n");
    prompt.push_str(&format!("Question: {}\n", request.question));
    prompt.push_str(&format!("Question type: {}\n", request.question_type));
    prompt.push_str(&format!("Difficulty: {}\n", request.difficulty));
    if let Some(reference) = &request.reference_answer {
        prompt.push_str(&format!("Reference answer: {reference}\n"));
    }
    prompt.push_str(&format!("Learner's answer: {}\n\n", request.user_answer));
    prompt.push_str(
        "Scoring guidance:\n\
         - 90-100: excellent, fully correct or a trivial slip\n\
         - 70-89: good, correct meaning with minor mistakes\n\
         - 50-69: partially correct, meaning recognizable but flawed\n\
         - 0-49: incorrect\n\n",
    );
    prompt.push_str(
        "Reply with a JSON object with exactly these fields:\n\
         {\"isCorrect\": bool, \"score\": 0-100, \"hasCorrectAccents\": bool, \
         \"feedback\": string, \"corrections\": {\"grammar\": [], \"spelling\": [], \
         \"accents\": [], \"suggestions\": []}, \"correctedAnswer\": string or null, \
         \"confidenceScore\": 0-100}\n",
    );
    prompt
}

/// Build the difficulty-rating prompt for one stored question.
pub fn build_difficulty_prompt(question: &str, reference_answer: Option<&str>) -> String {
    let mut prompt = String::new();
    prompt.push_str("Classify the difficulty of this French practice question for learners.\n\n");
    prompt.push_str(&format!("Question: {question}\n"));
    if let Some(reference) = reference_answer {
        prompt.push_str(&format!("Expected answer: {reference}\n"));
    }
    prompt.push_str(&format!(
        "\nAnswer with exactly one word: {}, {} or {}.\n",
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced
    ));
    prompt
}
