//! Instruction payload sent to the transcript oracle

use crate::cues::{Cue, CueCategory};

/// System prompt for transcript analysis
pub const FORENSIC_SYSTEM_PROMPT: &str = "You are a world-class forensic linguist. You analyze insurance claim interview transcripts by synthesizing basic linguistic cues with advanced narrative and psychological indicators. You respond with strict JSON only.";

const TASK_PREAMBLE: &str = r#"Your task is to analyze an insurance claim transcript by synthesizing basic linguistic cues with advanced narrative and psychological indicators. You will only comment on lines that contain potential deception cues.

**Analysis Instructions:**
1.  **Line-by-Line Analysis:** Process the transcript sequentially. Label every line with its speaker, either "Agent" or "Claimant".
2.  **Suspicion Score:** Assign a float from 0.0 (benign) to 1.0 (highly deceptive). A score of 0.0 means the line is completely normal.
3.  **Conditional Commenting & Tagging:**
    -   **If a line is suspicious (score > 0.0):** You MUST provide a `reason` and a list of `cues_triggered` from the Official Cue List below. The reason should explain how the cues interact.
    -   **If a line is NOT suspicious (score = 0.0):** The `reason` MUST be an empty string (`""`) and `cues_triggered` MUST be an empty list (`[]`)."#;

const OUTPUT_FORMAT: &str = r#"**Required Output Format (Strict JSON):**
{
  "analysis_summary": "<A 2-3 sentence summary of key findings, referencing the cues.>",
  "all_detected_cues": ["<List of all unique cue strings found in the transcript>"],
  "analyzed_transcript": [
    {
      "speaker": "<'Agent' or 'Claimant'>",
      "line_number": <Integer>,
      "text": "<The exact text of the line>",
      "suspicion_score": <Float>,
      "reason": "<Brief justification ONLY if score > 0.0, otherwise ''>",
      "cues_triggered": ["<List of cues from the Official Cue List ONLY if score > 0.0, otherwise []>"]
    }
  ]
}"#;

fn cue_section(title: &str, category: CueCategory) -> String {
    let mut out = format!("**{}**\n", title);
    for cue in Cue::in_category(category) {
        out.push_str(&format!("- `{}`: {}\n", cue.as_str(), cue.description()));
    }
    out
}

/// Fixed task description, cue vocabulary, output shape and scoring convention.
///
/// The output shape has no aggregate probability or
/// recommendation fields; those are computed locally.
pub fn build_forensic_instructions() -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(TASK_PREAMBLE);
    out.push_str("\n\n**Official Cue List (Use these exact strings for tagging):**\n\n");
    out.push_str(&cue_section(
        "Part 1: Foundational Linguistic Cues",
        CueCategory::Foundational,
    ));
    out.push('\n');
    out.push_str(&cue_section(
        "Part 2: Advanced Narrative & Deception Cues",
        CueCategory::Narrative,
    ));
    out.push('\n');
    out.push_str(OUTPUT_FORMAT);
    out
}

/// Instructions followed by the literal transcript between `---` fences
pub fn build_forensic_prompt(instructions: &str, transcript: &str) -> String {
    format!(
        "{}\n\n**Transcript to Analyze:**\n---\n{}\n---\n",
        instructions, transcript
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_list_every_cue_label() {
        let text = build_forensic_instructions();
        for cue in Cue::ALL {
            assert!(
                text.contains(&format!("`{}`", cue.as_str())),
                "missing cue {}",
                cue
            );
        }
    }

    #[test]
    fn instructions_state_zero_score_convention() {
        let text = build_forensic_instructions();
        assert!(text.contains("score = 0.0"));
        assert!(text.contains("MUST be an empty string"));
        assert!(text.contains("MUST be an empty list"));
    }

    #[test]
    fn instructions_do_not_request_aggregates() {
        let text = build_forensic_instructions();
        assert!(!text.contains("overall_deception_probability"));
        assert!(!text.contains("final_recommendation"));
        assert!(text.contains("\"analyzed_transcript\""));
    }

    #[test]
    fn prompt_embeds_transcript_verbatim() {
        let transcript = "Agent: What happened?\nClaimant: The window was broken.";
        let prompt = build_forensic_prompt(&build_forensic_instructions(), transcript);
        assert!(prompt.contains(&format!("---\n{}\n---", transcript)));
    }
}
