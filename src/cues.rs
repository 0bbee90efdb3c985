//! Closed vocabulary of deception cues the oracle may tag a line with.
//!
//! Labels are case- and punctuation-exact: they are what the oracle is told to
//! emit, what exported files carry, and what cue filters match against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which half of the cue list a cue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueCategory {
    /// Word-class and tone indicators
    Foundational,
    /// Narrative structure and deception indicators
    Narrative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cue {
    Time,
    Space,
    Motion,
    IPronouns,
    PersonalPronouns,
    LongWords,
    Negations,
    FocusFuture,
    FocusPresent,
    FocusPast,
    RiskLanguage,
    CognitiveProcess,
    Sadness,
    Anger,
    Anxiety,
    NegativeEmotion,
    PositiveEmotion,
    NarrativeImbalance,
    LackOfContext,
    PassiveVoiceUsage,
    HighCognitiveLoad,
    QuestionEvasion,
    StatementAgainstInterest,
    InappropriateEmotion,
    OverlyFormal,
    Contradiction,
    VagueLanguage,
}

impl Cue {
    /// Every cue, in the order they are presented to the oracle
    pub const ALL: [Cue; 27] = [
        Cue::Time,
        Cue::Space,
        Cue::Motion,
        Cue::IPronouns,
        Cue::PersonalPronouns,
        Cue::LongWords,
        Cue::Negations,
        Cue::FocusFuture,
        Cue::FocusPresent,
        Cue::FocusPast,
        Cue::RiskLanguage,
        Cue::CognitiveProcess,
        Cue::Sadness,
        Cue::Anger,
        Cue::Anxiety,
        Cue::NegativeEmotion,
        Cue::PositiveEmotion,
        Cue::NarrativeImbalance,
        Cue::LackOfContext,
        Cue::PassiveVoiceUsage,
        Cue::HighCognitiveLoad,
        Cue::QuestionEvasion,
        Cue::StatementAgainstInterest,
        Cue::InappropriateEmotion,
        Cue::OverlyFormal,
        Cue::Contradiction,
        Cue::VagueLanguage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Time => "Time",
            Cue::Space => "Space",
            Cue::Motion => "Motion",
            Cue::IPronouns => "I-Pronouns",
            Cue::PersonalPronouns => "Personal Pronouns",
            Cue::LongWords => "Long Words (>6 letters)",
            Cue::Negations => "Negations",
            Cue::FocusFuture => "Focus: Future",
            Cue::FocusPresent => "Focus: Present",
            Cue::FocusPast => "Focus: Past",
            Cue::RiskLanguage => "Risk Language",
            Cue::CognitiveProcess => "Cognitive Process",
            Cue::Sadness => "Sadness",
            Cue::Anger => "Anger",
            Cue::Anxiety => "Anxiety",
            Cue::NegativeEmotion => "Negative Emotion",
            Cue::PositiveEmotion => "Positive Emotion",
            Cue::NarrativeImbalance => "Narrative Imbalance",
            Cue::LackOfContext => "Lack of Context",
            Cue::PassiveVoiceUsage => "Passive Voice Usage",
            Cue::HighCognitiveLoad => "High Cognitive Load",
            Cue::QuestionEvasion => "Question Evasion",
            Cue::StatementAgainstInterest => "Statement Against Interest",
            Cue::InappropriateEmotion => "Inappropriate Emotion",
            Cue::OverlyFormal => "Overly Formal",
            Cue::Contradiction => "Contradiction",
            Cue::VagueLanguage => "Vague Language",
        }
    }

    /// Short gloss used in the oracle instructions
    pub fn description(&self) -> &'static str {
        match self {
            Cue::Time => "General reference to time (e.g., \"yesterday\", \"in an hour\").",
            Cue::Space => "Mentions of places or distances.",
            Cue::Motion => "Words indicating movement (e.g., \"go\", \"move\", \"drive\").",
            Cue::IPronouns => "Over or under-use of \"I\", \"my\", \"me\".",
            Cue::PersonalPronouns => "Use of \"we\", \"you\", \"they\".",
            Cue::LongWords => "Proportion of longer, more formal words.",
            Cue::Negations => "Words like \"not\", \"no\", \"never\".",
            Cue::FocusFuture => "Statements about future events.",
            Cue::FocusPresent => "Statements about the present moment.",
            Cue::FocusPast => "Statements about past events.",
            Cue::RiskLanguage => {
                "Language expressing uncertainty (e.g., \"might\", \"risk\", \"maybe\")."
            }
            Cue::CognitiveProcess => {
                "Words about thinking (e.g., \"consider\", \"think\", \"understand\")."
            }
            Cue::Sadness => "Language expressing sadness.",
            Cue::Anger => "Language expressing anger.",
            Cue::Anxiety => "Language expressing fear or insecurity.",
            Cue::NegativeEmotion => "General negative tone.",
            Cue::PositiveEmotion => "General positive tone.",
            Cue::NarrativeImbalance => "Excessive detail in some areas, amnesia in others.",
            Cue::LackOfContext => "Story lacks a natural prologue or epilogue.",
            Cue::PassiveVoiceUsage => {
                "Using passive voice to deflect agency (e.g., \"the window was broken\")."
            }
            Cue::HighCognitiveLoad => {
                "High density of fillers ('um', 'uh'), hesitations, or stuttering."
            }
            Cue::QuestionEvasion => "Deflecting, repeating, or not directly answering questions.",
            Cue::StatementAgainstInterest => {
                "The *absence* of minor, self-critical details which adds suspicion."
            }
            Cue::InappropriateEmotion => {
                "The emotional tone does not match the described events."
            }
            Cue::OverlyFormal => "A sudden shift to overly formal or polite language.",
            Cue::Contradiction => "Statement contradicts previous information.",
            Cue::VagueLanguage => "Using non-specific words to avoid commitment.",
        }
    }

    pub fn category(&self) -> CueCategory {
        match self {
            Cue::NarrativeImbalance
            | Cue::LackOfContext
            | Cue::PassiveVoiceUsage
            | Cue::HighCognitiveLoad
            | Cue::QuestionEvasion
            | Cue::StatementAgainstInterest
            | Cue::InappropriateEmotion
            | Cue::OverlyFormal
            | Cue::Contradiction
            | Cue::VagueLanguage => CueCategory::Narrative,
            _ => CueCategory::Foundational,
        }
    }

    /// Exact-label lookup; no case folding
    pub fn parse(label: &str) -> Option<Cue> {
        Cue::ALL.iter().copied().find(|c| c.as_str() == label)
    }

    pub fn in_category(category: CueCategory) -> impl Iterator<Item = Cue> {
        Cue::ALL.into_iter().filter(move |c| c.category() == category)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cue::parse(s).ok_or_else(|| format!("unknown cue '{}'", s))
    }
}

pub fn is_known_cue(label: &str) -> bool {
    Cue::parse(label).is_some()
}
