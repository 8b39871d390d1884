//! Suggested prompts offered on an empty conversation

use serde::Serialize;

/// A starter topic shown before the first message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuggestedPrompt {
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl SuggestedPrompt {
    /// Draft text placed in the input when the prompt is picked
    pub fn draft_text(&self) -> String {
        format!(
            "I need help understanding {} laws.",
            self.title.to_lowercase()
        )
    }
}

pub const SUGGESTED_PROMPTS: [SuggestedPrompt; 4] = [
    SuggestedPrompt {
        title: "Motor Accident",
        subtitle: "What sections apply?",
    },
    SuggestedPrompt {
        title: "Property Dispute",
        subtitle: "Understand your rights",
    },
    SuggestedPrompt {
        title: "Contract Breach",
        subtitle: "Legal remedies available",
    },
    SuggestedPrompt {
        title: "Consumer Rights",
        subtitle: "Defective product laws",
    },
];

pub fn get(index: usize) -> Option<&'static SuggestedPrompt> {
    SUGGESTED_PROMPTS.get(index)
}
