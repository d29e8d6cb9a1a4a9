//! The structured analysis schema the completion provider must satisfy.
//!
//! Decoding fails closed: an icon tag outside the closed set, or a missing
//! field, is a deserialization error, never a silently coerced value.

use serde::{Deserialize, Serialize};

/// Closed set of icon-category tags a competency may carry. The serialized
/// form is the exact variant name (`"BrainCircuit"`, `"TrendingUp"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconType {
    BrainCircuit,
    TrendingUp,
    MessageSquareQuote,
    Lightbulb,
    Target,
    Users,
    BookOpen,
    Zap,
    Heart,
    Shield,
}

/// One competency/strength entry. A valid analysis has exactly three.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competency {
    pub name: String,
    pub icon_type: IconType,
    pub description: String,
    pub evidence: Vec<String>,
}

/// The single "unique trait / niche" entry of an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueTrait {
    pub name: String,
    pub description: String,
    pub market_value: String,
    pub evidence: Vec<String>,
}

/// A full creator analysis as produced by the completion provider and
/// persisted as the cached payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorAnalysis {
    pub username: String,
    pub profile_description: String,
    pub competencies: Vec<Competency>,
    pub unique_trait: UniqueTrait,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_type_serializes_as_exact_tag() {
        assert_eq!(
            serde_json::to_string(&IconType::MessageSquareQuote).unwrap(),
            "\"MessageSquareQuote\""
        );
    }

    #[test]
    fn unknown_icon_tag_fails_closed() {
        let result = serde_json::from_str::<IconType>("\"Sparkles\"");
        assert!(result.is_err());
    }

    #[test]
    fn analysis_round_trips() {
        let json = serde_json::json!({
            "username": "jdoe",
            "profile_description": "Analysis text",
            "competencies": [
                {
                    "name": "Algorithm Translator",
                    "icon_type": "BrainCircuit",
                    "description": "Explains complex systems simply",
                    "evidence": ["post about ranking systems"]
                }
            ],
            "unique_trait": {
                "name": "Marketing Psychologist",
                "description": "Combines sales strategy with consumer psychology",
                "market_value": "Campaigns that actually convert",
                "evidence": ["color psychology post"]
            }
        });
        let analysis: CreatorAnalysis = serde_json::from_value(json).unwrap();
        assert_eq!(analysis.competencies[0].icon_type, IconType::BrainCircuit);
        assert_eq!(analysis.unique_trait.name, "Marketing Psychologist");
    }
}
