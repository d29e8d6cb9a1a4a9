//! Prompt assembly: a fixed template with the creator's recent posts
//! interpolated as context.

use creatordb_core::Platform;

/// Semantic version of the prompt contract. Bump on any change to the
/// required response structure.
pub const PROMPT_VERSION: &str = "2.0";

const CONTEXT_PLACEHOLDER: &str = "{CONTEXT}";

const CREATOR_ANALYSIS_PROMPT: &str = r#"You are an expert in content analysis and personal branding. Based on the posts provided, generate a JSON document describing the creator.

## INPUT
<context>
{CONTEXT}
</context>

## METHOD
1. Thematic analysis - identify the main areas of expertise
2. Style analysis - determine the communication style and tone
3. Audience identification - based on language and content
4. Hidden-talent discovery - find a non-obvious combination of skills

## REQUIRED JSON STRUCTURE

```json
{
  "username": "handle_without_at",
  "profile_description": "300-800 word narrative",
  "competencies": [
    {
      "name": "2-4 word name",
      "icon_type": "tag_from_list",
      "description": "100-300 word description",
      "evidence": ["example 1", "example 2"]
    }
  ],
  "unique_trait": {
    "name": "2-4 word trait name",
    "description": "50-100 word concrete description",
    "market_value": "30-50 words on competitive advantage",
    "evidence": ["example 1", "example 2"]
  }
}
```

## FIELD RULES

### profile_description
- Ground every claim in at least two concrete examples from the posts
- Describe communication style, approach, and target audience
- Warm, personal, motivating tone

### competencies (exactly 3 entries)
- name: a distinctive label, not a generic job title
- icon_type: pick EXACTLY one of:
  "BrainCircuit" (technical knowledge, analytics), "TrendingUp" (growth,
  strategy, trends), "MessageSquareQuote" (communication, education),
  "Lightbulb" (innovation, ideas), "Target" (precision, goals),
  "Users" (community, relationships), "BookOpen" (knowledge, learning),
  "Zap" (energy, effectiveness), "Heart" (empathy, values),
  "Shield" (safety, trust)
- description: why this is a strength, with concrete examples
- evidence: 2-5 concrete examples drawn from the posts

### unique_trait (exactly 1 entry)
- A non-obvious combination of 2-3 skills that sets this creator apart
- name must be concrete and catchy
- market_value explains why the combination is a competitive advantage
- evidence: 2-3 concrete examples from the posts

## QUALITY RULES
- Every statement backed by a post example; no empty generalities
- Each competency must be distinct
- The unique trait must be genuinely non-obvious

Return ONLY valid JSON with no commentary."#;

/// Formats stored captions into the prompt context, newest first. The label
/// matches the platform's vocabulary.
#[must_use]
pub fn build_context(platform: Platform, captions: &[String]) -> String {
    let label = match platform {
        Platform::Instagram => "Caption",
        Platform::Linkedin => "Post",
    };
    captions
        .iter()
        .enumerate()
        .map(|(i, caption)| format!("{label} {}: \"{caption}\"", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Interpolates the context into the fixed analysis prompt.
#[must_use]
pub fn build_prompt(context: &str) -> String {
    CREATOR_ANALYSIS_PROMPT.replace(CONTEXT_PLACEHOLDER, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_numbers_posts_newest_first_with_platform_label() {
        let captions = vec!["newest".to_string(), "older".to_string()];
        let instagram = build_context(Platform::Instagram, &captions);
        assert_eq!(instagram, "Caption 1: \"newest\"\n\nCaption 2: \"older\"");

        let linkedin = build_context(Platform::Linkedin, &captions);
        assert!(linkedin.starts_with("Post 1: \"newest\""));
    }

    #[test]
    fn prompt_interpolates_context_and_keeps_contract() {
        let prompt = build_prompt("Caption 1: \"hello\"");
        assert!(prompt.contains("Caption 1: \"hello\""));
        assert!(!prompt.contains(CONTEXT_PLACEHOLDER));
        assert!(prompt.contains("exactly 3 entries"));
        assert!(prompt.contains("\"BrainCircuit\""));
    }
}
