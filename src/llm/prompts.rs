//! Prompt templates for assistant queries

use std::collections::HashMap;

/// Template with `{{name}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template in one pass; placeholders without a value are
    /// left as is. Inserted values are never scanned for placeholders.
    #[must_use]
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some((before, name, after)) = split_placeholder(rest) {
            result.push_str(before);
            match values.get(name) {
                Some(value) => result.push_str(value),
                None => {
                    result.push_str("{{");
                    result.push_str(name);
                    result.push_str("}}");
                }
            }
            rest = after;
        }
        result.push_str(rest);
        result
    }

    /// Placeholder names in order of first appearance
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Text before the first `{{name}}`, the name, and the text after it
fn split_placeholder(text: &str) -> Option<(&str, &str, &str)> {
    let start = text.find("{{")?;
    let inner = &text[start + 2..];
    let end = inner.find("}}")?;
    Some((&text[..start], &inner[..end], &inner[end + 2..]))
}

fn extract_variables(template: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    let mut rest = template;
    while let Some((_, name, after)) = split_placeholder(rest) {
        if !name.is_empty() && !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
        rest = after;
    }
    variables
}

/// Fixed prompts used by the assistant
pub struct RagPrompts;

impl RagPrompts {
    /// Startup assistant answering from competitor reviews.
    ///
    /// Variables: `context`, `question`.
    #[must_use]
    pub fn startup_assistant() -> PromptTemplate {
        PromptTemplate::new(
            r#"You are a supportive, data-driven, and service-oriented **Startup Assistant**.
Your goal is to assist entrepreneurs in identifying market opportunities and handling customer relationships based on real data.
You are NOT a boss or a lecturer; you are a helpful partner.

You have access to real customer reviews of competitors in the market.

Context (Real Market Feedback):
{{context}}

---

User Question:
{{question}}

---

**Your Guidelines:**
1.  **Be Helpful & Humble**: Use a professional, service-oriented tone (e.g., "Here is what I found," "You might consider...").
2.  **Market Identification**: If asked about opportunities, analyze the "Pain Points" (complaints) and "Highlights" (praises) in the Context. Compare the User Rating vs. the Weighted Score.
3.  **Customer Conversation**: If asked to draft a reply, draft a polite and professional response based on the specific review in the Context.
4.  **Language**: **ALWAYS ANSWER IN ENGLISH.**
5.  **Format**: Use Markdown (bullet points, bold text) for better readability.

Answer:"#,
        )
    }

    /// Render the startup assistant prompt
    #[must_use]
    pub fn render_startup_assistant(context: &str, question: &str) -> String {
        let mut values = HashMap::new();
        values.insert("context".to_string(), context.to_string());
        values.insert("question".to_string(), question.to_string());
        Self::startup_assistant().render(&values)
    }
}
