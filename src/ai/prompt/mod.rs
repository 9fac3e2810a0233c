//! Prompt assembly
//!
//! `PromptBuilder` collects typed sections and renders them in insertion
//! order, so identical inputs always produce byte-identical prompts.
//!
//! ## Modules
//!
//! - `briefing`: the trip briefing prompt compiler

mod briefing;

use std::fmt::Write;

pub use briefing::{DEFAULT_STATIC_CONTEXT, compile};

/// One block of a prompt
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// `<ROLE>` block naming the model's expertise
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Header plus ordered key-value pairs
    Context {
        header: String,
        items: Vec<(String, String)>,
    },
    /// Header plus bullet list
    Bullets { header: String, items: Vec<String> },
    /// Free text under a heading
    Text { header: String, content: String },
    /// Verbatim text, no heading
    Custom(String),
}

/// Fluent builder over [`PromptSection`]s
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    /// Numbered list under `<OBJECTIVES>`
    pub fn objectives<S: Into<String>>(mut self, objectives: impl IntoIterator<Item = S>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Add a context section with ordered items
    pub fn context<K: Into<String>, V: Into<String>>(
        mut self,
        header: &str,
        items: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.sections.push(PromptSection::Context {
            header: header.to_string(),
            items: items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        });
        self
    }

    /// Bulleted list under a `# header`
    pub fn bullets<S: Into<String>>(mut self, header: &str, items: impl IntoIterator<Item = S>) -> Self {
        self.sections.push(PromptSection::Bullets {
            header: header.to_string(),
            items: items.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Text under a `# header`
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: header.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn custom(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Custom(content.to_string()));
        self
    }

    /// Render all sections, separated by blank lines
    pub fn build(self) -> String {
        let mut prompt = String::new();
        for section in &self.sections {
            section.render(&mut prompt);
            prompt.push('\n');
        }
        prompt.trim_end().to_string()
    }
}

impl PromptSection {
    // write! into a String cannot fail
    fn render(&self, out: &mut String) {
        match self {
            Self::Role { expertise, task } => {
                let _ = writeln!(
                    out,
                    "<ROLE>\nYou are an expert {expertise} specializing in {task}.\n</ROLE>"
                );
            }
            Self::Objectives(objectives) => {
                out.push_str("<OBJECTIVES>\n");
                for (n, objective) in objectives.iter().enumerate() {
                    let _ = writeln!(out, "{}. {}", n + 1, objective);
                }
                out.push_str("</OBJECTIVES>\n");
            }
            Self::Context { header, items } => {
                let _ = writeln!(out, "# {header}\n");
                for (key, value) in items {
                    let _ = writeln!(out, "**{key}**: {value}");
                }
            }
            Self::Bullets { header, items } => {
                let _ = writeln!(out, "# {header}\n");
                for item in items {
                    let _ = writeln!(out, "- {item}");
                }
            }
            Self::Text { header, content } => {
                let _ = writeln!(out, "# {header}\n\n{content}");
            }
            Self::Custom(content) => {
                let _ = writeln!(out, "{content}");
            }
        }
    }
}
