//! @acp:module "Paper Renderer"
//! @acp:summary "Render a selection result as markdown, plain text or JSON"
//! @acp:domain paper
//! @acp:layer output

use anyhow::{anyhow, Result};
use serde::Serialize;

use super::types::*;
use crate::pool::Question;

/// Output format for papers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown output format: {}", s)),
        }
    }
}

/// Render a paper from a selection result
pub fn render_paper(
    result: &SelectionResult<'_>,
    meta: &PaperMetadata,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(result, meta),
        OutputFormat::Markdown | OutputFormat::Text => Ok(render_document(result, meta, format)),
    }
}

fn render_document(result: &SelectionResult<'_>, meta: &PaperMetadata, format: OutputFormat) -> String {
    let markdown = format == OutputFormat::Markdown;
    let mut out = String::new();

    let title = meta.title.as_deref().unwrap_or("Question Paper");
    if markdown {
        out.push_str(&format!("# {}\n\n", title));
    } else {
        out.push_str(&format!("{}\n{}\n\n", title, "=".repeat(title.chars().count())));
    }

    let mut header = Vec::new();
    if let Some(ref subject) = meta.subject {
        header.push(("Subject", subject.clone()));
    }
    header.push(("Maximum Marks", result.achieved_marks.to_string()));
    if let Some(ref duration) = meta.duration {
        header.push(("Duration", duration.clone()));
    }
    for (label, value) in header {
        if markdown {
            out.push_str(&format!("**{}:** {}  \n", label, value));
        } else {
            out.push_str(&format!("{}: {}\n", label, value));
        }
    }
    out.push('\n');

    if let Some(ref instructions) = meta.instructions {
        if markdown {
            out.push_str(&format!("> {}\n\n", instructions));
        } else {
            out.push_str(&format!("{}\n\n", instructions));
        }
    }

    let mut number = 1;
    for (idx, (marks, _)) in result.plan.iter().enumerate() {
        let items = result.items_for_tier(marks);
        if items.is_empty() {
            continue;
        }

        let heading = format!("Section {} ({} marks each)", section_letter(idx), marks);
        if markdown {
            out.push_str(&format!("## {}\n\n", heading));
        } else {
            out.push_str(&format!("{}\n{}\n\n", heading, "-".repeat(heading.len())));
        }

        let with_choice = items.iter().filter(|i| i.has_alternate()).count();
        out.push_str(&format!("Answer all {} questions.", items.len()));
        if with_choice > 0 {
            out.push_str(" Where a choice is given, answer either (a) or (b).");
        }
        out.push_str("\n\n");

        for item in items {
            match item.alternate {
                Some(alternate) => {
                    out.push_str(&format!("{}. (a) {}\n\n", number, question_line(item.primary, markdown)));
                    out.push_str(if markdown { "   **OR**\n\n" } else { "   OR\n\n" });
                    out.push_str(&format!("   (b) {}\n\n", question_line(alternate, markdown)));
                }
                None => {
                    out.push_str(&format!("{}. {}\n\n", number, question_line(item.primary, markdown)));
                }
            }
            number += 1;
        }
    }

    out.trim_end().to_string()
}

fn question_line(q: &Question, markdown: bool) -> String {
    if markdown {
        format!("{} *({})*", q.text, q.unit)
    } else {
        format!("{} [{}]", q.text, q.unit)
    }
}

fn section_letter(idx: usize) -> char {
    (b'A' + (idx % 26) as u8) as char
}

fn render_json(result: &SelectionResult<'_>, meta: &PaperMetadata) -> Result<String> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct JsonOutput<'r> {
        paper_id: String,
        generated_at: chrono::DateTime<chrono::Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<&'r str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        subject: Option<&'r str>,
        target_marks: u32,
        achieved_marks: u32,
        plan: &'r DistributionPlan,
        ideal_plan: &'r DistributionPlan,
        questions: Vec<JsonItem<'r>>,
        degradations: Vec<JsonDegradation<'r>>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct JsonItem<'r> {
        number: usize,
        marks: u32,
        primary: &'r Question,
        has_alternate: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        alternate: Option<&'r Question>,
    }

    #[derive(Serialize)]
    struct JsonDegradation<'r> {
        #[serde(flatten)]
        detail: &'r Degradation,
        message: String,
    }

    let output = JsonOutput {
        paper_id: uuid::Uuid::new_v4().to_string(),
        generated_at: chrono::Utc::now(),
        title: meta.title.as_deref(),
        subject: meta.subject.as_deref(),
        target_marks: result.target_marks,
        achieved_marks: result.achieved_marks,
        plan: &result.plan,
        ideal_plan: &result.ideal_plan,
        questions: result
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| JsonItem {
                number: idx + 1,
                marks: item.primary.marks,
                primary: item.primary,
                has_alternate: item.has_alternate(),
                alternate: item.alternate,
            })
            .collect(),
        degradations: result
            .degradations
            .iter()
            .map(|d| JsonDegradation {
                detail: d,
                message: d.to_string(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output).map_err(Into::into)
}
