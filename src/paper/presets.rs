//! @acp:module "Planning Presets"
//! @acp:summary "Named band tables for common exam shapes"
//! @acp:domain paper
//! @acp:layer logic

use super::types::*;

/// Get band rules for a named preset
pub fn get_preset_bands(preset: &str) -> Vec<BandRule> {
    match preset {
        "short-answer" => vec![
            BandRule {
                max_target: Some(100),
                strategy: BandStrategy::ShortAnswerFirst { max_count: 30 },
            },
            BandRule {
                max_target: None,
                strategy: BandStrategy::LongAnswerRatio {
                    marks_per_question: 24,
                    max_count: 4,
                },
            },
        ],
        "long-answer" => vec![BandRule {
            max_target: None,
            strategy: BandStrategy::LongAnswerRatio {
                marks_per_question: 16,
                max_count: 10,
            },
        }],
        "balanced" => default_bands(),
        other => {
            tracing::warn!("Unknown preset {:?}; using balanced", other);
            default_bands()
        }
    }
}

/// Get list of available presets with their descriptions
pub fn list_presets() -> Vec<(&'static str, &'static str, Vec<BandRule>)> {
    vec![
        (
            "balanced",
            "Short answers for small papers, more long answers as totals grow",
            get_preset_bands("balanced"),
        ),
        (
            "short-answer",
            "Favors short-answer questions up to 100 marks",
            get_preset_bands("short-answer"),
        ),
        (
            "long-answer",
            "Favors long-answer questions at every total",
            get_preset_bands("long-answer"),
        ),
    ]
}

/// One-line description of a band rule for listings
pub fn describe_band(rule: &BandRule) -> String {
    let range = match rule.max_target {
        Some(max) => format!("<= {}", max),
        None => "any".to_string(),
    };
    let strategy = match rule.strategy {
        BandStrategy::ShortAnswerFirst { max_count } => {
            format!("short answers first (max {})", max_count)
        }
        BandStrategy::LongAnswerRatio {
            marks_per_question,
            max_count,
        } => format!(
            "1 long answer per {} marks (max {})",
            marks_per_question, max_count
        ),
    };
    format!("{:>6} marks: {}", range, strategy)
}
