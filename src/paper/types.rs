//! @acp:module "Paper Types"
//! @acp:summary "Selection criteria, distribution plans, results and policy configuration"
//! @acp:domain paper
//! @acp:layer types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{QpError, Result};
use crate::pool::Question;

// ============================================================================
// Criteria
// ============================================================================

/// What the caller asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCriteria {
    pub units: BTreeSet<String>,

    pub target_marks: u32,

    /// Explicit per-tier counts (marks -> count), bypassing the band heuristic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<BTreeMap<u32, usize>>,
}

impl SelectionCriteria {
    pub fn new<I, S>(units: I, target_marks: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            units: units.into_iter().map(Into::into).collect(),
            target_marks,
            distribution: None,
        }
    }

    pub fn with_distribution(mut self, distribution: BTreeMap<u32, usize>) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.units.is_empty() {
            return Err(QpError::NoUnitsSelected);
        }
        if self.target_marks == 0 {
            return Err(QpError::InvalidCriteria(
                "target marks must be positive".to_string(),
            ));
        }
        if let Some(ref counts) = self.distribution {
            if counts.keys().any(|&marks| marks == 0) {
                return Err(QpError::InvalidCriteria(
                    "distribution contains a zero-mark tier".to_string(),
                ));
            }
            let explicit = DistributionPlan::from_counts(counts.clone());
            if explicit.total_marks() > self.target_marks {
                return Err(QpError::InvalidCriteria(format!(
                    "distribution totals {} marks, above the target of {}",
                    explicit.total_marks(),
                    self.target_marks
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Distribution plan
// ============================================================================

/// Count of questions to draw per mark tier. Zero counts are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionPlan {
    counts: BTreeMap<u32, usize>,
}

impl DistributionPlan {
    pub fn from_counts(counts: BTreeMap<u32, usize>) -> Self {
        let mut plan = Self::default();
        for (marks, count) in counts {
            plan.set(marks, count);
        }
        plan
    }

    pub fn count(&self, marks: u32) -> usize {
        self.counts.get(&marks).copied().unwrap_or(0)
    }

    pub fn set(&mut self, marks: u32, count: usize) {
        if count == 0 {
            self.counts.remove(&marks);
        } else {
            self.counts.insert(marks, count);
        }
    }

    pub fn add(&mut self, marks: u32, count: usize) {
        let current = self.count(marks);
        self.set(marks, current + count);
    }

    /// Tiers ascending by mark value
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.counts.iter().map(|(&m, &c)| (m, c))
    }

    pub fn total_marks(&self) -> u32 {
        self.counts.iter().fold(0u32, |acc, (&marks, &count)| {
            let count = u32::try_from(count).unwrap_or(u32::MAX);
            acc.saturating_add(marks.saturating_mul(count))
        })
    }

    pub fn total_questions(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl fmt::Display for DistributionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return write!(f, "(empty)");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(marks, count)| format!("{} x {} marks", count, marks))
            .collect();
        write!(f, "{} = {} marks", parts.join(" + "), self.total_marks())
    }
}

// ============================================================================
// Result
// ============================================================================

/// A primary question and its optional either/or alternate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem<'a> {
    pub primary: &'a Question,
    pub alternate: Option<&'a Question>,
}

impl<'a> SelectedItem<'a> {
    pub fn has_alternate(&self) -> bool {
        self.alternate.is_some()
    }
}

/// Shortfalls recovered by policy rather than reported as errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Degradation {
    /// Fewer questions of a tier than the ideal plan wanted
    #[serde(rename_all = "camelCase")]
    TierShortfall {
        marks: u32,
        planned: usize,
        realized: usize,
    },
    /// Alternate came from a different unit than its primary
    #[serde(rename_all = "camelCase")]
    CrossUnitAlternate {
        question_id: String,
        alternate_id: String,
    },
    /// No alternate left for a choice-eligible primary
    #[serde(rename_all = "camelCase")]
    NoAlternate { question_id: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::TierShortfall {
                marks,
                planned,
                realized,
            } => write!(
                f,
                "only {} of {} planned {}-mark questions were available",
                realized, planned, marks
            ),
            Degradation::CrossUnitAlternate {
                question_id,
                alternate_id,
            } => write!(
                f,
                "could not find a same-unit choice for question {}; using {} from another unit",
                question_id, alternate_id
            ),
            Degradation::NoAlternate { question_id } => {
                write!(f, "no choice available for question {}", question_id)
            }
        }
    }
}

/// Outcome of one engine invocation. Never mutated after assembly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult<'a> {
    /// Primaries grouped by tier, low before high
    pub items: Vec<SelectedItem<'a>>,
    pub achieved_marks: u32,
    pub target_marks: u32,
    /// Plan actually realized
    pub plan: DistributionPlan,
    /// Plan before capacity caps
    pub ideal_plan: DistributionPlan,
    pub degradations: Vec<Degradation>,
}

impl<'a> SelectionResult<'a> {
    pub fn primaries(&self) -> impl Iterator<Item = &'a Question> + '_ {
        self.items.iter().map(|item| item.primary)
    }

    pub fn alternates(&self) -> impl Iterator<Item = &'a Question> + '_ {
        self.items.iter().filter_map(|item| item.alternate)
    }

    /// Every id used, primaries and alternates
    pub fn used_ids(&self) -> Vec<&'a str> {
        self.primaries()
            .chain(self.alternates())
            .map(|q| q.id.as_str())
            .collect()
    }

    /// Items of one tier, in presentation order
    pub fn items_for_tier(&self, marks: u32) -> Vec<&SelectedItem<'a>> {
        self.items
            .iter()
            .filter(|item| item.primary.marks == marks)
            .collect()
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

// ============================================================================
// Policy configuration
// ============================================================================

/// Complete paper configuration (policy + presentation)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperConfig {
    #[serde(default)]
    pub planning: PlanningPolicy,

    #[serde(default)]
    pub choice: ChoicePolicy,

    #[serde(default)]
    pub paper: PaperMetadata,
}

/// Mark-distribution policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningPolicy {
    /// Evaluated top-down, first match wins
    #[serde(default = "default_bands")]
    pub bands: Vec<BandRule>,

    /// Top up any remaining deficit from spare capacity
    #[serde(default = "default_true")]
    pub fill_to_target: bool,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            fill_to_target: true,
        }
    }
}

impl PlanningPolicy {
    /// Band rule governing a target. Falls back to the last rule when nothing matches.
    pub fn rule_for(&self, target_marks: u32) -> Option<&BandRule> {
        self.bands
            .iter()
            .find(|rule| rule.max_target.map_or(true, |max| target_marks <= max))
            .or_else(|| self.bands.last())
    }
}

/// One row of the band table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandRule {
    /// Inclusive upper bound; `None` matches every target
    #[serde(default)]
    pub max_target: Option<u32>,

    pub strategy: BandStrategy,
}

/// How a band splits marks between tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BandStrategy {
    /// Lowest tier first (up to `max_count`), remainder to higher tiers
    #[serde(rename_all = "camelCase")]
    ShortAnswerFirst { max_count: usize },

    /// Roughly one highest-tier question per `marks_per_question`, remainder to the lowest tier
    #[serde(rename_all = "camelCase")]
    LongAnswerRatio {
        marks_per_question: u32,
        max_count: usize,
    },
}

pub(crate) fn default_bands() -> Vec<BandRule> {
    vec![
        BandRule {
            max_target: Some(50),
            strategy: BandStrategy::ShortAnswerFirst { max_count: 20 },
        },
        BandRule {
            max_target: Some(100),
            strategy: BandStrategy::LongAnswerRatio {
                marks_per_question: 20,
                max_count: 4,
            },
        },
        BandRule {
            max_target: None,
            strategy: BandStrategy::LongAnswerRatio {
                marks_per_question: 16,
                max_count: 6,
            },
        },
    ]
}

fn default_true() -> bool {
    true
}

/// Which primaries receive an either/or alternate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicePolicy {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub tiers: ChoiceTiers,

    /// Look for an alternate in the primary's unit before any unit
    #[serde(default = "default_true")]
    pub prefer_same_unit: bool,
}

impl Default for ChoicePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            tiers: ChoiceTiers::default(),
            prefer_same_unit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceTiers {
    /// The highest tier present in the filtered pool
    #[default]
    Highest,
    /// Every tier worth at least this many marks
    AtLeast(u32),
    /// Exactly these tiers
    Only(Vec<u32>),
}

impl ChoiceTiers {
    pub fn is_eligible(&self, marks: u32, highest_tier: u32) -> bool {
        match self {
            ChoiceTiers::Highest => marks == highest_tier,
            ChoiceTiers::AtLeast(min) => marks >= *min,
            ChoiceTiers::Only(tiers) => tiers.contains(&marks),
        }
    }
}

/// Presentation details carried through to the renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}
