//! The true/fake classification assigned to a text.

use serde::{Deserialize, Serialize};

/// Outcome of classifying a text.
///
/// `Unresolved` carries the raw model output when none of the candidate
/// labels appeared in it, so callers cannot mistake it for a real label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    TrueNews,
    FakeNews,
    Unresolved(String),
}

impl Verdict {
    /// Build a resolved verdict from the boolean wire flag.
    pub fn from_flag(is_fake_news: bool) -> Self {
        if is_fake_news {
            Self::FakeNews
        } else {
            Self::TrueNews
        }
    }

    /// `Some(flag)` for a resolved verdict, `None` when unresolved.
    pub fn resolved_flag(&self) -> Option<bool> {
        match self {
            Self::TrueNews => Some(false),
            Self::FakeNews => Some(true),
            Self::Unresolved(_) => None,
        }
    }

    /// Whether the label could not be matched against the candidates.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }
}

/// The fixed two-entry candidate set presented to the classifier model.
///
/// Labels are searched in order: `true_label` first, then `fake_label`.
/// `fake_marker` is the lexical fragment that marks a label (or an
/// unresolved raw answer) as fake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    #[serde(default = "default_true_label", alias = "trueLabel")]
    pub true_label: String,

    #[serde(default = "default_fake_label", alias = "fakeLabel")]
    pub fake_label: String,

    #[serde(default = "default_fake_marker", alias = "fakeMarker")]
    pub fake_marker: String,
}

fn default_true_label() -> String {
    "notícia verdadeira".into()
}
fn default_fake_label() -> String {
    "notícia falsa".into()
}
fn default_fake_marker() -> String {
    "falsa".into()
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            true_label: default_true_label(),
            fake_label: default_fake_label(),
            fake_marker: default_fake_marker(),
        }
    }
}

impl LabelSet {
    /// Candidate labels in search order.
    pub fn candidates(&self) -> [&str; 2] {
        [self.true_label.as_str(), self.fake_label.as_str()]
    }

    /// Case-insensitive test for the fake marker.
    pub fn contains_fake_marker(&self, text: &str) -> bool {
        text.to_lowercase()
            .contains(&self.fake_marker.to_lowercase())
    }

    /// The boolean sent to the Summarizer for `verdict`.
    ///
    /// Unresolved verdicts fall back to the marker test on the raw text.
    pub fn is_fake(&self, verdict: &Verdict) -> bool {
        match verdict {
            Verdict::Unresolved(raw) => self.contains_fake_marker(raw),
            resolved => resolved.resolved_flag().unwrap_or(false),
        }
    }
}
