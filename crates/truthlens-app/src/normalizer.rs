// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a bare classifier label into the display-ready [`AnalysisResult`].
//!
//! Scores are cosmetic: the service only ever answers real or fake. Two
//! scoring policies exist and exactly one is active per normalizer.
//! In both, the risk tier is derived from the fake score, never from the
//! label directly.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use truthlens_config::model::{AnalysisConfig, ScoringPolicy};
use truthlens_core::{
    AnalysisDetails, AnalysisNarrative, AnalysisResult, InputType, Label, RiskLevel,
};

/// Characters kept in `content_preview` before the marker is appended.
pub const PREVIEW_CHARS: usize = 100;

/// Appended to previews of longer texts.
pub const PREVIEW_MARKER: char = '…';

const FIXED_FAKE_SCORE: u8 = 85;
const FIXED_REAL_SCORE: u8 = 15;
const FIXED_CONFIDENCE: u8 = 92;

const FAKE_BAND: RangeInclusive<u8> = 75..=94;
const REAL_BAND: RangeInclusive<u8> = 5..=24;
const CONFIDENCE_BAND: RangeInclusive<u8> = 85..=99;

const KEYWORDS: [&str; 4] = ["news", "report", "fact", "message"];

const RECOMMENDATIONS: [&str; 3] = [
    "Cross-check with multiple trusted sources",
    "Note when and in what context the information was published",
    "Keep thinking critically",
];

struct Template {
    source: &'static str,
    content: &'static str,
    structure: &'static str,
    language: &'static str,
}

const FAKE_TEMPLATE: Template = Template {
    source: "Source credibility is low; verify before sharing",
    content: "Content shows clear exaggeration or bias",
    structure: "Structure lacks logic and supporting evidence",
    language: "Language is noticeably emotionally charged",
};

const REAL_TEMPLATE: Template = Template {
    source: "Source has a reasonable degree of credibility",
    content: "Content is presented relatively objectively",
    structure: "Structure is complete with clear argumentation",
    language: "Language is relatively neutral and objective",
};

/// Text submitted for analysis together with its declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub input_type: InputType,
    pub text: String,
}

impl Submission {
    pub fn new(input_type: InputType, text: impl Into<String>) -> Self {
        Self {
            input_type,
            text: text.into(),
        }
    }

    pub fn url(text: impl Into<String>) -> Self {
        Self::new(InputType::Url, text)
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self::new(InputType::Content, text)
    }
}

/// Builds results from labels under one scoring policy.
pub struct Normalizer {
    policy: ScoringPolicy,
    rng: StdRng,
    classifier_name: String,
}

impl Normalizer {
    pub fn new(config: &AnalysisConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            policy: config.scoring,
            rng,
            classifier_name: config.classifier_name.clone(),
        }
    }

    /// Fixed-constant scoring (fake 85, real 15, confidence 92).
    pub fn fixed() -> Self {
        Self::new(&AnalysisConfig::default())
    }

    /// Banded scoring with a seeded RNG.
    pub fn banded(seed: u64) -> Self {
        Self::new(&AnalysisConfig {
            scoring: ScoringPolicy::Banded,
            seed: Some(seed),
            ..AnalysisConfig::default()
        })
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// `(fake_score, confidence)` for a label under the active policy.
    fn score(&mut self, label: Label) -> (u8, u8) {
        match self.policy {
            ScoringPolicy::Fixed => {
                let fake = if label.is_fake() {
                    FIXED_FAKE_SCORE
                } else {
                    FIXED_REAL_SCORE
                };
                (fake, FIXED_CONFIDENCE)
            }
            ScoringPolicy::Banded => {
                let band = if label.is_fake() { FAKE_BAND } else { REAL_BAND };
                let fake = self.rng.gen_range(band);
                let confidence = self.rng.gen_range(CONFIDENCE_BAND);
                (fake, confidence)
            }
        }
    }

    /// Build the result for one classification.
    pub fn normalize(
        &mut self,
        label: Label,
        submission: &Submission,
        id: u64,
        timestamp: DateTime<Utc>,
    ) -> AnalysisResult {
        let (fake_score, confidence) = self.score(label);
        let template = if label.is_fake() {
            &FAKE_TEMPLATE
        } else {
            &REAL_TEMPLATE
        };

        AnalysisResult {
            id,
            timestamp,
            input_type: submission.input_type,
            content_preview: content_preview(&submission.text),
            fake_score,
            real_score: 100 - fake_score,
            confidence,
            risk_level: RiskLevel::from_fake_score(fake_score),
            analysis_narrative: AnalysisNarrative {
                source: template.source.to_string(),
                content: template.content.to_string(),
                structure: template.structure.to_string(),
                language: template.language.to_string(),
            },
            recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
            details: AnalysisDetails {
                keywords: KEYWORDS.iter().map(|k| k.to_string()).collect(),
                source_analysis: format!(
                    "Verdict from the {} classifier ({label})",
                    self.classifier_name
                ),
            },
        }
    }
}

/// `text` cut to [`PREVIEW_CHARS`] characters plus [`PREVIEW_MARKER`] when longer.
pub fn content_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + PREVIEW_MARKER.len_utf8());
            preview.push_str(&text[..cut]);
            preview.push(PREVIEW_MARKER);
            preview
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_735_689_600_000).unwrap()
    }

    #[test]
    fn fixed_fake_is_high_risk() {
        let result = Normalizer::fixed().normalize(Label::Fake, &Submission::content("x"), 1, now());
        assert_eq!(result.fake_score, 85);
        assert_eq!(result.real_score, 15);
        assert_eq!(result.confidence, 92);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.analysis_narrative.source, FAKE_TEMPLATE.source);
    }

    #[test]
    fn fixed_real_is_low_risk() {
        let result = Normalizer::fixed().normalize(Label::Real, &Submission::content("x"), 1, now());
        assert_eq!(result.fake_score, 15);
        assert_eq!(result.real_score, 85);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.analysis_narrative.language, REAL_TEMPLATE.language);
    }

    #[test]
    fn details_name_classifier_and_label() {
        let result = Normalizer::fixed().normalize(Label::Fake, &Submission::content("x"), 1, now());
        assert_eq!(
            result.details.source_analysis,
            "Verdict from the RoBERTa classifier (fake)"
        );
        assert_eq!(result.details.keywords.len(), KEYWORDS.len());
        assert_eq!(result.recommendations.len(), RECOMMENDATIONS.len());
    }

    #[test]
    fn submission_fields_carry_over() {
        let result = Normalizer::fixed().normalize(
            Label::Real,
            &Submission::url("https://example.com/a"),
            42,
            now(),
        );
        assert_eq!(result.id, 42);
        assert_eq!(result.timestamp, now());
        assert_eq!(result.input_type, InputType::Url);
        assert_eq!(result.content_preview, "https://example.com/a");
    }

    #[test]
    fn same_seed_same_scores() {
        let mut a = Normalizer::banded(7);
        let mut b = Normalizer::banded(7);
        for _ in 0..20 {
            let ra = a.normalize(Label::Fake, &Submission::content("x"), 1, now());
            let rb = b.normalize(Label::Fake, &Submission::content("x"), 1, now());
            assert_eq!(ra.fake_score, rb.fake_score);
            assert_eq!(ra.confidence, rb.confidence);
        }
    }

    #[test]
    fn preview_boundaries() {
        let exact = "a".repeat(100);
        assert_eq!(content_preview(&exact), exact);

        let long = "b".repeat(101);
        let preview = content_preview(&long);
        assert_eq!(preview.chars().count(), 101);
        assert!(preview.ends_with(PREVIEW_MARKER));

        assert_eq!(content_preview(""), "");
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let text = "假".repeat(150);
        let preview = content_preview(&text);
        assert_eq!(preview.chars().count(), 101);
        assert!(preview.starts_with(&"假".repeat(100)));
    }

    proptest! {
        #[test]
        fn scores_sum_to_100_and_risk_follows_fake_score(
            fake in any::<bool>(),
            banded in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let label = if fake { Label::Fake } else { Label::Real };
            let mut normalizer = if banded { Normalizer::banded(seed) } else { Normalizer::fixed() };
            let r = normalizer.normalize(label, &Submission::content("x"), 1, now());

            prop_assert_eq!(u16::from(r.fake_score) + u16::from(r.real_score), 100);
            prop_assert_eq!(r.risk_level, RiskLevel::from_fake_score(r.fake_score));
            prop_assert!(r.confidence <= 100);
            if fake {
                prop_assert_ne!(r.risk_level, RiskLevel::Low);
            }
        }

        #[test]
        fn banded_scores_stay_in_band(fake in any::<bool>(), seed in any::<u64>()) {
            let label = if fake { Label::Fake } else { Label::Real };
            let r = Normalizer::banded(seed).normalize(label, &Submission::content("x"), 1, now());
            let band = if fake { FAKE_BAND } else { REAL_BAND };
            prop_assert!(band.contains(&r.fake_score));
            prop_assert!(CONFIDENCE_BAND.contains(&r.confidence));
        }

        #[test]
        fn preview_is_prefix_plus_marker(text in "\\PC{0,250}") {
            let preview = content_preview(&text);
            let len = text.chars().count();
            if len <= PREVIEW_CHARS {
                prop_assert_eq!(preview, text);
            } else {
                prop_assert_eq!(preview.chars().count(), PREVIEW_CHARS + 1);
                let kept: String = text.chars().take(PREVIEW_CHARS).collect();
                prop_assert_eq!(preview, format!("{kept}{PREVIEW_MARKER}"));
            }
        }
    }
}
