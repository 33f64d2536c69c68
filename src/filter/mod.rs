//! Exclusion rules applied to captured regions before ordering.
//!
//! Some labeled elements are never given copy in the report: imagery,
//! breadcrumbs, call-to-action buttons, and the headline block of a hero
//! section. Matching is a case-insensitive substring test.

use serde::{Deserialize, Serialize};

use crate::ir::Region;

const IMAGERY: [&str; 9] = [
    "写真", "画像", "フォト", "photo", "image", "img", "ビジュアル", "MV", "背景",
];

const BREADCRUMB: [&str; 4] = ["パンくず", "breadcrumb", "topicpath", "pankuzu"];

const CALL_TO_ACTION: [&str; 10] = [
    "cta",
    "contact",
    "reservation",
    "button",
    "btn",
    "お問い合わせ",
    "資料請求",
    "申し込み",
    "CV",
    "action",
];

const HERO_SECTION: [&str; 2] = ["ヒーロー", "hero"];

const HERO_HEADINGS: [&str; 6] = [
    "大見出し",
    "サブタイトル",
    "タイトル",
    "見出し英語",
    "見出しEN",
    "見出し",
];

/// Keyword lists deciding which regions are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExclusionRules {
    /// Matched against the label only.
    pub imagery: Vec<String>,
    /// Matched against label and section.
    pub breadcrumb: Vec<String>,
    /// Matched against label and section.
    pub call_to_action: Vec<String>,
    /// A section containing one of these is a hero section.
    pub hero_section: Vec<String>,
    /// Matched against the label, inside hero sections only.
    pub hero_headings: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            imagery: owned(&IMAGERY),
            breadcrumb: owned(&BREADCRUMB),
            call_to_action: owned(&CALL_TO_ACTION),
            hero_section: owned(&HERO_SECTION),
            hero_headings: owned(&HERO_HEADINGS),
        }
    }
}

fn mentions(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| haystack.contains(k.to_lowercase().as_str()))
}

impl ExclusionRules {
    /// Rules that keep every region.
    pub fn none() -> Self {
        Self {
            imagery: Vec::new(),
            breadcrumb: Vec::new(),
            call_to_action: Vec::new(),
            hero_section: Vec::new(),
            hero_headings: Vec::new(),
        }
    }

    /// Returns the name of the rule that drops `region`, if any.
    pub fn matching_rule(&self, region: &Region) -> Option<&'static str> {
        let label = region.label.to_lowercase();
        let section = region.section.to_lowercase();

        if mentions(&label, &self.imagery) {
            return Some("imagery");
        }
        if mentions(&label, &self.breadcrumb) || mentions(&section, &self.breadcrumb) {
            return Some("breadcrumb");
        }
        if mentions(&label, &self.call_to_action) || mentions(&section, &self.call_to_action) {
            return Some("call-to-action");
        }
        if mentions(&section, &self.hero_section) && mentions(&label, &self.hero_headings) {
            return Some("hero heading");
        }
        None
    }

    pub fn is_excluded(&self, region: &Region) -> bool {
        self.matching_rule(region).is_some()
    }
}

/// Drops excluded regions, keeping the rest in their original order.
pub fn filter_regions(regions: Vec<Region>, rules: &ExclusionRules) -> Vec<Region> {
    let before = regions.len();
    let kept: Vec<Region> = regions
        .into_iter()
        .filter(|region| match rules.matching_rule(region) {
            Some(rule) => {
                tracing::debug!(
                    label = %region.label,
                    section = %region.section,
                    rule,
                    "excluded region"
                );
                false
            }
            None => true,
        })
        .collect();

    if kept.len() != before {
        tracing::info!(
            kept = kept.len(),
            dropped = before - kept.len(),
            "applied exclusion rules"
        );
    }
    kept
}
