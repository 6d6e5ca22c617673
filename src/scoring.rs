use crate::models::{Category, Impact, Issue, ScoreMap, TopFix};
use std::cmp::Reverse;
use std::collections::HashMap;

pub const MAX_TOP_FIXES: usize = 5;
const BASE_SCORE: f64 = 100.0;

/// Applies every issue's penalty to each of its categories, then blends the
/// categories into the overall score and picks the top fixes.
///
/// Penalties are not split: an issue in two categories costs both the full
/// amount. Category scores never drop below zero.
pub fn compute_scores(issues: &[Issue]) -> (ScoreMap, Vec<TopFix>) {
    let mut raw: HashMap<Category, f64> = Category::ALL
        .iter()
        .map(|category| (*category, BASE_SCORE))
        .collect();

    for issue in issues {
        for category in issue.categories {
            if let Some(score) = raw.get_mut(category) {
                *score = (*score - f64::from(issue.penalty)).max(0.0);
            }
        }
    }

    let score = |category: Category| raw.get(&category).copied().unwrap_or(BASE_SCORE);
    let overall = weighted_overall(score);

    let scores = ScoreMap {
        technical: clamp_score(score(Category::Technical)),
        content_tags: clamp_score(score(Category::ContentTags)),
        performance: clamp_score(score(Category::Performance)),
        mobile: clamp_score(score(Category::Mobile)),
        navigability: clamp_score(score(Category::Navigability)),
        social: clamp_score(score(Category::Social)),
        overall: clamp_score(overall),
    };

    (scores, top_fixes(issues))
}

/// Fixed-weight blend of the six category scores, before rounding.
pub fn weighted_overall(score: impl Fn(Category) -> f64) -> f64 {
    Category::ALL
        .iter()
        .map(|category| score(*category) * category.weight())
        .sum()
}

/// Rounds to the nearest integer and clamps into [0, 100].
fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn impact_rank(impact: Impact) -> u8 {
    match impact {
        Impact::High => 0,
        Impact::Medium => 1,
        Impact::Low => 2,
    }
}

/// Highest impact first, then the larger penalty. Ties keep catalogue order.
pub fn top_fixes(issues: &[Issue]) -> Vec<TopFix> {
    let mut sorted: Vec<&Issue> = issues.iter().collect();
    sorted.sort_by_key(|issue| (impact_rank(issue.impact), Reverse(issue.penalty)));
    sorted
        .into_iter()
        .take(MAX_TOP_FIXES)
        .map(TopFix::from)
        .collect()
}
