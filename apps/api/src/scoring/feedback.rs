//! Human-readable explanation of a score. Report generation consumes these
//! strings unchanged, so wording is part of the output contract.

/// Everything the explanation is derived from, gathered by the scorer.
#[derive(Debug)]
pub struct MatchSummary<'a> {
    pub matching_skills: &'a [String],
    pub missing_skills: &'a [String],
    pub unmatched_optional_skills: &'a [String],
    pub experience_years: f64,
    pub min_experience_years: f64,
    pub matched_keywords: &'a [String],
    pub keyword_count: usize,
}

pub fn build_strengths(summary: &MatchSummary<'_>) -> Vec<String> {
    let mut strengths: Vec<String> = summary
        .matching_skills
        .iter()
        .map(|skill| format!("Strong in {skill}"))
        .collect();

    let years = summary.experience_years;
    let min = summary.min_experience_years;
    if min > 0.0 && years > min {
        strengths.push(format!(
            "Exceeds the {} experience minimum with {}",
            format_years(min),
            format_years(years)
        ));
    } else if min > 0.0 && years >= min {
        strengths.push(format!("Meets the {} experience minimum", format_years(min)));
    } else if min <= 0.0 && years > 0.0 {
        strengths.push(format!("Brings {} of experience", format_years(years)));
    }

    if !summary.matched_keywords.is_empty() {
        strengths.push(format!(
            "Mentions key areas: {}",
            summary.matched_keywords.join(", ")
        ));
    }

    strengths
}

pub fn build_improvements(summary: &MatchSummary<'_>) -> Vec<String> {
    let mut improvements: Vec<String> = summary
        .missing_skills
        .iter()
        .map(|skill| format!("Missing required skill: {skill}"))
        .collect();

    if !summary.unmatched_optional_skills.is_empty() {
        improvements.push(format!(
            "Could benefit from developing skills in: {}",
            summary.unmatched_optional_skills.join(", ")
        ));
    }

    if summary.experience_years < summary.min_experience_years {
        improvements.push(format!(
            "Experience of {} is below the {} minimum",
            format_years(summary.experience_years),
            format_years(summary.min_experience_years)
        ));
    }

    if summary.keyword_count > 0 && summary.matched_keywords.is_empty() {
        improvements.push("No job keywords found in resume text".to_string());
    }

    improvements
}

/// "1 year", "3 years", "2.5 years".
fn format_years(years: f64) -> String {
    let number = if years.fract() == 0.0 {
        format!("{years:.0}")
    } else {
        format!("{years:.1}")
    };
    if number == "1" {
        "1 year".to_string()
    } else {
        format!("{number} years")
    }
}
