//! Grade-point average calculators over a configurable grade scale.

use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{validate_finite, validate_non_negative, validate_positive, validate_range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub letter: String,
    /// Lowest percentage score that earns this grade.
    pub min_score: f64,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    pub name: String,
    pub grades: Vec<Grade>,
}

fn grade(letter: &str, min_score: f64, points: f64) -> Grade {
    Grade {
        letter: letter.to_string(),
        min_score,
        points,
    }
}

impl GradeScale {
    pub fn us_standard() -> Self {
        Self {
            name: "US Standard".to_string(),
            grades: vec![
                grade("A+", 97.0, 4.0),
                grade("A", 93.0, 4.0),
                grade("A-", 90.0, 3.7),
                grade("B+", 87.0, 3.3),
                grade("B", 83.0, 3.0),
                grade("B-", 80.0, 2.7),
                grade("C+", 77.0, 2.3),
                grade("C", 73.0, 2.0),
                grade("C-", 70.0, 1.7),
                grade("D+", 67.0, 1.3),
                grade("D", 63.0, 1.0),
                grade("F", 0.0, 0.0),
            ],
        }
    }

    pub fn uk_standard() -> Self {
        Self {
            name: "UK Standard".to_string(),
            grades: vec![
                grade("First", 70.0, 4.0),
                grade("2:1", 60.0, 3.5),
                grade("2:2", 50.0, 3.0),
                grade("Third", 40.0, 2.0),
                grade("Fail", 0.0, 0.0),
            ],
        }
    }

    /// Looks up a built-in scale by short name (`us`, `uk`).
    pub fn builtin(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "us" | "us standard" => Some(Self::us_standard()),
            "uk" | "uk standard" => Some(Self::uk_standard()),
            _ => None,
        }
    }

    pub fn points_for(&self, letter: &str) -> Result<f64> {
        let wanted = letter.trim();
        self.grades
            .iter()
            .find(|g| g.letter.eq_ignore_ascii_case(wanted))
            .map(|g| g.points)
            .ok_or_else(|| CalcError::parse("grade", letter))
    }

    pub fn letter_for_score(&self, score: f64) -> Option<&str> {
        self.grades
            .iter()
            .filter(|g| score >= g.min_score)
            .max_by(|a, b| a.min_score.total_cmp(&b.min_score))
            .map(|g| g.letter.as_str())
    }

    pub fn max_points(&self) -> f64 {
        self.grades
            .iter()
            .map(|g| g.points)
            .fold(0.0, f64::max)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grades.is_empty() {
            return Err(CalcError::ConfigValidationError {
                field: "gpa.grades".to_string(),
                message: format!("grade scale '{}' has no grades", self.name),
            });
        }
        for g in &self.grades {
            if g.letter.trim().is_empty() || !g.points.is_finite() || g.points < 0.0 {
                return Err(CalcError::InvalidConfigValueError {
                    field: "gpa.grades".to_string(),
                    value: g.letter.clone(),
                    reason: "grades need a letter and non-negative points".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::us_standard()
    }
}

/// Category assigned to courses that were entered without one.
pub const DEFAULT_CATEGORY: &str = "General";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub credits: f64,
    pub grade: String,
    #[serde(default = "default_category")]
    pub category: String,
}

impl Course {
    pub fn new(name: impl Into<String>, credits: f64, grade: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credits,
            grade: grade.into(),
            category: default_category(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermGpa {
    pub courses: Vec<Course>,
    pub total_credits: f64,
    pub gpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeGpaRequest {
    pub current_gpa: f64,
    pub completed_credits: f64,
    pub new_credits: f64,
    pub new_grade: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeGpa {
    pub current_gpa: f64,
    pub completed_credits: f64,
    pub new_credits: f64,
    pub new_grade: String,
    pub gpa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetGpaRequest {
    pub current_gpa: f64,
    pub target_gpa: f64,
    pub completed_credits: f64,
    pub remaining_credits: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetGpa {
    pub current_gpa: f64,
    pub target_gpa: f64,
    pub completed_credits: f64,
    pub remaining_credits: f64,
    pub required_gpa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpaPredictionRequest {
    pub current_gpa: f64,
    pub target_gpa: f64,
    pub remaining_semesters: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpaPrediction {
    pub current_gpa: f64,
    pub target_gpa: f64,
    pub semester_gpas: Vec<f64>,
}

impl GpaPrediction {
    pub fn final_gpa(&self) -> f64 {
        self.semester_gpas
            .last()
            .copied()
            .unwrap_or(self.current_gpa)
    }
}

/// Credit-weighted GPA for one term.
pub fn term_gpa(courses: &[Course], scale: &GradeScale) -> Result<TermGpa> {
    if courses.is_empty() {
        return Err(CalcError::domain("term GPA needs at least one course"));
    }

    let mut total_points = 0.0;
    let mut total_credits = 0.0;
    for course in courses {
        if course.name.trim().is_empty() {
            return Err(CalcError::parse("course name", &course.name));
        }
        let credits = validate_positive(&format!("credits for {}", course.name), course.credits)?;
        let points = scale.points_for(&course.grade)?;
        total_points += points * credits;
        total_credits += credits;
    }

    Ok(TermGpa {
        courses: courses.to_vec(),
        total_credits,
        gpa: total_points / total_credits,
    })
}

pub fn cumulative_gpa(request: &CumulativeGpaRequest, scale: &GradeScale) -> Result<CumulativeGpa> {
    let max = scale.max_points();
    let current = validate_range("current GPA", request.current_gpa, 0.0, max)?;
    let completed = validate_non_negative("completed credits", request.completed_credits)?;
    let new_credits = validate_positive("new course credits", request.new_credits)?;
    let points = scale.points_for(&request.new_grade)?;

    let gpa = (current * completed + points * new_credits) / (completed + new_credits);
    Ok(CumulativeGpa {
        current_gpa: current,
        completed_credits: completed,
        new_credits,
        new_grade: request.new_grade.trim().to_string(),
        gpa,
    })
}

/// GPA needed over the remaining credits to finish at the target.
pub fn target_gpa(request: &TargetGpaRequest, scale: &GradeScale) -> Result<TargetGpa> {
    let max = scale.max_points();
    let current = validate_range("current GPA", request.current_gpa, 0.0, max)?;
    let target = validate_range("target GPA", request.target_gpa, 0.0, max)?;
    let completed = validate_non_negative("completed credits", request.completed_credits)?;
    let remaining = validate_positive("remaining credits", request.remaining_credits)?;

    let required = (target * (completed + remaining) - current * completed) / remaining;
    if required > max {
        return Err(CalcError::range(format!(
            "required GPA {:.2} exceeds the maximum of {:.1}; consider adjusting the target",
            required, max
        )));
    }
    if required < 0.0 {
        return Err(CalcError::range(
            "target already achieved: current GPA is above the target",
        ));
    }

    Ok(TargetGpa {
        current_gpa: current,
        target_gpa: target,
        completed_credits: completed,
        remaining_credits: remaining,
        required_gpa: required,
    })
}

/// Straight-line path from the current GPA to the target.
pub fn predict(request: &GpaPredictionRequest) -> Result<GpaPrediction> {
    let current = validate_finite("current GPA", request.current_gpa)?;
    let target = validate_finite("target GPA", request.target_gpa)?;
    if request.remaining_semesters == 0 {
        return Err(CalcError::domain("remaining semesters must be at least 1"));
    }

    let step = (target - current) / f64::from(request.remaining_semesters);
    let semester_gpas = (1..=request.remaining_semesters)
        .map(|i| current + step * f64::from(i))
        .collect();

    Ok(GpaPrediction {
        current_gpa: current,
        target_gpa: target,
        semester_gpas,
    })
}

/// One named semester of courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPerformance {
    pub name: String,
    pub gpa: f64,
    pub credits: f64,
    pub course_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub average_gpa: f64,
    pub course_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    pub terms: Vec<TermPerformance>,
    /// In order of first appearance.
    pub categories: Vec<CategoryPerformance>,
}

impl PerformanceAnalysis {
    /// Unweighted mean of the term GPAs.
    pub fn average_gpa(&self) -> f64 {
        if self.terms.is_empty() {
            return 0.0;
        }
        self.terms.iter().map(|t| t.gpa).sum::<f64>() / self.terms.len() as f64
    }

    pub fn total_courses(&self) -> usize {
        self.terms.iter().map(|t| t.course_count).sum()
    }
}

/// Term-by-term GPA plus the average grade points of each course category.
///
/// Category averages count every course once, regardless of credits.
pub fn performance_analysis(terms: &[Term], scale: &GradeScale) -> Result<PerformanceAnalysis> {
    if terms.is_empty() {
        return Err(CalcError::domain("performance analysis needs at least one term"));
    }

    let mut summaries = Vec::with_capacity(terms.len());
    let mut totals: Vec<(String, f64, usize)> = Vec::new();

    for term in terms {
        if term.name.trim().is_empty() {
            return Err(CalcError::parse("term name", &term.name));
        }
        let result = term_gpa(&term.courses, scale)
            .map_err(|e| CalcError::domain(format!("{}: {}", term.name.trim(), e)))?;

        for course in &term.courses {
            let category = match course.category.trim() {
                "" => DEFAULT_CATEGORY,
                category => category,
            };
            let points = scale.points_for(&course.grade)?;
            match totals.iter_mut().find(|(name, _, _)| name == category) {
                Some((_, sum, count)) => {
                    *sum += points;
                    *count += 1;
                }
                None => totals.push((category.to_string(), points, 1)),
            }
        }

        summaries.push(TermPerformance {
            name: term.name.trim().to_string(),
            gpa: result.gpa,
            credits: result.total_credits,
            course_count: term.courses.len(),
        });
    }

    tracing::debug!(
        "analyzed {} terms across {} categories",
        summaries.len(),
        totals.len()
    );

    Ok(PerformanceAnalysis {
        terms: summaries,
        categories: totals
            .into_iter()
            .map(|(category, sum, count)| CategoryPerformance {
                category,
                average_gpa: sum / count as f64,
                course_count: count,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, credits: f64, grade: &str) -> Course {
        Course::new(name, credits, grade)
    }

    #[test]
    fn test_term_gpa_weighted_by_credits() {
        let scale = GradeScale::us_standard();
        let result = term_gpa(
            &[course("Algebra", 4.0, "A"), course("History", 2.0, "C")],
            &scale,
        )
        .unwrap();
        assert_eq!(result.total_credits, 6.0);
        assert!((result.gpa - 20.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_term_gpa_rejects_unknown_grade() {
        let scale = GradeScale::us_standard();
        let err = term_gpa(&[course("Art", 3.0, "Z")], &scale).unwrap_err();
        assert!(matches!(err, CalcError::ParseError { .. }));
    }

    #[test]
    fn test_term_gpa_rejects_empty_and_zero_credit() {
        let scale = GradeScale::us_standard();
        assert!(term_gpa(&[], &scale).is_err());
        assert!(term_gpa(&[course("Art", 0.0, "A")], &scale).is_err());
    }

    #[test]
    fn test_cumulative_gpa() {
        let scale = GradeScale::us_standard();
        let result = cumulative_gpa(
            &CumulativeGpaRequest {
                current_gpa: 3.0,
                completed_credits: 30.0,
                new_credits: 10.0,
                new_grade: "A".to_string(),
            },
            &scale,
        )
        .unwrap();
        assert_eq!(result.gpa, 3.25);
    }

    #[test]
    fn test_target_gpa() {
        let scale = GradeScale::us_standard();
        let result = target_gpa(
            &TargetGpaRequest {
                current_gpa: 3.0,
                target_gpa: 3.5,
                completed_credits: 60.0,
                remaining_credits: 60.0,
            },
            &scale,
        )
        .unwrap();
        assert_eq!(result.required_gpa, 4.0);
    }

    #[test]
    fn test_target_gpa_above_scale_is_range_error() {
        let scale = GradeScale::us_standard();
        let err = target_gpa(
            &TargetGpaRequest {
                current_gpa: 2.0,
                target_gpa: 3.9,
                completed_credits: 90.0,
                remaining_credits: 30.0,
            },
            &scale,
        )
        .unwrap_err();
        assert!(matches!(err, CalcError::RangeError { .. }));
    }

    #[test]
    fn test_target_already_achieved() {
        let scale = GradeScale::us_standard();
        let err = target_gpa(
            &TargetGpaRequest {
                current_gpa: 3.9,
                target_gpa: 3.0,
                completed_credits: 90.0,
                remaining_credits: 10.0,
            },
            &scale,
        )
        .unwrap_err();
        assert!(err.to_string().contains("already achieved"));
    }

    #[test]
    fn test_prediction_is_linear() {
        let prediction = predict(&GpaPredictionRequest {
            current_gpa: 3.0,
            target_gpa: 3.4,
            remaining_semesters: 4,
        })
        .unwrap();
        assert_eq!(prediction.semester_gpas.len(), 4);
        assert!((prediction.semester_gpas[0] - 3.1).abs() < 1e-12);
        assert!((prediction.final_gpa() - 3.4).abs() < 1e-12);
    }

    #[test]
    fn test_scale_lookups() {
        let us = GradeScale::us_standard();
        assert_eq!(us.points_for("b+").unwrap(), 3.3);
        assert_eq!(us.letter_for_score(91.0), Some("A-"));
        assert_eq!(us.letter_for_score(12.0), Some("F"));
        assert_eq!(us.max_points(), 4.0);

        let uk = GradeScale::builtin("uk").unwrap();
        assert_eq!(uk.letter_for_score(65.0), Some("2:1"));
        assert!(GradeScale::builtin("mars").is_none());
    }

    #[test]
    fn test_performance_analysis_by_term_and_category() {
        let scale = GradeScale::us_standard();
        let terms = [
            Term {
                name: "Fall 2023".to_string(),
                courses: vec![
                    course("Algebra", 4.0, "A").with_category("Math"),
                    course("Poetry", 2.0, "C").with_category("Humanities"),
                ],
            },
            Term {
                name: "Spring 2024".to_string(),
                courses: vec![
                    course("Calculus", 3.0, "B").with_category("Math"),
                    course("Chemistry", 3.0, "B+"),
                ],
            },
        ];

        let analysis = performance_analysis(&terms, &scale).unwrap();
        assert_eq!(analysis.terms.len(), 2);
        assert_eq!(analysis.terms[0].name, "Fall 2023");
        assert!((analysis.terms[0].gpa - 20.0 / 6.0).abs() < 1e-12);
        assert!((analysis.terms[1].gpa - 3.15).abs() < 1e-12);
        assert_eq!(analysis.total_courses(), 4);

        let categories: Vec<(&str, f64)> = analysis
            .categories
            .iter()
            .map(|c| (c.category.as_str(), c.average_gpa))
            .collect();
        assert_eq!(
            categories,
            vec![("Math", 3.5), ("Humanities", 2.0), ("General", 3.3)]
        );
    }

    #[test]
    fn test_performance_analysis_names_failing_term() {
        let scale = GradeScale::us_standard();
        assert!(performance_analysis(&[], &scale).is_err());

        let err = performance_analysis(
            &[Term {
                name: "Summer".to_string(),
                courses: vec![course("Art", 3.0, "Z")],
            }],
            &scale,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Summer"));
    }

    #[test]
    fn test_course_category_defaults_when_missing() {
        let json = r#"{ "name": "Algebra", "credits": 3, "grade": "A" }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.category, DEFAULT_CATEGORY);
    }
}
