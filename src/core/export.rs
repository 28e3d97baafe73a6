//! Plain-text summaries of a single calculation, one template per type.

use crate::core::percentage::ChangeOperation;
use crate::domain::model::Calculation;
use crate::utils::error::Result;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub fn export_filename(calculation: &Calculation) -> &'static str {
    match calculation {
        Calculation::Simple(_) => "percentage-calculation.txt",
        Calculation::Change(_) => "percentage-change.txt",
        Calculation::Convert(_) => "format-conversion.txt",
        Calculation::Statistics(_) => "statistical-analysis.txt",
        Calculation::Discount(_) => "discount-calculation.txt",
        Calculation::Tax(_) => "tax-calculation.txt",
        Calculation::Roi(_) => "roi-calculation.txt",
        Calculation::AnnualizedRoi(_) => "annualized-roi.txt",
        Calculation::RoiComparison(_) => "roi-comparison.txt",
        Calculation::TermGpa(_) => "term-gpa.txt",
        Calculation::CumulativeGpa(_) => "cumulative-gpa.txt",
        Calculation::TargetGpa(_) => "target-gpa.txt",
        Calculation::GpaPrediction(_) => "gpa-prediction.txt",
        Calculation::PerformanceAnalysis(_) => "academic-performance.txt",
        Calculation::BodyFat(_) => "body-fat-calculation.txt",
    }
}

pub fn export_text(calculation: &Calculation) -> String {
    ExportSummary(calculation).to_string()
}

/// Renders the export template of the wrapped calculation.
struct ExportSummary<'a>(&'a Calculation);

impl fmt::Display for ExportSummary<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(out, self.0)
    }
}

fn write_summary(out: &mut fmt::Formatter<'_>, calculation: &Calculation) -> fmt::Result {
    match calculation {
        Calculation::Simple(r) => {
            writeln!(out, "Percentage Calculation")?;
            writeln!(out, "Type: {}", r.operation.label())?;
            writeln!(out, "Number: {}", r.number)?;
            writeln!(out, "{}: {}", r.operation.operand_label(), r.operand)?;
            write!(out, "Result: {}", r.formula)
        }
        Calculation::Change(r) => {
            writeln!(out, "{} Calculation", r.operation.title())?;
            let (from_label, to_label) = match r.operation {
                ChangeOperation::Change => ("From Value", "To Value"),
                ChangeOperation::Difference => ("Value 1", "Value 2"),
                ChangeOperation::Error => ("Actual Value", "Expected Value"),
            };
            writeln!(out, "{}: {}", from_label, r.from)?;
            writeln!(out, "{}: {}", to_label, r.to)?;
            writeln!(out, "{}: {:.2}%", r.operation.title(), r.percentage)?;
            write!(out, "Absolute Change: {:.2}", r.absolute_change)?;
            if r.operation == ChangeOperation::Change {
                write!(out, "\nDirection: {}", r.direction)?;
                write!(
                    out,
                    "\nFormula: ({} - {}) ÷ |{}| × 100",
                    r.to, r.from, r.from
                )?;
            } else if r.operation == ChangeOperation::Difference {
                write!(
                    out,
                    "\nFormula: |{} - {}| ÷ (({} + {}) ÷ 2) × 100",
                    r.from, r.to, r.from, r.to
                )?;
            }
            Ok(())
        }
        Calculation::Convert(r) => {
            writeln!(out, "Format Conversion")?;
            writeln!(out, "Original Value: {} ({})", r.input, r.from.label())?;
            write!(out, "Converted Value: {} ({})", r.converted, r.to.label())
        }
        Calculation::Statistics(r) => {
            let s = &r.summary;
            writeln!(out, "Statistical Analysis Results")?;
            let dataset: Vec<String> = r.dataset.iter().map(|v| v.to_string()).collect();
            writeln!(out, "Dataset: {}", dataset.join(", "))?;
            writeln!(out)?;
            writeln!(out, "Basic Statistics:")?;
            writeln!(out, "Mean: {:.2}", s.mean)?;
            writeln!(out, "Median: {:.2}", s.median)?;
            writeln!(out, "Standard Deviation: {:.2}", s.standard_deviation)?;
            writeln!(out)?;
            write!(out, "Percentiles:")?;
            for p in &s.percentiles {
                write!(out, "\n{}th: {:.2}", p.rank, p.value)?;
            }
            Ok(())
        }
        Calculation::Discount(r) => {
            writeln!(out, "Original Price: ${:.2}", r.original_price)?;
            writeln!(out, "Discount: {}%", r.discount_percent)?;
            writeln!(out, "You Save: ${:.2}", r.discount_amount)?;
            write!(out, "Final Price: ${:.2}", r.final_price)
        }
        Calculation::Tax(r) => {
            writeln!(out, "Base Amount: ${:.2}", r.amount)?;
            writeln!(out, "Tax Rate: {}%", r.tax_rate)?;
            writeln!(out, "Tax Amount: ${:.2}", r.tax_amount)?;
            write!(out, "Total Amount: ${:.2}", r.total_amount)
        }
        Calculation::Roi(r) => {
            writeln!(out, "ROI Calculation Summary")?;
            writeln!(out, "Initial Investment: ${:.2}", r.initial_investment)?;
            writeln!(out, "Final Value: ${:.2}", r.final_value)?;
            writeln!(out, "ROI: {:.2}%", r.roi)?;
            write!(
                out,
                "{}: ${:.2}",
                if r.roi >= 0.0 { "Profit" } else { "Loss" },
                r.profit().abs()
            )
        }
        Calculation::AnnualizedRoi(r) => {
            writeln!(out, "Annualized ROI Calculation Summary")?;
            writeln!(out, "Initial Investment: ${:.2}", r.initial_investment)?;
            writeln!(out, "Final Value: ${:.2}", r.final_value)?;
            writeln!(out, "Time Period: {} years", r.years)?;
            writeln!(out, "Total ROI: {:.2}%", r.total_roi)?;
            writeln!(out, "Annualized ROI: {:.2}%", r.annualized_roi)?;
            write!(
                out,
                "Total {}: ${:.2}",
                if r.total_roi >= 0.0 { "Profit" } else { "Loss" },
                (r.final_value - r.initial_investment).abs()
            )
        }
        Calculation::RoiComparison(r) => {
            write!(out, "ROI Comparison Summary")?;
            for entry in &r.entries {
                write!(out, "\n\n{}:", entry.name)?;
                write!(out, "\nInitial Investment: ${:.2}", entry.initial_investment)?;
                write!(out, "\nFinal Value: ${:.2}", entry.final_value)?;
                write!(out, "\nROI: {:.2}%", entry.roi)?;
            }
            Ok(())
        }
        Calculation::TermGpa(r) => {
            writeln!(out, "Term GPA Calculation")?;
            writeln!(out)?;
            writeln!(out, "Courses:")?;
            for course in &r.courses {
                writeln!(
                    out,
                    "{}: {} credits, Grade: {}",
                    course.name, course.credits, course.grade
                )?;
            }
            writeln!(out)?;
            write!(out, "Term GPA: {:.2}", r.gpa)
        }
        Calculation::CumulativeGpa(r) => {
            writeln!(out, "Cumulative GPA Calculation")?;
            writeln!(out, "Current GPA: {}", r.current_gpa)?;
            writeln!(out, "Total Credits: {}", r.completed_credits)?;
            writeln!(out, "New Course Credits: {}", r.new_credits)?;
            writeln!(out, "New Course Grade: {}", r.new_grade)?;
            write!(out, "New Cumulative GPA: {:.2}", r.gpa)
        }
        Calculation::TargetGpa(r) => {
            writeln!(out, "Target GPA Calculation")?;
            writeln!(out, "Current GPA: {}", r.current_gpa)?;
            writeln!(out, "Target GPA: {}", r.target_gpa)?;
            writeln!(out, "Completed Credits: {}", r.completed_credits)?;
            writeln!(out, "Remaining Credits: {}", r.remaining_credits)?;
            write!(out, "Required GPA: {:.2}", r.required_gpa)
        }
        Calculation::GpaPrediction(r) => {
            writeln!(out, "GPA Prediction Analysis")?;
            writeln!(out, "Current GPA: {}", r.current_gpa)?;
            writeln!(out, "Target GPA: {}", r.target_gpa)?;
            writeln!(out, "Remaining Semesters: {}", r.semester_gpas.len())?;
            writeln!(out)?;
            writeln!(out, "Semester-by-Semester Projection:")?;
            for (i, gpa) in r.semester_gpas.iter().enumerate() {
                writeln!(out, "Semester {}: {:.2}", i + 1, gpa)?;
            }
            writeln!(out)?;
            write!(out, "Final Projected GPA: {:.2}", r.final_gpa())
        }
        Calculation::PerformanceAnalysis(r) => {
            writeln!(out, "Academic Performance Analysis")?;
            writeln!(out)?;
            write!(out, "Semester-by-Semester GPA:")?;
            for term in &r.terms {
                write!(
                    out,
                    "\n{}: {:.2} ({} courses)",
                    term.name, term.gpa, term.course_count
                )?;
            }
            writeln!(out)?;
            writeln!(out)?;
            write!(out, "Category Breakdown:")?;
            for category in &r.categories {
                write!(out, "\n{}: {:.2}", category.category, category.average_gpa)?;
            }
            Ok(())
        }
        Calculation::BodyFat(r) => {
            let m = &r.measurements;
            writeln!(out, "Body Fat Percentage Calculation")?;
            writeln!(out, "Gender: {}", m.sex)?;
            writeln!(out, "Weight: {} kg", m.weight_kg)?;
            writeln!(out, "Height: {} cm", m.height_cm)?;
            writeln!(out, "Neck: {} cm", m.neck_cm)?;
            writeln!(out, "Waist: {} cm", m.waist_cm)?;
            if let Some(hip) = m.hip_cm {
                writeln!(out, "Hip: {} cm", hip)?;
            }
            writeln!(out)?;
            writeln!(out, "Body Fat Percentage: {:.1}%", r.percentage)?;
            write!(out, "Category: {}", r.category)
        }
    }
}

/// Writes the summary into `dir` under its conventional file name.
pub fn write_export(calculation: &Calculation, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(calculation));
    fs::write(&path, export_text(calculation))?;
    tracing::info!("exported {} to {}", calculation.kind(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversion::{convert, ConversionRequest, RatioFormat};
    use crate::core::gpa::{performance_analysis, Course, GradeScale, Term};
    use crate::core::percentage::percentage_change;
    use crate::core::statistics::{analyze, StatisticsRequest};

    #[test]
    fn test_conversion_template() {
        let calc = Calculation::Convert(
            convert(&ConversionRequest {
                value: "0.75".to_string(),
                from: RatioFormat::Decimal,
                to: RatioFormat::Percentage,
            })
            .unwrap(),
        );
        assert_eq!(
            export_text(&calc),
            "Format Conversion\nOriginal Value: 0.75 (Decimal)\nConverted Value: 75.00% (Percentage (%))"
        );
        assert_eq!(export_filename(&calc), "format-conversion.txt");
    }

    #[test]
    fn test_change_template_has_direction() {
        let calc = Calculation::Change(percentage_change(50.0, 75.0).unwrap());
        let text = export_text(&calc);
        assert!(text.starts_with("Percentage Change Calculation\n"));
        assert!(text.contains("Percentage Change: 50.00%"));
        assert!(text.contains("Direction: Increase"));
    }

    #[test]
    fn test_performance_template() {
        let terms = [Term {
            name: "Fall 2023".to_string(),
            courses: vec![
                Course::new("Algebra", 3.0, "A").with_category("Math"),
                Course::new("Poetry", 3.0, "B").with_category("Humanities"),
            ],
        }];
        let calc = Calculation::PerformanceAnalysis(
            performance_analysis(&terms, &GradeScale::us_standard()).unwrap(),
        );
        assert_eq!(export_filename(&calc), "academic-performance.txt");
        assert_eq!(
            export_text(&calc),
            "Academic Performance Analysis\n\n\
             Semester-by-Semester GPA:\n\
             Fall 2023: 3.50 (2 courses)\n\n\
             Category Breakdown:\n\
             Math: 4.00\n\
             Humanities: 3.00"
        );
    }

    #[test]
    fn test_statistics_template_lists_percentiles() {
        let calc = Calculation::Statistics(
            analyze(&StatisticsRequest {
                values: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            })
            .unwrap(),
        );
        let text = export_text(&calc);
        assert!(text.contains("Dataset: 1, 2, 3, 4, 5"));
        assert!(text.contains("Standard Deviation: 1.41"));
        assert!(text.contains("50th: 3.00"));
        assert!(text.ends_with("90th: 5.00"));
    }
}
