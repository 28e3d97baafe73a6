use crate::config::Overrides;
use crate::core::body_fat::{BodyFatRequest, Sex};
use crate::core::commerce::{DiscountRequest, TaxRequest};
use crate::core::conversion::{ConversionRequest, RatioFormat};
use crate::core::gpa::{
    Course, CumulativeGpaRequest, GpaPredictionRequest, TargetGpaRequest, Term,
};
use crate::core::percentage::{ChangeOperation, ChangeRequest, SimpleOperation, SimplePercentageRequest};
use crate::core::roi::{AnnualizedRoiRequest, Investment, RoiRequest};
use crate::core::statistics::{parse_sample, StatisticsRequest};
use crate::domain::model::CalculationRequest;
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::parse_number;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;

#[derive(Debug, Clone, Parser)]
#[command(name = "percent-calc")]
#[command(about = "Percentage calculators with local history and plain-text export")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Directory holding the history files")]
    pub history_dir: Option<String>,

    #[arg(long, global = true, help = "Do not record this calculation")]
    pub no_history: bool,

    #[arg(long, global = true, help = "Write a plain-text summary of the result")]
    pub export: bool,

    #[arg(long, global = true)]
    pub export_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            history_dir: self.history_dir.clone(),
            no_history: self.no_history,
            export_dir: self.export_dir.clone(),
            verbose: self.verbose,
            json_logs: self.json_logs,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SimpleArg {
    PercentOf,
    WhatPercent,
    IncreaseBy,
    DecreaseBy,
}

impl From<SimpleArg> for SimpleOperation {
    fn from(arg: SimpleArg) -> Self {
        match arg {
            SimpleArg::PercentOf => Self::PercentOf,
            SimpleArg::WhatPercent => Self::WhatPercent,
            SimpleArg::IncreaseBy => Self::IncreaseBy,
            SimpleArg::DecreaseBy => Self::DecreaseBy,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ChangeArg {
    Change,
    Difference,
    Error,
}

impl From<ChangeArg> for ChangeOperation {
    fn from(arg: ChangeArg) -> Self {
        match arg {
            ChangeArg::Change => Self::Change,
            ChangeArg::Difference => Self::Difference,
            ChangeArg::Error => Self::Error,
        }
    }
}

fn parse_format(s: &str) -> std::result::Result<RatioFormat, String> {
    s.parse::<RatioFormat>().map_err(|e| e.to_string())
}

fn parse_sex(s: &str) -> std::result::Result<Sex, String> {
    s.parse::<Sex>().map_err(|e| e.to_string())
}

/// `NAME:INITIAL:FINAL`; the name may itself contain colons.
pub fn parse_investment(spec: &str) -> Result<Investment> {
    let parts: Vec<&str> = spec.rsplitn(3, ':').collect();
    let [final_value, initial, name] = parts.as_slice() else {
        return Err(CalcError::parse("investment", spec));
    };
    Ok(Investment {
        name: name.trim().to_string(),
        initial_investment: parse_number("initial investment", initial)?,
        final_value: parse_number("final value", final_value)?,
    })
}

/// `NAME:CREDITS:GRADE[@CATEGORY]`; the grade may contain colons (`2:1`).
pub fn parse_course(spec: &str) -> Result<Course> {
    let (fields, category) = match spec.rsplit_once('@') {
        Some((fields, category)) => (fields, category.trim()),
        None => (spec, ""),
    };
    let parts: Vec<&str> = fields.splitn(3, ':').collect();
    let [name, credits, grade] = parts.as_slice() else {
        return Err(CalcError::parse("course", spec));
    };
    if grade.trim().is_empty() {
        return Err(CalcError::parse("grade", spec));
    }

    let course = Course::new(name.trim(), parse_number("credits", credits)?, grade.trim());
    Ok(if category.is_empty() {
        course
    } else {
        course.with_category(category)
    })
}

/// Reads a JSON array of `{ "name", "courses": [...] }` terms.
pub fn load_terms(path: &str) -> Result<Vec<Term>> {
    let content = fs::read_to_string(path).map_err(|e| {
        tracing::warn!("cannot read terms file {}: {}", path, e);
        CalcError::parse("terms file", path)
    })?;
    serde_json::from_str(&content).map_err(|e| {
        tracing::warn!("invalid terms file {}: {}", path, e);
        CalcError::parse("terms file", path)
    })
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Basic percentage arithmetic
    Percent {
        #[arg(value_enum)]
        operation: SimpleArg,
        #[arg(allow_negative_numbers = true)]
        number: String,
        #[arg(allow_negative_numbers = true)]
        operand: String,
    },
    /// Percentage change, difference or error between two values
    Change {
        #[arg(allow_negative_numbers = true)]
        from: String,
        #[arg(allow_negative_numbers = true)]
        to: String,
        #[arg(long, value_enum, default_value = "change")]
        mode: ChangeArg,
    },
    /// Convert a ratio between percentage, decimal, fraction, permille, bps and ppm
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(long, default_value = "decimal", value_parser = parse_format)]
        from: RatioFormat,
        #[arg(long, default_value = "percentage", value_parser = parse_format)]
        to: RatioFormat,
    },
    /// Mean, median, standard deviation and percentiles of a sample
    Stats {
        /// Values separated by commas or spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        values: Vec<String>,
    },
    Discount {
        price: String,
        percent: String,
    },
    Tax {
        amount: String,
        rate: String,
    },
    /// Return on investment
    Roi {
        initial: String,
        #[arg(allow_negative_numbers = true)]
        final_value: String,
        /// Holding period; reports the annualized ROI when given
        #[arg(long)]
        years: Option<String>,
    },
    /// Compare investments given as NAME:INITIAL:FINAL
    RoiCompare {
        #[arg(required = true, num_args = 2..)]
        investments: Vec<String>,
    },
    /// Term GPA from courses given as NAME:CREDITS:GRADE[@CATEGORY]
    TermGpa {
        #[arg(required = true, num_args = 1..)]
        courses: Vec<String>,
    },
    CumulativeGpa {
        current_gpa: String,
        completed_credits: String,
        new_credits: String,
        new_grade: String,
    },
    TargetGpa {
        current_gpa: String,
        target_gpa: String,
        completed_credits: String,
        remaining_credits: String,
    },
    GpaPredict {
        current_gpa: String,
        target_gpa: String,
        semesters: u32,
    },
    /// Semester-by-semester and per-category GPA from a JSON file of terms
    GpaPerformance {
        file: String,
    },
    /// U.S. Navy body-fat estimate (cm, kg)
    BodyFat {
        #[arg(long, value_parser = parse_sex)]
        sex: Sex,
        #[arg(long)]
        weight: String,
        #[arg(long)]
        height: String,
        #[arg(long)]
        neck: String,
        #[arg(long)]
        waist: String,
        #[arg(long)]
        hip: Option<String>,
    },
    /// Show recorded calculations, most recent first
    History {
        /// basic, commerce, roi, gpa or body-fat; all when omitted
        kind: Option<String>,
    },
    ClearHistory {
        kind: String,
    },
}

impl Command {
    /// Builds the calculation request for calculator subcommands; `None` for
    /// history management.
    pub fn to_request(&self) -> Result<Option<CalculationRequest>> {
        let request = match self {
            Command::Percent {
                operation,
                number,
                operand,
            } => CalculationRequest::Simple(SimplePercentageRequest {
                operation: (*operation).into(),
                number: parse_number("number", number)?,
                operand: parse_number("operand", operand)?,
            }),
            Command::Change { from, to, mode } => CalculationRequest::Change(ChangeRequest {
                operation: (*mode).into(),
                from: parse_number("initial value", from)?,
                to: parse_number("final value", to)?,
            }),
            Command::Convert { value, from, to } => CalculationRequest::Convert(ConversionRequest {
                value: value.clone(),
                from: *from,
                to: *to,
            }),
            Command::Stats { values } => CalculationRequest::Statistics(StatisticsRequest {
                values: parse_sample(&values.join(" "))?,
            }),
            Command::Discount { price, percent } => CalculationRequest::Discount(DiscountRequest {
                original_price: parse_number("original price", price)?,
                discount_percent: parse_number("discount", percent)?,
            }),
            Command::Tax { amount, rate } => CalculationRequest::Tax(TaxRequest {
                amount: parse_number("amount", amount)?,
                tax_rate: parse_number("tax rate", rate)?,
            }),
            Command::Roi {
                initial,
                final_value,
                years,
            } => {
                let initial_investment = parse_number("initial investment", initial)?;
                let final_value = parse_number("final value", final_value)?;
                match years {
                    Some(years) => CalculationRequest::AnnualizedRoi(AnnualizedRoiRequest {
                        initial_investment,
                        final_value,
                        years: parse_number("time period", years)?,
                    }),
                    None => CalculationRequest::Roi(RoiRequest {
                        initial_investment,
                        final_value,
                    }),
                }
            }
            Command::RoiCompare { investments } => CalculationRequest::RoiComparison {
                investments: investments
                    .iter()
                    .map(|spec| parse_investment(spec))
                    .collect::<Result<Vec<_>>>()?,
            },
            Command::TermGpa { courses } => CalculationRequest::TermGpa {
                courses: courses
                    .iter()
                    .map(|spec| parse_course(spec))
                    .collect::<Result<Vec<_>>>()?,
            },
            Command::CumulativeGpa {
                current_gpa,
                completed_credits,
                new_credits,
                new_grade,
            } => CalculationRequest::CumulativeGpa(CumulativeGpaRequest {
                current_gpa: parse_number("current GPA", current_gpa)?,
                completed_credits: parse_number("completed credits", completed_credits)?,
                new_credits: parse_number("new course credits", new_credits)?,
                new_grade: new_grade.clone(),
            }),
            Command::TargetGpa {
                current_gpa,
                target_gpa,
                completed_credits,
                remaining_credits,
            } => CalculationRequest::TargetGpa(TargetGpaRequest {
                current_gpa: parse_number("current GPA", current_gpa)?,
                target_gpa: parse_number("target GPA", target_gpa)?,
                completed_credits: parse_number("completed credits", completed_credits)?,
                remaining_credits: parse_number("remaining credits", remaining_credits)?,
            }),
            Command::GpaPredict {
                current_gpa,
                target_gpa,
                semesters,
            } => CalculationRequest::GpaPrediction(GpaPredictionRequest {
                current_gpa: parse_number("current GPA", current_gpa)?,
                target_gpa: parse_number("target GPA", target_gpa)?,
                remaining_semesters: *semesters,
            }),
            Command::GpaPerformance { file } => CalculationRequest::PerformanceAnalysis {
                terms: load_terms(file)?,
            },
            Command::BodyFat {
                sex,
                weight,
                height,
                neck,
                waist,
                hip,
            } => CalculationRequest::BodyFat(BodyFatRequest {
                sex: *sex,
                weight_kg: parse_number("weight", weight)?,
                height_cm: parse_number("height", height)?,
                neck_cm: parse_number("neck", neck)?,
                waist_cm: parse_number("waist", waist)?,
                hip_cm: hip
                    .as_deref()
                    .map(|hip| parse_number("hip", hip))
                    .transpose()?,
            }),
            Command::History { .. } | Command::ClearHistory { .. } => return Ok(None),
        };
        Ok(Some(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let cli = CliConfig::try_parse_from([
            "percent-calc",
            "convert",
            "3/4",
            "--from",
            "fraction",
            "--to",
            "bps",
        ])
        .unwrap();
        match cli.command {
            Command::Convert { value, from, to } => {
                assert_eq!(value, "3/4");
                assert_eq!(from, RatioFormat::Fraction);
                assert_eq!(to, RatioFormat::BasisPoints);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::try_parse_from([
            "percent-calc",
            "change",
            "50",
            "75",
            "--no-history",
            "--export",
        ])
        .unwrap();
        assert!(cli.no_history);
        assert!(cli.export);
        assert!(cli.overrides().no_history);
    }

    #[test]
    fn test_negative_values_accepted() {
        let cli = CliConfig::try_parse_from(["percent-calc", "change", "-50", "-25"]).unwrap();
        assert!(matches!(cli.command, Command::Change { .. }));
    }

    #[test]
    fn test_parse_investment_and_course() {
        let investment = parse_investment("Index: World:1000:1100").unwrap();
        assert_eq!(investment.name, "Index: World");
        assert_eq!(investment.initial_investment, 1000.0);
        assert_eq!(investment.final_value, 1100.0);

        let course = parse_course("Algebra:4:A-").unwrap();
        assert_eq!(course.credits, 4.0);
        assert_eq!(course.grade, "A-");

        assert!(parse_course("Algebra:A").is_err());
        assert!(parse_investment("Bonds:lots:1100").is_err());
    }

    #[test]
    fn test_parse_course_keeps_colons_in_grade() {
        let course = parse_course("Essay:3:2:1").unwrap();
        assert_eq!(course.name, "Essay");
        assert_eq!(course.credits, 3.0);
        assert_eq!(course.grade, "2:1");
        assert_eq!(course.category, "General");

        let tagged = parse_course("Essay:3:2:2@Writing").unwrap();
        assert_eq!(tagged.grade, "2:2");
        assert_eq!(tagged.category, "Writing");

        let cli = CliConfig::try_parse_from(["percent-calc", "term-gpa", "Essay:3:2:1", "Lab:1:First"])
            .unwrap();
        match cli.command.to_request().unwrap() {
            Some(CalculationRequest::TermGpa { courses }) => {
                let grades: Vec<&str> = courses.iter().map(|c| c.grade.as_str()).collect();
                assert_eq!(grades, vec!["2:1", "First"]);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_gpa_performance_reads_terms_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"[{"name": "Fall", "courses": [{"name": "Algebra", "credits": 3, "grade": "A", "category": "Math"}]}]"#,
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from(["percent-calc", "gpa-performance", path.as_str()]).unwrap();
        match cli.command.to_request().unwrap() {
            Some(CalculationRequest::PerformanceAnalysis { terms }) => {
                assert_eq!(terms.len(), 1);
                assert_eq!(terms[0].courses[0].category, "Math");
            }
            other => panic!("unexpected request {:?}", other),
        }

        assert!(matches!(
            load_terms("/nonexistent/terms.json"),
            Err(CalcError::ParseError { .. })
        ));
    }

    #[test]
    fn test_stats_request_from_mixed_separators() {
        let cli = CliConfig::try_parse_from(["percent-calc", "stats", "1,2", "3", "4;5"]).unwrap();
        match cli.command.to_request().unwrap() {
            Some(CalculationRequest::Statistics(r)) => {
                assert_eq!(r.values, vec![1.0, 2.0, 3.0, 4.0, 5.0])
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_roi_with_years_is_annualized() {
        let cli = CliConfig::try_parse_from(["percent-calc", "roi", "1000", "2000", "--years", "5"])
            .unwrap();
        assert!(matches!(
            cli.command.to_request().unwrap(),
            Some(CalculationRequest::AnnualizedRoi(_))
        ));
    }

    #[test]
    fn test_history_has_no_request() {
        let cli = CliConfig::try_parse_from(["percent-calc", "history"]).unwrap();
        assert!(cli.command.to_request().unwrap().is_none());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(CliConfig::try_parse_from([
            "percent-calc",
            "convert",
            "1",
            "--to",
            "furlongs"
        ])
        .is_err());
    }
}
