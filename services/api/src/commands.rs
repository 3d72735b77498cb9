use crate::infra::{parse_profile, TransmissionChoice};
use clap::Args;
use pandemic_risk::config::AppConfig;
use pandemic_risk::data::RiskDataset;
use pandemic_risk::error::AppError;
use pandemic_risk::scoring::{
    AssessmentRequest, DomainScore, OverallScore, PersonProfile, RiskAssessment, RiskEngine,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Five-digit response code: gender, city, age band, diabetes, hypertension
    #[arg(long, value_parser = parse_profile)]
    pub(crate) code: PersonProfile,
    /// Response code of the household member (defaults to the respondent)
    #[arg(long, value_parser = parse_profile)]
    pub(crate) household_code: Option<PersonProfile>,
    /// Directory holding the CSV snapshot (defaults to RISK_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Use the measured transmission of this place instead of the fixed value
    #[arg(long)]
    pub(crate) place: Option<String>,
    /// Narrow the place lookup to one place type (e.g. Indoor)
    #[arg(long, requires = "place")]
    pub(crate) place_type: Option<String>,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OverallArgs {
    /// Health-system domain score
    pub(crate) health_system: f64,
    /// Prevalence domain score
    pub(crate) prevalence: f64,
    /// Transmission domain score
    pub(crate) transmission: f64,
    /// Personal-risk domain score
    pub(crate) personal_risk: f64,
}

pub(crate) fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        code,
        household_code,
        data_dir,
        place,
        place_type,
        json,
    } = args;

    let config = AppConfig::load()?;
    let engine = RiskEngine::new(config.scoring)?;
    let data_dir = data_dir.unwrap_or(config.data.dir);
    let dataset = RiskDataset::from_dir(&data_dir)?;

    let request = AssessmentRequest {
        subject: code,
        household: household_code,
    };
    let choice = place.map(|place| TransmissionChoice::Place {
        place,
        kind: place_type,
    });
    let selector = TransmissionChoice::selector(choice, &engine);

    let assessment = engine.assess(&dataset, &request, selector.as_ref())?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&assessment).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_assessment(&assessment, &data_dir);
    }
    Ok(())
}

pub(crate) fn run_overall(args: OverallArgs) -> Result<(), AppError> {
    let overall = RiskEngine::default().overall(
        args.health_system,
        args.prevalence,
        args.transmission,
        args.personal_risk,
    )?;
    render_overall(&overall);
    Ok(())
}

fn render_assessment(assessment: &RiskAssessment, data_dir: &std::path::Path) {
    println!("Pandemic risk assessment");
    println!(
        "City: {} | Respondent code {} | Household code {}",
        assessment.city,
        assessment.subject.response_code(),
        assessment.household.response_code()
    );
    println!("Data source: {}", data_dir.display());
    if let Some(as_of) = assessment.prevalence_as_of {
        println!("Live feed as of: {as_of}");
    }

    for domain in assessment.domains() {
        render_domain(domain);
    }

    println!();
    render_overall(&assessment.overall);
}

fn render_domain(domain: &DomainScore) {
    match domain.label {
        Some(label) => println!(
            "\n{}: {} (score {:.3})",
            domain.domain.label(),
            label,
            domain.score
        ),
        None => println!("\n{}: score {:.3}", domain.domain.label(), domain.score),
    }
    for reading in &domain.indicators {
        println!("- {}: {}", reading.indicator.label(), reading.caption);
    }
}

fn render_overall(overall: &OverallScore) {
    println!(
        "Overall risk: {} (level {}, sum {:.3})",
        overall.label,
        overall.level.get(),
        overall.score
    );
}
