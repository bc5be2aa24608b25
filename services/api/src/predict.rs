use clap::Args;
use loan_eligibility::config::AppConfig;
use loan_eligibility::eligibility::{Assessment, EligibilityService, Predictor, RawApplication};
use loan_eligibility::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

/// Form answers for a one-off assessment. Choices default to the first option
/// the web form offers.
#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Classifier artifact (defaults to APP_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Male or Female
    #[arg(long, default_value = "Male")]
    pub(crate) gender: String,
    /// Yes or No
    #[arg(long, default_value = "Yes")]
    pub(crate) married: String,
    /// 0, 1, 2 or 3+
    #[arg(long, default_value = "0")]
    pub(crate) dependents: String,
    /// Graduate or "Not Graduate"
    #[arg(long, default_value = "Graduate")]
    pub(crate) education: String,
    /// Yes or No
    #[arg(long, default_value = "Yes")]
    pub(crate) self_employed: String,
    #[arg(long)]
    pub(crate) applicant_income: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) coapplicant_income: f64,
    /// Loan amount in thousands
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Loan term in months
    #[arg(long)]
    pub(crate) loan_amount_term: f64,
    /// "Meets guidelines" or "Does not meet guidelines"
    #[arg(long, default_value = "Meets guidelines")]
    pub(crate) credit_history: String,
    /// Urban, Semiurban or Rural
    #[arg(long, default_value = "Urban")]
    pub(crate) property_area: String,
    /// Print the assessment as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl PredictArgs {
    fn application(&self) -> RawApplication {
        RawApplication {
            gender: self.gender.clone(),
            married: self.married.clone(),
            dependents: self.dependents.clone(),
            education: self.education.clone(),
            self_employed: self.self_employed.clone(),
            applicant_income: self.applicant_income,
            coapplicant_income: self.coapplicant_income,
            loan_amount: self.loan_amount,
            loan_amount_term: self.loan_amount_term,
            credit_history: self.credit_history.clone(),
            property_area: self.property_area.clone(),
        }
    }
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let model_path = match args.model.clone() {
        Some(path) => path,
        None => AppConfig::load()?.model.artifact_path,
    };

    let predictor = Arc::new(Predictor::load(&model_path)?);
    let service = EligibilityService::new(predictor);
    let assessment = service.assess(&args.application())?;

    if args.json {
        match serde_json::to_string_pretty(&assessment) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Assessment payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_assessment(&assessment, service.model_info().model_name.as_str()));
    }

    Ok(())
}

pub(crate) fn render_assessment(assessment: &Assessment, model_name: &str) -> String {
    let mut lines = vec![
        format!("Loan eligibility check (model {model_name})"),
        String::new(),
        "Feature vector".to_string(),
    ];
    lines.extend(
        assessment
            .features
            .named()
            .map(|(name, value)| format!("- {name}: {value:.4}")),
    );
    lines.push(String::new());
    lines.push(assessment.message.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
