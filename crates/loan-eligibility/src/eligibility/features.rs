use serde::{Deserialize, Serialize};

use super::domain::{
    CategoricalField, CreditHistory, Dependents, Education, Gender, PropertyArea,
    RawApplication, YesNo,
};

/// Column order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Gender",
    "Married",
    "Dependents",
    "Education",
    "Self_Employed",
    "LoanAmount",
    "Loan_Amount_Term",
    "Credit_History",
    "Property_Area",
    "TotalIncome",
    "EMI",
    "Balance_Income",
];

pub const FEATURE_COUNT: usize = 12;

/// EMI is expressed in thousands; balance income is in base units.
const EMI_SCALE: f64 = 1000.0;

/// Input rejected before it reaches the classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("{field} does not accept '{value}'")]
    InvalidCategory { field: &'static str, value: String },
    #[error("loan_amount_term must be a positive number of months (found {0})")]
    InvalidTerm(f64),
    #[error("{field} must be a finite, non-negative number (found {value})")]
    InvalidAmount { field: &'static str, value: f64 },
}

/// Numeric record handed to the classifier, fields in training order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "Gender")]
    pub gender: f64,
    #[serde(rename = "Married")]
    pub married: f64,
    #[serde(rename = "Dependents")]
    pub dependents: f64,
    #[serde(rename = "Education")]
    pub education: f64,
    #[serde(rename = "Self_Employed")]
    pub self_employed: f64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Amount_Term")]
    pub loan_amount_term: f64,
    #[serde(rename = "Credit_History")]
    pub credit_history: f64,
    #[serde(rename = "Property_Area")]
    pub property_area: f64,
    #[serde(rename = "TotalIncome")]
    pub total_income: f64,
    #[serde(rename = "EMI")]
    pub emi: f64,
    #[serde(rename = "Balance_Income")]
    pub balance_income: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.gender,
            self.married,
            self.dependents,
            self.education,
            self.self_employed,
            self.loan_amount,
            self.loan_amount_term,
            self.credit_history,
            self.property_area,
            self.total_income,
            self.emi,
            self.balance_income,
        ]
    }

    /// Pairs each value with its training-time column name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, FeatureError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FeatureError::InvalidAmount { field, value })
    }
}

/// Sums and quotients of in-range inputs can still overflow.
fn derived(field: &'static str, value: f64) -> Result<f64, FeatureError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FeatureError::InvalidAmount { field, value })
    }
}

/// Encode the raw answers and derive the income features.
pub fn transform(raw: &RawApplication) -> Result<FeatureVector, FeatureError> {
    let gender = Gender::parse(&raw.gender)?;
    let married = YesNo::parse(CategoricalField::Married, &raw.married)?;
    let dependents = Dependents::parse(&raw.dependents)?;
    let education = Education::parse(&raw.education)?;
    let self_employed = YesNo::parse(CategoricalField::SelfEmployed, &raw.self_employed)?;
    let credit_history = CreditHistory::parse(&raw.credit_history)?;
    let property_area = PropertyArea::parse(&raw.property_area)?;

    let applicant_income = non_negative("applicant_income", raw.applicant_income)?;
    let coapplicant_income = non_negative("coapplicant_income", raw.coapplicant_income)?;
    let loan_amount = non_negative("loan_amount", raw.loan_amount)?;

    let term = raw.loan_amount_term;
    if !term.is_finite() || term <= 0.0 {
        return Err(FeatureError::InvalidTerm(term));
    }

    let total_income = derived("total_income", applicant_income + coapplicant_income)?;
    let emi = derived("emi", loan_amount / term)?;
    // Difference of two finite non-negative values stays finite.
    let balance_income = total_income - derived("emi", emi * EMI_SCALE)?;

    Ok(FeatureVector {
        gender: gender.code(),
        married: married.code(),
        dependents: dependents.code(),
        education: education.code(),
        self_employed: self_employed.code(),
        loan_amount,
        loan_amount_term: term,
        credit_history: credit_history.code(),
        property_area: property_area.code(),
        total_income,
        emi,
        balance_income,
    })
}
