use serde::{Deserialize, Serialize};

use super::features::FeatureError;

/// Answers exactly as the applicant form submits them.
///
/// Categorical answers stay as text until [`transform`](super::features::transform)
/// validates them, so an out-of-set value surfaces as a typed error instead of a
/// deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawApplication {
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    /// Requested amount, in thousands.
    pub loan_amount: f64,
    /// Repayment term, in months.
    pub loan_amount_term: f64,
    pub credit_history: String,
    pub property_area: String,
}

/// Form fields carrying a fixed set of answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Gender,
    Married,
    Dependents,
    Education,
    SelfEmployed,
    CreditHistory,
    PropertyArea,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 7] = [
        CategoricalField::Gender,
        CategoricalField::Married,
        CategoricalField::Dependents,
        CategoricalField::Education,
        CategoricalField::SelfEmployed,
        CategoricalField::CreditHistory,
        CategoricalField::PropertyArea,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            CategoricalField::Gender => "gender",
            CategoricalField::Married => "married",
            CategoricalField::Dependents => "dependents",
            CategoricalField::Education => "education",
            CategoricalField::SelfEmployed => "self_employed",
            CategoricalField::CreditHistory => "credit_history",
            CategoricalField::PropertyArea => "property_area",
        }
    }

    /// Labels a form should offer for this field.
    pub const fn options(self) -> &'static [&'static str] {
        match self {
            CategoricalField::Gender => &["Male", "Female"],
            CategoricalField::Married | CategoricalField::SelfEmployed => &["Yes", "No"],
            CategoricalField::Dependents => &["0", "1", "2", "3+"],
            CategoricalField::Education => &["Graduate", "Not Graduate"],
            CategoricalField::CreditHistory => {
                &["Meets guidelines", "Does not meet guidelines"]
            }
            CategoricalField::PropertyArea => &["Urban", "Semiurban", "Rural"],
        }
    }
}

/// Case- and whitespace-insensitive key used to match form labels and enum names.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn invalid(field: CategoricalField, raw: &str) -> FeatureError {
    FeatureError::InvalidCategory {
        field: field.label(),
        value: raw.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn parse(raw: &str) -> Result<Self, FeatureError> {
        match normalize(raw).as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(invalid(CategoricalField::Gender, raw)),
        }
    }

    pub const fn code(self) -> f64 {
        match self {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        }
    }
}

/// Yes/No answer shared by the married and self-employed questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn parse(field: CategoricalField, raw: &str) -> Result<Self, FeatureError> {
        match normalize(raw).as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(invalid(field, raw)),
        }
    }

    pub const fn code(self) -> f64 {
        match self {
            YesNo::Yes => 1.0,
            YesNo::No => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependents {
    Zero,
    One,
    Two,
    ThreeOrMore,
}

impl Dependents {
    pub fn parse(raw: &str) -> Result<Self, FeatureError> {
        match raw.trim() {
            "0" => Ok(Self::Zero),
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            "3+" => Ok(Self::ThreeOrMore),
            _ => Err(invalid(CategoricalField::Dependents, raw)),
        }
    }

    pub const fn code(self) -> f64 {
        match self {
            Dependents::Zero => 0.0,
            Dependents::One => 1.0,
            Dependents::Two => 2.0,
            Dependents::ThreeOrMore => 3.0,
        }
    }
}

/// Graduates encode as 0; the trained artifact expects this inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Education {
    Graduate,
    NotGraduate,
}

impl Education {
    pub fn parse(raw: &str) -> Result<Self, FeatureError> {
        match normalize(raw).as_str() {
            "graduate" => Ok(Self::Graduate),
            "notgraduate" => Ok(Self::NotGraduate),
            _ => Err(invalid(CategoricalField::Education, raw)),
        }
    }

    pub const fn code(self) -> f64 {
        match self {
            Education::Graduate => 0.0,
            Education::NotGraduate => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditHistory {
    MeetsGuidelines,
    DoesNotMeet,
}

impl CreditHistory {
    pub fn parse(raw: &str) -> Result<Self, FeatureError> {
        match normalize(raw).as_str() {
            "meetsguidelines" => Ok(Self::MeetsGuidelines),
            "doesnotmeet" | "doesnotmeetguidelines" => Ok(Self::DoesNotMeet),
            _ => Err(invalid(CategoricalField::CreditHistory, raw)),
        }
    }

    pub const fn code(self) -> f64 {
        match self {
            CreditHistory::MeetsGuidelines => 1.0,
            CreditHistory::DoesNotMeet => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyArea {
    Urban,
    Semiurban,
    Rural,
}

impl PropertyArea {
    pub fn parse(raw: &str) -> Result<Self, FeatureError> {
        match normalize(raw).as_str() {
            "urban" => Ok(Self::Urban),
            "semiurban" => Ok(Self::Semiurban),
            "rural" => Ok(Self::Rural),
            _ => Err(invalid(CategoricalField::PropertyArea, raw)),
        }
    }

    pub const fn code(self) -> f64 {
        match self {
            PropertyArea::Urban => 2.0,
            PropertyArea::Semiurban => 1.0,
            PropertyArea::Rural => 0.0,
        }
    }
}

/// Binary outcome reported back to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    /// Label 1 approves; every other label rejects.
    pub const fn from_label(label: i64) -> Self {
        if label == 1 {
            Verdict::Approved
        } else {
            Verdict::Rejected
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Verdict::Approved => "Loan Approved",
            Verdict::Rejected => "Loan Rejected",
        }
    }
}
