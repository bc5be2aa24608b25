use super::common::*;
use crate::eligibility::domain::RawApplication;
use crate::eligibility::features::{transform, FeatureError, FEATURE_COUNT, FEATURE_NAMES};

#[test]
fn reference_applicant_encodes_to_expected_vector() {
    let features = transform(&application()).expect("valid application");

    assert_eq!(features.gender, 1.0);
    assert_eq!(features.married, 1.0);
    assert_eq!(features.dependents, 0.0);
    assert_eq!(features.education, 0.0);
    assert_eq!(features.self_employed, 0.0);
    assert_eq!(features.loan_amount, 100.0);
    assert_eq!(features.loan_amount_term, 360.0);
    assert_eq!(features.credit_history, 1.0);
    assert_eq!(features.property_area, 2.0);
    assert_close(features.total_income, 5000.0);
    assert_close(features.emi, 100.0 / 360.0);
    assert_close(features.balance_income, 5000.0 - (100.0 / 360.0) * 1000.0);
    assert!((features.emi - 0.2778).abs() < 1e-4);
    assert!((features.balance_income - 4722.2).abs() < 0.1);
}

#[test]
fn income_columns_are_dropped_after_derivation() {
    let features = transform(&application()).expect("valid application");
    let serialized = serde_json::to_value(features).expect("serializes");
    let object = serialized.as_object().expect("object");

    assert_eq!(object.len(), FEATURE_COUNT);
    assert!(!object.contains_key("ApplicantIncome"));
    assert!(!object.contains_key("CoapplicantIncome"));
    for name in FEATURE_NAMES {
        assert!(object.contains_key(name), "missing {name}");
    }
}

#[test]
fn named_values_follow_training_order() {
    let features = transform(&application()).expect("valid application");
    let names: Vec<&str> = features.named().map(|(name, _)| name).collect();
    assert_eq!(names, FEATURE_NAMES.to_vec());
    assert_eq!(features.to_array()[7], features.credit_history);
    assert_eq!(features.to_array()[11], features.balance_income);
}

#[test]
fn emi_divides_amount_by_term() {
    let raw = RawApplication {
        applicant_income: 3000.0,
        coapplicant_income: 1500.0,
        loan_amount: 100.0,
        loan_amount_term: 12.0,
        ..application()
    };
    let features = transform(&raw).expect("valid application");

    assert_close(features.emi, 100.0 / 12.0);
    assert_close(features.total_income, 4500.0);
    assert_close(features.balance_income, 4500.0 - (100.0 / 12.0) * 1000.0);
    assert!(features.balance_income < 0.0);
}

#[test]
fn dependents_map_to_exact_counts() {
    for (raw, expected) in [("0", 0.0), ("1", 1.0), ("2", 2.0), ("3+", 3.0)] {
        let application = RawApplication {
            dependents: raw.to_string(),
            ..application()
        };
        let features = transform(&application).expect("valid dependents");
        assert_eq!(features.dependents, expected, "dependents {raw}");
    }
}

#[test]
fn dependents_outside_the_form_choices_are_rejected() {
    for raw in ["4", "3", "-1", "two", ""] {
        let application = RawApplication {
            dependents: raw.to_string(),
            ..application()
        };
        match transform(&application) {
            Err(FeatureError::InvalidCategory { field, value }) => {
                assert_eq!(field, "dependents");
                assert_eq!(value, raw);
            }
            other => panic!("expected invalid dependents for {raw:?}, got {other:?}"),
        }
    }
}

#[test]
fn categorical_encodings_match_training_schema() {
    let raw = RawApplication {
        gender: "Female".to_string(),
        married: "No".to_string(),
        education: "Not Graduate".to_string(),
        self_employed: "Yes".to_string(),
        credit_history: "Does not meet guidelines".to_string(),
        property_area: "Semiurban".to_string(),
        ..application()
    };
    let features = transform(&raw).expect("valid application");

    assert_eq!(features.gender, 0.0);
    assert_eq!(features.married, 0.0);
    assert_eq!(features.education, 1.0);
    assert_eq!(features.self_employed, 1.0);
    assert_eq!(features.credit_history, 0.0);
    assert_eq!(features.property_area, 1.0);

    let rural = RawApplication {
        property_area: "Rural".to_string(),
        ..application()
    };
    assert_eq!(transform(&rural).expect("rural").property_area, 0.0);
}

#[test]
fn enum_names_and_casing_are_accepted() {
    let raw = RawApplication {
        gender: " male ".to_string(),
        education: "NotGraduate".to_string(),
        credit_history: "MeetsGuidelines".to_string(),
        property_area: "URBAN".to_string(),
        ..application()
    };
    let features = transform(&raw).expect("aliases accepted");
    assert_eq!(features.gender, 1.0);
    assert_eq!(features.education, 1.0);
    assert_eq!(features.credit_history, 1.0);
    assert_eq!(features.property_area, 2.0);

    let poor = RawApplication {
        credit_history: "DoesNotMeet".to_string(),
        ..application()
    };
    assert_eq!(transform(&poor).expect("alias").credit_history, 0.0);
}

#[test]
fn unknown_property_area_is_rejected() {
    let raw = RawApplication {
        property_area: "Coastal".to_string(),
        ..application()
    };
    let err = transform(&raw).expect_err("coastal rejected");
    assert_eq!(
        err,
        FeatureError::InvalidCategory {
            field: "property_area",
            value: "Coastal".to_string(),
        }
    );
    assert!(err.to_string().contains("Coastal"));
}

#[test]
fn zero_term_is_rejected_before_division() {
    let raw = RawApplication {
        loan_amount_term: 0.0,
        ..application()
    };
    assert_eq!(transform(&raw), Err(FeatureError::InvalidTerm(0.0)));

    let negative = RawApplication {
        loan_amount_term: -12.0,
        ..application()
    };
    assert_eq!(transform(&negative), Err(FeatureError::InvalidTerm(-12.0)));
}

#[test]
fn non_finite_term_is_rejected() {
    let raw = RawApplication {
        loan_amount_term: f64::INFINITY,
        ..application()
    };
    assert!(matches!(transform(&raw), Err(FeatureError::InvalidTerm(_))));
}

#[test]
fn negative_amounts_are_rejected() {
    let raw = RawApplication {
        coapplicant_income: -1.0,
        ..application()
    };
    assert_eq!(
        transform(&raw),
        Err(FeatureError::InvalidAmount {
            field: "coapplicant_income",
            value: -1.0,
        })
    );
}

#[test]
fn overflowing_total_income_is_rejected() {
    let raw = RawApplication {
        applicant_income: f64::MAX,
        coapplicant_income: f64::MAX,
        ..application()
    };

    match transform(&raw) {
        Err(FeatureError::InvalidAmount { field, value }) => {
            assert_eq!(field, "total_income");
            assert_eq!(value, f64::INFINITY);
        }
        other => panic!("expected overflow rejection, got {other:?}"),
    }
}

#[test]
fn subnormal_term_overflowing_emi_is_rejected() {
    let raw = RawApplication {
        loan_amount_term: 1e-310,
        ..application()
    };

    assert!(matches!(
        transform(&raw),
        Err(FeatureError::InvalidAmount { field: "emi", .. })
    ));
}

#[test]
fn emi_overflowing_when_scaled_is_rejected() {
    let raw = RawApplication {
        loan_amount: f64::MAX,
        loan_amount_term: 1.0,
        ..application()
    };

    assert!(matches!(
        transform(&raw),
        Err(FeatureError::InvalidAmount { field: "emi", .. })
    ));
}

#[test]
fn largest_finite_inputs_yield_finite_features() {
    let raw = RawApplication {
        applicant_income: f64::MAX / 2.0,
        coapplicant_income: f64::MAX / 2.0,
        ..application()
    };

    let features = transform(&raw).expect("sum stays finite");
    assert!(features.to_array().iter().all(|value| value.is_finite()));
}

#[test]
fn transform_is_deterministic() {
    let raw = application();
    let first = transform(&raw).expect("valid application");
    let second = transform(&raw).expect("valid application");
    assert_eq!(first, second);
}
