//! Field validation for survey submissions
//!
//! The same rules gate wizard step progression and the server-side save
//! path. Every field is required except phone; phone, when present, must be
//! 10 to 11 digits. State and LGA are checked against the reference mapping.

use crate::error::ValidationErrors;
use crate::models::{
    AgeBracket, Answer, Gender, KnowledgeQuestion, Language, NewResponse, ResponseSubmission,
};
use crate::reference::ReferenceData;
use crate::Result;

const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 11;

/// Phone numbers are optional; a non-empty value must be 10-11 ASCII digits
pub fn is_valid_phone(phone: &str) -> bool {
    phone.is_empty()
        || ((PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&phone.len())
            && phone.chars().all(|c| c.is_ascii_digit()))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Language step
pub fn check_language(draft: &ResponseSubmission, errors: &mut ValidationErrors) {
    if is_blank(&draft.language) {
        errors.add("language", "Language is required");
    } else if Language::parse(&draft.language).is_none() {
        errors.add("language", "Select English or Yoruba");
    }
}

/// Personal information step
pub fn check_personal_info(
    draft: &ResponseSubmission,
    reference: &ReferenceData,
    errors: &mut ValidationErrors,
) {
    if is_blank(&draft.name) {
        errors.add("name", "Full name is required");
    }

    if is_blank(&draft.state) {
        errors.add("state", "State is required");
    } else if !reference.has_state(&draft.state) {
        errors.add("state", format!("Unknown state: {}", draft.state));
    }

    if is_blank(&draft.lga) {
        errors.add("lga", "LGA is required");
    } else if reference.has_state(&draft.state) && !reference.lga_in_state(&draft.state, &draft.lga)
    {
        errors.add(
            "lga",
            format!("{} is not an LGA of {}", draft.lga, draft.state),
        );
    }

    if is_blank(&draft.ward) {
        errors.add("ward", "Ward is required");
    }

    if is_blank(&draft.age) {
        errors.add("age", "Age is required");
    } else if AgeBracket::parse(&draft.age).is_none() {
        errors.add("age", "Select an age bracket");
    }

    if is_blank(&draft.gender) {
        errors.add("gender", "Gender is required");
    } else if Gender::parse(&draft.gender).is_none() {
        errors.add("gender", "Select male or female");
    }
}

/// Knowledge questions step (also carries residence and phone)
pub fn check_knowledge(draft: &ResponseSubmission, errors: &mut ValidationErrors) {
    for question in KnowledgeQuestion::ALL {
        if Answer::parse(submitted_answer(draft, question)).is_none() {
            errors.add(
                question.field(),
                format!("{} response is required", question.subject()),
            );
        }
    }

    if is_blank(&draft.residence) {
        errors.add("residence", "Residential address is required");
    }

    if !is_valid_phone(draft.phone.as_deref().unwrap_or("")) {
        errors.add("phone", "Enter a valid phone number");
    }
}

fn submitted_answer(draft: &ResponseSubmission, question: KnowledgeQuestion) -> &str {
    match question {
        KnowledgeQuestion::KnowsRomeo => &draft.knows_romeo,
        KnowledgeQuestion::KnowsMuyideen => &draft.knows_muyideen,
        KnowledgeQuestion::KnowsAbdulrasheed => &draft.knows_abdulrasheed,
        KnowledgeQuestion::HeardSavewell => &draft.heard_savewell,
    }
}

/// Validate a complete submission, producing a [`NewResponse`]
///
/// All failures are reported together, one entry per offending field.
pub fn validate_submission(
    submission: &ResponseSubmission,
    reference: &ReferenceData,
) -> Result<NewResponse> {
    let mut errors = ValidationErrors::new();
    check_language(submission, &mut errors);
    check_personal_info(submission, reference, &mut errors);
    check_knowledge(submission, &mut errors);
    errors.into_result()?;

    // Every parse below succeeded during the checks above
    let parsed = (|| {
        Some(NewResponse {
            language: Language::parse(&submission.language)?,
            name: submission.name.trim().to_string(),
            state: submission.state.clone(),
            lga: submission.lga.clone(),
            ward: submission.ward.trim().to_string(),
            age: AgeBracket::parse(&submission.age)?,
            gender: Gender::parse(&submission.gender)?,
            knows_romeo: Answer::parse(&submission.knows_romeo)?,
            knows_muyideen: Answer::parse(&submission.knows_muyideen)?,
            knows_abdulrasheed: Answer::parse(&submission.knows_abdulrasheed)?,
            heard_savewell: Answer::parse(&submission.heard_savewell)?,
            residence: submission.residence.trim().to_string(),
            phone: submission.phone.clone().filter(|p| !p.is_empty()),
        })
    })();

    parsed.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add("submission", "Submission could not be parsed");
        errors.into()
    })
}
