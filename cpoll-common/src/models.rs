//! Response models
//!
//! Three shapes of the same survey response:
//! - [`ResponseSubmission`]: raw JSON posted by the intake form (camelCase,
//!   snake_case accepted), every field still a string
//! - [`NewResponse`]: a validated submission with closed value sets enforced
//! - [`ResponseRecord`]: a stored record as read back from a backend; plain
//!   strings, never re-validated

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Preferred survey language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Yoruba,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Yoruba];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Yoruba => "Yoruba",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == value)
    }
}

/// Respondent age bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "<18 years")]
    Under18,
    #[serde(rename = "18 - 24 years")]
    From18To24,
    #[serde(rename = "25 - 34 years")]
    From25To34,
    #[serde(rename = "35 - 49 years")]
    From35To49,
    #[serde(rename = "50+ years")]
    Over50,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 5] = [
        AgeBracket::Under18,
        AgeBracket::From18To24,
        AgeBracket::From25To34,
        AgeBracket::From35To49,
        AgeBracket::Over50,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::Under18 => "<18 years",
            AgeBracket::From18To24 => "18 - 24 years",
            AgeBracket::From25To34 => "25 - 34 years",
            AgeBracket::From35To49 => "35 - 49 years",
            AgeBracket::Over50 => "50+ years",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == value)
    }
}

/// Yes/No answer to a knowledge question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Yes" => Some(Answer::Yes),
            "No" => Some(Answer::No),
            _ => None,
        }
    }
}

/// The four knowledge questions, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnowledgeQuestion {
    KnowsRomeo,
    KnowsMuyideen,
    KnowsAbdulrasheed,
    HeardSavewell,
}

impl KnowledgeQuestion {
    pub const ALL: [KnowledgeQuestion; 4] = [
        KnowledgeQuestion::KnowsRomeo,
        KnowledgeQuestion::KnowsMuyideen,
        KnowledgeQuestion::KnowsAbdulrasheed,
        KnowledgeQuestion::HeardSavewell,
    ];

    /// Stored field name
    pub fn field(&self) -> &'static str {
        match self {
            KnowledgeQuestion::KnowsRomeo => "knows_romeo",
            KnowledgeQuestion::KnowsMuyideen => "knows_muyideen",
            KnowledgeQuestion::KnowsAbdulrasheed => "knows_abdulrasheed",
            KnowledgeQuestion::HeardSavewell => "heard_savewell",
        }
    }

    /// Who or what the respondent is asked about
    pub fn subject(&self) -> &'static str {
        match self {
            KnowledgeQuestion::KnowsRomeo => "Romeo",
            KnowledgeQuestion::KnowsMuyideen => "Dr. Muyideen",
            KnowledgeQuestion::KnowsAbdulrasheed => "Dr. Abdulrasheed",
            KnowledgeQuestion::HeardSavewell => "Savewell Homes",
        }
    }

    /// Column / chart label
    pub fn label(&self) -> &'static str {
        match self {
            KnowledgeQuestion::KnowsRomeo => "Knows Romeo",
            KnowledgeQuestion::KnowsMuyideen => "Knows Muyideen",
            KnowledgeQuestion::KnowsAbdulrasheed => "Knows Abdulrasheed",
            KnowledgeQuestion::HeardSavewell => "Heard Savewell",
        }
    }
}

/// Raw submission as posted by the intake form
///
/// Nothing is checked at deserialization time; see
/// [`crate::validation::validate_submission`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseSubmission {
    pub language: String,
    pub name: String,
    pub state: String,
    pub lga: String,
    pub ward: String,
    pub age: String,
    pub gender: String,
    #[serde(alias = "knows_romeo")]
    pub knows_romeo: String,
    #[serde(alias = "knows_muyideen")]
    pub knows_muyideen: String,
    #[serde(alias = "knows_abdulrasheed")]
    pub knows_abdulrasheed: String,
    #[serde(alias = "heard_savewell")]
    pub heard_savewell: String,
    pub residence: String,
    pub phone: Option<String>,
}

/// Validated response, ready to append to a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
    pub language: Language,
    pub name: String,
    pub state: String,
    pub lga: String,
    pub ward: String,
    pub age: AgeBracket,
    pub gender: Gender,
    pub knows_romeo: Answer,
    pub knows_muyideen: Answer,
    pub knows_abdulrasheed: Answer,
    pub heard_savewell: Answer,
    pub residence: String,
    /// None when the respondent left the phone field empty
    pub phone: Option<String>,
}

impl NewResponse {
    pub fn answer(&self, question: KnowledgeQuestion) -> Answer {
        match question {
            KnowledgeQuestion::KnowsRomeo => self.knows_romeo,
            KnowledgeQuestion::KnowsMuyideen => self.knows_muyideen,
            KnowledgeQuestion::KnowsAbdulrasheed => self.knows_abdulrasheed,
            KnowledgeQuestion::HeardSavewell => self.heard_savewell,
        }
    }

    /// Build the stored form with backend-assigned identity
    pub fn to_record(&self, id: Option<i64>, created_at: DateTime<Utc>) -> ResponseRecord {
        ResponseRecord {
            id,
            created_at: Some(created_at),
            language: self.language.as_str().to_string(),
            name: self.name.clone(),
            state: self.state.clone(),
            lga: self.lga.clone(),
            ward: self.ward.clone(),
            age: self.age.as_str().to_string(),
            gender: self.gender.as_str().to_string(),
            knows_romeo: self.knows_romeo.as_str().to_string(),
            knows_muyideen: self.knows_muyideen.as_str().to_string(),
            knows_abdulrasheed: self.knows_abdulrasheed.as_str().to_string(),
            heard_savewell: self.heard_savewell.as_str().to_string(),
            residence: self.residence.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// One stored survey response
///
/// camelCase aliases let the development backend read lines written by
/// earlier form versions, which stored the raw submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    pub language: String,
    pub name: String,
    pub state: String,
    pub lga: String,
    pub ward: String,
    pub age: String,
    pub gender: String,
    #[serde(alias = "knowsRomeo")]
    pub knows_romeo: String,
    #[serde(alias = "knowsMuyideen")]
    pub knows_muyideen: String,
    #[serde(alias = "knowsAbdulrasheed")]
    pub knows_abdulrasheed: String,
    #[serde(alias = "heardSavewell")]
    pub heard_savewell: String,
    pub residence: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ResponseRecord {
    /// Stored answer text for a knowledge question
    pub fn answer(&self, question: KnowledgeQuestion) -> &str {
        match question {
            KnowledgeQuestion::KnowsRomeo => &self.knows_romeo,
            KnowledgeQuestion::KnowsMuyideen => &self.knows_muyideen,
            KnowledgeQuestion::KnowsAbdulrasheed => &self.knows_abdulrasheed,
            KnowledgeQuestion::HeardSavewell => &self.heard_savewell,
        }
    }

    /// Same answers as `other`, ignoring backend-assigned id and timestamp
    pub fn same_content(&self, other: &ResponseRecord) -> bool {
        let strip = |r: &ResponseRecord| ResponseRecord {
            id: None,
            created_at: None,
            ..r.clone()
        };
        strip(self) == strip(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_accepts_camel_and_snake_case() {
        let camel: ResponseSubmission = serde_json::from_str(
            r#"{"knowsRomeo":"Yes","heardSavewell":"No","name":"Ada"}"#,
        )
        .unwrap();
        let snake: ResponseSubmission = serde_json::from_str(
            r#"{"knows_romeo":"Yes","heard_savewell":"No","name":"Ada"}"#,
        )
        .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.knows_romeo, "Yes");
        assert_eq!(camel.phone, None);
    }

    #[test]
    fn test_record_reads_legacy_camel_case_line() {
        let line = r#"{"language":"English","name":"Ada","state":"Osun","lga":"Iwo","ward":"Ward 3","age":"25 - 34 years","gender":"female","knowsRomeo":"Yes","knowsMuyideen":"No","knowsAbdulrasheed":"Yes","heardSavewell":"No","residence":"12 Main St","phone":""}"#;
        let record: ResponseRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.created_at, None);
        assert_eq!(record.knows_abdulrasheed, "Yes");
        assert_eq!(record.phone.as_deref(), Some(""));
    }

    #[test]
    fn test_record_serializes_snake_case_without_absent_id() {
        let new = NewResponse {
            language: Language::English,
            name: "Ada".to_string(),
            state: "Osun".to_string(),
            lga: "Iwo".to_string(),
            ward: "Ward 3".to_string(),
            age: AgeBracket::Over50,
            gender: Gender::Male,
            knows_romeo: Answer::Yes,
            knows_muyideen: Answer::No,
            knows_abdulrasheed: Answer::No,
            heard_savewell: Answer::Yes,
            residence: "1 Oja Rd".to_string(),
            phone: None,
        };
        let value = serde_json::to_value(new.to_record(None, Utc::now())).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["age"], "50+ years");
        assert_eq!(value["knows_romeo"], "Yes");
        assert_eq!(value["heard_savewell"], "Yes");
    }

    #[test]
    fn test_enum_parse_rejects_unknown_values() {
        assert_eq!(AgeBracket::parse("35 - 49 years"), Some(AgeBracket::From35To49));
        assert_eq!(AgeBracket::parse("35-49"), None);
        assert_eq!(Gender::parse("Male"), None);
        assert_eq!(Answer::parse("yes"), None);
        assert_eq!(Language::parse("Yoruba"), Some(Language::Yoruba));
    }
}
