//! Optional background details about the child. Collected with the
//! questionnaire and echoed in the report; they never change the score.

use std::{collections::HashMap, fmt, ops::RangeInclusive};

use crate::appresult::UserError;

pub const AGE_MONTHS: RangeInclusive<u8> = 18..=48;

/// A closed set of options rendered as a `<select>`.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn key(&self) -> &'static str;
    fn label(&self) -> &'static str;

    fn parse_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| choice.key() == key)
    }
}

macro_rules! choice {
    ($name:ident { $($variant:ident => ($key:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice!(Sex {
    Male => ("male", "Male"),
    Female => ("female", "Female"),
    Other => ("other", "Other"),
});

choice!(Ethnicity {
    Melayu => ("melayu", "Melayu"),
    Cina => ("cina", "Cina"),
    India => ("india", "India"),
    OrangAsli => ("orang_asli", "Orang Asli"),
    BumiputeraSabah => ("bumiputera_sabah", "Bumiputera Sabah"),
    BumiputeraSarawak => ("bumiputera_sarawak", "Bumiputera Sarawak"),
});

choice!(YesNo {
    Yes => ("yes", "Yes"),
    No => ("no", "No"),
});

choice!(CompletedBy {
    FamilyMember => ("family_member", "Family Member"),
    Myself => ("self", "Self"),
    HealthCareProfessional => ("health_care_professional", "Health Care Professional"),
    SchoolAndNgo => ("school_and_ngo", "School and NGO"),
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDetails {
    pub age_months: u8,
    pub sex: Sex,
    pub ethnicity: Ethnicity,
    pub jaundice: YesNo,
    pub family_asd: YesNo,
    pub completed_by: CompletedBy,
}

pub const DETAIL_FIELDS: [&str; 6] =
    ["age_months", "sex", "ethnicity", "jaundice", "family_asd", "completed_by"];

impl ChildDetails {
    /// Reads the details from submitted form fields. `None` if the form
    /// carries none of them; an error if it carries some but not all, or any
    /// is out of range.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Option<Self>, UserError> {
        if DETAIL_FIELDS.iter().all(|key| fields.get(*key).is_none_or(|v| v.is_empty())) {
            return Ok(None);
        }

        let age_months = field(fields, "age_months", "Age")?
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|age| AGE_MONTHS.contains(age))
            .ok_or_else(|| {
                UserError::validation(format!(
                    "Age must be between {} and {} months.",
                    AGE_MONTHS.start(),
                    AGE_MONTHS.end()
                ))
            })?;

        Ok(Some(ChildDetails {
            age_months,
            sex: pick(fields, "sex", "Sex")?,
            ethnicity: pick(fields, "ethnicity", "Ethnicity")?,
            jaundice: pick(fields, "jaundice", "Jaundice")?,
            family_asd: pick(fields, "family_asd", "Family member with ASD")?,
            completed_by: pick(fields, "completed_by", "Who completed the test")?,
        }))
    }

    /// Label/value pairs in display order.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Age (months)", self.age_months.to_string()),
            ("Sex", self.sex.to_string()),
            ("Ethnicity", self.ethnicity.to_string()),
            ("Jaundice", self.jaundice.to_string()),
            ("Family member with ASD", self.family_asd.to_string()),
            ("Completed by", self.completed_by.to_string()),
        ]
    }

    /// Form fields that reproduce these details.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("age_months", self.age_months.to_string()),
            ("sex", self.sex.key().to_owned()),
            ("ethnicity", self.ethnicity.key().to_owned()),
            ("jaundice", self.jaundice.key().to_owned()),
            ("family_asd", self.family_asd.key().to_owned()),
            ("completed_by", self.completed_by.key().to_owned()),
        ]
    }
}

fn field<'a>(fields: &'a HashMap<String, String>, key: &str, label: &str) -> Result<&'a str, UserError> {
    fields
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| UserError::validation(format!("{label} is required.")))
}

fn pick<C: Choice>(fields: &HashMap<String, String>, key: &str, label: &str) -> Result<C, UserError> {
    C::parse_key(field(fields, key, label)?)
        .ok_or_else(|| UserError::validation(format!("{label}: unknown option.")))
}
