//! Q-Chat-10 scoring.

pub mod details;
pub mod form;
pub mod questions;

use std::fmt;

use crate::appresult::UserError;

pub use details::ChildDetails;
pub use questions::{QUESTIONS, Question};

pub const QUESTION_COUNT: usize = 10;

/// Scores strictly above this are high risk.
pub const HIGH_RISK_THRESHOLD: u8 = 3;

/// One answer, already reduced to its score contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Zero,
    One,
}

impl Answer {
    pub fn value(self) -> u8 {
        match self {
            Answer::Zero => 0,
            Answer::One => 1,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Answer::Zero),
            1 => Some(Answer::One),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Exactly one answer per question, in question order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseVector([Answer; QUESTION_COUNT]);

impl ResponseVector {
    pub fn from_values(values: &[u8]) -> Result<Self, UserError> {
        if values.len() != QUESTION_COUNT {
            return Err(UserError::validation(format!(
                "Expected {QUESTION_COUNT} answers, got {}.",
                values.len()
            )));
        }

        let mut answers = [Answer::Zero; QUESTION_COUNT];
        for (i, (slot, &value)) in answers.iter_mut().zip(values).enumerate() {
            *slot = Answer::from_value(value).ok_or_else(|| {
                UserError::validation(format!("Question {}: answer must be 0 or 1.", i + 1))
            })?;
        }
        Ok(Self(answers))
    }

    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().map(|answer| answer.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn classify(score: u8) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    /// Verdict shown next to the score.
    pub fn verdict(&self) -> &'static str {
        match self {
            RiskLevel::High => "Potential ASD Traits",
            RiskLevel::Low => "No ASD Traits",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RiskLevel::High => HIGH_RISK_MESSAGE,
            RiskLevel::Low => LOW_RISK_MESSAGE,
        }
    }
}

pub const LOW_RISK_MESSAGE: &str =
    "Score indicates low risk. Your child has a low risk of autism spectrum disorder.";

pub const HIGH_RISK_MESSAGE: &str = "Score indicates high risk. You should bring your child to a health care provider and early intervention provider for a full assessment. For resources in your area, see our website's list of Autism Treatment Network clinics and state-by-state Resource Guide. You can also call or email our Autism Response Team: 888-AUTISM2 (288-4762) or help@autismspeaks.org. The M-CHAT-R is a screening tool, and because no screening tool is perfect, research recommends that the original 20 questions include a Follow-Up Interview. It can be found at: http://www.mchatscreen.com. This questionnaire is designed to screen for autism, not other developmental issues. If you have concerns about any area of your child's development or behavior, please discuss these concerns with your child's doctor.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: u8,
    pub risk: RiskLevel,
    pub responses: ResponseVector,
}

pub fn score(responses: ResponseVector) -> ScoreReport {
    let score = responses.values().sum();
    ScoreReport {
        score,
        risk: RiskLevel::classify(score),
        responses,
    }
}
