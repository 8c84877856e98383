//! Prediction page: questionnaire, result view and report download.

use std::collections::HashMap;

use axum::{
    Form, Router, debug_handler,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    AppResult, AppState,
    appresult::UserError,
    auth, include_res,
    nav::Page,
    report::{self, REPORT_FILENAME, Subject},
    res::{self, escape},
    session::SessionState,
};

use super::{
    ChildDetails, QUESTION_COUNT, QUESTIONS, ResponseVector, RiskLevel, ScoreReport,
    details::{AGE_MONTHS, Choice, CompletedBy, Ethnicity, Sex, YesNo},
    score,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .route("/predict/report", post(download_report))
}

/// A validated questionnaire submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub responses: ResponseVector,
    pub details: Option<ChildDetails>,
}

impl Submission {
    /// Reads `q1`..`q10` plus the optional child details.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, UserError> {
        let values = (1..=QUESTION_COUNT)
            .map(|i| {
                fields
                    .get(&format!("q{i}"))
                    .and_then(|v| v.trim().parse::<u8>().ok())
                    .ok_or_else(|| UserError::validation(format!("Question {i}: please answer 0 or 1.")))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Ok(Submission {
            responses: ResponseVector::from_values(&values)?,
            details: ChildDetails::from_form(fields)?,
        })
    }

    /// Hidden inputs that resubmit this exact submission.
    fn hidden_fields(&self) -> String {
        let answers = self
            .responses
            .values()
            .enumerate()
            .map(|(i, value)| (format!("q{}", i + 1), value.to_string()));
        let details = self
            .details
            .iter()
            .flat_map(ChildDetails::form_fields)
            .map(|(key, value)| (key.to_owned(), value));

        answers
            .chain(details)
            .map(|(key, value)| format!(r#"<input type="hidden" name="{key}" value="{}">"#, escape(&value)))
            .collect()
    }
}

fn options<C: Choice>() -> String {
    C::ALL
        .iter()
        .map(|choice| format!(r#"<option value="{}">{}</option>"#, choice.key(), choice.label()))
        .collect()
}

pub(crate) fn questionnaire() -> String {
    let questions: String = QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, question)| {
            res::fill(include_res!(str, "/pages/question.html"), &[
                ("number", &(i + 1).to_string()),
                ("text", &escape(question.text)),
                ("translation", &escape(question.translation)),
                ("scale", &escape(question.scale)),
            ])
        })
        .collect();

    let yes_no = options::<YesNo>();
    res::fill(include_res!(str, "/pages/prediction.html"), &[
        ("questions", &questions),
        ("age_min", &AGE_MONTHS.start().to_string()),
        ("age_max", &AGE_MONTHS.end().to_string()),
        ("sex", &options::<Sex>()),
        ("ethnicity", &options::<Ethnicity>()),
        ("jaundice", &yes_no),
        ("family_asd", &yes_no),
        ("completed_by", &options::<CompletedBy>()),
    ])
}

fn result(report: &ScoreReport, submission: &Submission) -> String {
    let responses: String = report
        .responses
        .values()
        .enumerate()
        .map(|(i, value)| format!("<li><em>Question {}:</em> {value}</li>", i + 1))
        .collect();

    let details = match &submission.details {
        Some(details) => {
            let items: String = details
                .lines()
                .into_iter()
                .map(|(label, value)| format!("<li><em>{label}:</em> {}</li>", escape(&value)))
                .collect();
            format!("<h3>Additional Information:</h3><ul>{items}</ul>")
        }
        None => String::new(),
    };

    let risk = match report.risk {
        RiskLevel::High => "high",
        RiskLevel::Low => "low",
    };
    res::fill(include_res!(str, "/pages/prediction_result.html"), &[
        ("risk", risk),
        ("verdict", report.risk.verdict()),
        ("score", &report.score.to_string()),
        ("responses", &responses),
        ("details", &details),
        ("message", &escape(report.risk.message())),
        ("hidden", &submission.hidden_fields()),
    ])
}

fn rejected(state: &SessionState, err: UserError) -> Response {
    res::layout(state, Page::Prediction, &[err.into()], &questionnaire()).into_response()
}

#[debug_handler(state = AppState)]
pub(crate) async fn predict(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(fields): Form<HashMap<String, String>>,
) -> AppResult<Response> {
    let state = SessionState::load(&session, &db_pool).await?;
    let identity = match auth::require_login(&state) {
        Ok(identity) => identity,
        Err(redirect) => return Ok(redirect),
    };

    let submission = match Submission::from_form(&fields) {
        Ok(submission) => submission,
        Err(err) => return Ok(rejected(&state, err)),
    };

    let report = score(submission.responses);
    tracing::info!(
        username = %identity.username,
        score = report.score,
        verdict = report.risk.verdict(),
        "scored questionnaire"
    );

    let flash = res::Flash::success(format!("Prediction Result: {}", report.risk.verdict()));
    Ok(res::layout(&state, Page::Prediction, &[flash], &result(&report, &submission)).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn download_report(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(fields): Form<HashMap<String, String>>,
) -> AppResult<Response> {
    let state = SessionState::load(&session, &db_pool).await?;
    let identity = match auth::require_login(&state) {
        Ok(identity) => identity,
        Err(redirect) => return Ok(redirect),
    };

    let submission = match Submission::from_form(&fields) {
        Ok(submission) => submission,
        Err(err) => return Ok(rejected(&state, err)),
    };

    let report = score(submission.responses);
    let subject = Subject {
        name: identity.username.clone(),
        details: submission.details,
    };
    let pdf = report::render_pdf(&report, &subject);
    tracing::info!(username = %subject.name, bytes = pdf.len(), "rendered report");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (header::CONTENT_DISPOSITION, format!(r#"attachment; filename="{REPORT_FILENAME}""#)),
        ],
        pdf,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(answers: [&str; QUESTION_COUNT]) -> HashMap<String, String> {
        answers
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("q{}", i + 1), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_answers_in_question_order() {
        let submission = Submission::from_form(&fields(["1", "0", "0", "0", "0", "0", "0", "0", "0", "1"])).unwrap();
        let values: Vec<u8> = submission.responses.values().collect();
        assert_eq!(values, vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(submission.details, None);
    }

    #[test]
    fn missing_or_bad_answers_are_rejected() {
        let mut form = fields(["0"; QUESTION_COUNT]);
        form.remove("q7");
        assert_eq!(
            Submission::from_form(&form).unwrap_err(),
            UserError::validation("Question 7: please answer 0 or 1.")
        );

        let form = fields(["0", "0", "0", "0", "5", "0", "0", "0", "0", "0"]);
        assert_eq!(
            Submission::from_form(&form).unwrap_err(),
            UserError::validation("Question 5: answer must be 0 or 1.")
        );
    }

    #[test]
    fn hidden_fields_resubmit_the_same_answers() {
        let mut form = fields(["1", "1", "0", "1", "0", "1", "0", "0", "0", "1"]);
        for (key, value) in [
            ("age_months", "36"),
            ("sex", "other"),
            ("ethnicity", "india"),
            ("jaundice", "yes"),
            ("family_asd", "no"),
            ("completed_by", "school_and_ngo"),
        ] {
            form.insert(key.to_owned(), value.to_owned());
        }
        let submission = Submission::from_form(&form).unwrap();
        let html = submission.hidden_fields();

        assert!(html.contains(r#"name="q1" value="1""#));
        assert!(html.contains(r#"name="q3" value="0""#));
        assert!(html.contains(r#"name="completed_by" value="school_and_ngo""#));
        assert_eq!(html.matches("<input").count(), QUESTION_COUNT + 6);
    }

    #[test]
    fn questionnaire_lists_every_question() {
        let html = questionnaire();
        for i in 1..=QUESTION_COUNT {
            assert!(html.contains(&format!(r#"name="q{i}""#)));
        }
        assert!(html.contains(r#"<option value="orang_asli">Orang Asli</option>"#));
        assert!(html.contains(r#"min="18" max="48""#));
    }
}
