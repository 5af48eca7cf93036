//! Survey builders shared by unit tests across the crate.

use super::{QuestionContent, Study, Survey, SurveyQuestion};
use crate::domain::foundation::{QuestionId, StudyId, SurveyId, Timestamp};

pub(crate) fn survey_with(id: i64, questions: Vec<SurveyQuestion>) -> Survey {
    let now = Timestamp::now();
    Survey {
        id: SurveyId::new(id),
        name: format!("Survey {}", id),
        created_at: now,
        updated_at: now,
        show_on_map: true,
        show_on_stops: true,
        start_date: None,
        end_date: None,
        visible_stops_list: None,
        visible_routes_list: None,
        allows_multiple_responses: false,
        allows_visible: true,
        study: Study {
            id: StudyId::new(1),
            name: "Rider Experience".into(),
            description: None,
        },
        questions,
    }
}

pub(crate) fn label_question(id: i64, position: i32) -> SurveyQuestion {
    SurveyQuestion {
        id: QuestionId::new(id),
        position,
        required: false,
        content: QuestionContent::Label {
            label_text: "Thanks for riding!".into(),
        },
    }
}

pub(crate) fn text_question(id: i64, position: i32) -> SurveyQuestion {
    SurveyQuestion {
        id: QuestionId::new(id),
        position,
        required: true,
        content: QuestionContent::Text {
            label_text: format!("Question {}", id),
        },
    }
}

pub(crate) fn radio_question(id: i64, position: i32, options: &[&str]) -> SurveyQuestion {
    SurveyQuestion {
        id: QuestionId::new(id),
        position,
        required: true,
        content: QuestionContent::Radio {
            label_text: format!("Question {}", id),
            options: options.iter().map(|o| o.to_string()).collect(),
        },
    }
}

pub(crate) fn external_question(
    id: i64,
    position: i32,
    url: Option<&str>,
    fields: &[&str],
) -> SurveyQuestion {
    SurveyQuestion {
        id: QuestionId::new(id),
        position,
        required: true,
        content: QuestionContent::ExternalSurvey {
            label_text: "Take our longer survey".into(),
            url: url.map(str::to_string),
            survey_provider: Some("qualtrics".into()),
            embedded_data_fields: fields.iter().map(|f| f.to_string()).collect(),
        },
    }
}
