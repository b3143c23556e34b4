//! Review submission draft
//!
//! Mirrors the write form: everything is kept as entered until submission,
//! when the draft is validated and normalized into a [`NewReview`].

use nclex_common::models::{EnglishLevel, NewReview, PassStatus};
use nclex_common::parse_months;
use nclex_common::transform::DEFAULT_EXPERIENCE;
use serde::{Deserialize, Serialize};

use crate::SubmitError;

/// Starter text for the review body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTemplate {
    /// Background, study plan by period, test day, advice
    General,
    /// Daily routine while working
    Daily,
}

impl ContentTemplate {
    pub fn text(&self) -> &'static str {
        match self {
            ContentTemplate::General => {
                "### 1. Background\n\
                 (years since graduation, English level, etc.)\n\
                 \n\
                 ### 2. Study plan by period\n\
                 - First month:\n\
                 - Months 2-3:\n\
                 \n\
                 ### 3. Test day\n\
                 \n\
                 ### 4. Advice for future test takers"
            }
            ContentTemplate::Daily => {
                "### Daily routine while working\n\
                 \n\
                 - 07:00 ~ 16:00 : Work\n\
                 - 19:00 ~ 21:00 : Practice questions (50)\n\
                 - 21:00 ~ 22:00 : Review wrong answers"
            }
        }
    }
}

/// Form values of a review being written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub title: String,
    pub author: String,
    pub pass_status: PassStatus,
    /// `YYYY-MM-DD`, or empty when not given
    pub exam_date: String,
    pub experience: String,
    pub english_level: EnglishLevel,
    /// `"yes"` or `"no"`
    pub is_working: String,
    pub study_period: String,
    pub resources: Vec<String>,
    pub content: String,
    pub center_tips: String,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            pass_status: PassStatus::Pass,
            exam_date: String::new(),
            experience: DEFAULT_EXPERIENCE.to_string(),
            english_level: EnglishLevel::Medium,
            is_working: "no".to_string(),
            study_period: String::new(),
            resources: Vec::new(),
            content: String::new(),
            center_tips: String::new(),
        }
    }
}

impl ReviewDraft {
    /// Add the resource if absent, remove it if present
    pub fn toggle_resource(&mut self, resource: &str) {
        if let Some(pos) = self.resources.iter().position(|r| r == resource) {
            self.resources.remove(pos);
        } else {
            self.resources.push(resource.to_string());
        }
    }

    /// Replace the body with a template; any text already written is discarded
    pub fn apply_template(&mut self, template: ContentTemplate) {
        self.content = template.text().to_string();
    }

    /// Title, author and content are all non-blank
    pub fn is_submittable(&self) -> bool {
        [&self.title, &self.author, &self.content]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Build the POST body, deriving the month count from the study period
    pub fn to_new_review(&self) -> Result<NewReview, SubmitError> {
        if !self.is_submittable() {
            return Err(SubmitError::Blocked);
        }

        Ok(NewReview {
            title: self.title.clone(),
            author: self.author.clone(),
            pass_status: self.pass_status,
            exam_date: Some(self.exam_date.clone()).filter(|d| !d.is_empty()),
            study_period: Some(self.study_period.clone()),
            study_period_months: Some(parse_months(&self.study_period)),
            experience: Some(self.experience.clone()),
            english_level: Some(self.english_level),
            is_working: self.is_working == "yes",
            resources: self.resources.clone(),
            content: self.content.clone(),
            center_tips: Some(self.center_tips.clone()).filter(|t| !t.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ReviewDraft {
        ReviewDraft {
            title: "T".to_string(),
            author: "A".to_string(),
            content: "C".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_match_form() {
        let draft = ReviewDraft::default();
        assert_eq!(draft.experience, "New Grad");
        assert_eq!(draft.english_level, EnglishLevel::Medium);
        assert_eq!(draft.is_working, "no");
        assert!(!draft.is_submittable());
    }

    #[test]
    fn test_blank_fields_block() {
        for field in ["title", "author", "content"] {
            let mut draft = filled();
            match field {
                "title" => draft.title = "  ".to_string(),
                "author" => draft.author = String::new(),
                _ => draft.content = "\n\t".to_string(),
            }
            assert!(matches!(draft.to_new_review(), Err(SubmitError::Blocked)));
        }
    }

    #[test]
    fn test_body_normalization() {
        let mut draft = filled();
        draft.study_period = "6 months".to_string();
        draft.is_working = "yes".to_string();

        let body = draft.to_new_review().unwrap();
        assert_eq!(body.study_period_months, Some(6));
        assert!(body.is_working);
        assert_eq!(body.study_period.as_deref(), Some("6 months"));
        assert_eq!(body.exam_date, None);
        assert_eq!(body.center_tips, None);
        assert_eq!(body.english_level, Some(EnglishLevel::Medium));
    }

    #[test]
    fn test_post_body_wire_shape() {
        let mut draft = filled();
        draft.study_period = "1 year".to_string();
        let json = serde_json::to_value(draft.to_new_review().unwrap()).unwrap();

        assert_eq!(json["study_period_months"], 12);
        assert_eq!(json["pass_status"], "Pass");
        assert_eq!(json["english_level"], "Medium");
        assert_eq!(json["is_working"], false);
        assert_eq!(json["resources"], serde_json::json!([]));
    }

    #[test]
    fn test_apply_template_replaces_content() {
        let mut draft = filled();
        draft.apply_template(ContentTemplate::Daily);
        assert!(draft.content.starts_with("### Daily routine while working\n\n- 07:00"));
        assert_eq!(draft.content.lines().count(), 5);

        draft.apply_template(ContentTemplate::General);
        assert!(draft.content.starts_with("### 1. Background\n"));
        assert!(draft.content.ends_with("### 4. Advice for future test takers"));
        assert!(draft.content.contains("\n\n### 3. Test day\n\n"));
        assert!(draft.is_submittable());
    }

    #[test]
    fn test_toggle_resource() {
        let mut draft = ReviewDraft::default();
        draft.toggle_resource("UWorld");
        draft.toggle_resource("Archer");
        assert_eq!(draft.resources, vec!["UWorld", "Archer"]);

        draft.toggle_resource("UWorld");
        assert_eq!(draft.resources, vec!["Archer"]);
    }
}
