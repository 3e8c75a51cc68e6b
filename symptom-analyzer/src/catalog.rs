//! Static questionnaire and reference-image catalogs.
//!
//! The ids and answer strings below are the contract with the frontend: the
//! rule-based analyzer matches on them exactly.

use std::sync::OnceLock;

use serde::Serialize;

use crate::types::ReferenceImageTag;

pub const DISCHARGE_FIELD: &str = "unusual_discharge";
pub const SORES_FIELD: &str = "sores_or_bumps";
pub const PAIN_FIELD: &str = "pain_symptoms";
pub const FLU_LIKE_FIELD: &str = "flu_like_symptoms";
pub const LAST_TESTED_FIELD: &str = "last_tested";

pub const YES: &str = "Yes";
pub const NO: &str = "No";
pub const NOT_SURE: &str = "Not sure";
pub const NEVER_TESTED: &str = "Never tested";
/// First option a user picks to say "nothing from this list".
pub const NONE_OF_THESE: &str = "None of these";

/// Answers that count as reporting a symptom wherever they appear.
pub const POSITIVE_ANSWERS: &[&str] = &[YES];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    YesNo,
    Text,
    Conditional,
}

/// Which earlier answer reveals a conditional question.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowIf {
    pub question_id: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: &'static str,
    pub question: &'static str,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive_message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
}

impl Question {
    fn new(
        id: &'static str,
        question: &'static str,
        kind: QuestionType,
        options: &[&'static str],
    ) -> Self {
        Self {
            id,
            question,
            kind,
            options: options.to_vec(),
            multi_select: None,
            sensitive: None,
            sensitive_message: None,
            show_if: None,
        }
    }

    fn multi_select(mut self) -> Self {
        self.multi_select = Some(true);
        self
    }

    fn sensitive(mut self, message: &'static str) -> Self {
        self.sensitive = Some(true);
        self.sensitive_message = Some(message);
        self
    }

    fn shown_if(mut self, question_id: &'static str, answer: &'static str) -> Self {
        self.show_if = Some(ShowIf {
            question_id,
            answer,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    Condition,
    Texture,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceImage {
    pub id: ReferenceImageTag,
    pub label: &'static str,
    pub description: &'static str,
    pub category: ImageCategory,
    pub image_url: &'static str,
}

/// The questionnaire, in display order.
pub fn questions() -> &'static [Question] {
    static QUESTIONS: OnceLock<Vec<Question>> = OnceLock::new();
    QUESTIONS.get_or_init(build_questions)
}

/// Reference pictures, one per [`ReferenceImageTag`].
pub fn reference_images() -> &'static [ReferenceImage] {
    static IMAGES: OnceLock<Vec<ReferenceImage>> = OnceLock::new();
    IMAGES.get_or_init(build_reference_images)
}

fn build_questions() -> Vec<Question> {
    use QuestionType::*;

    vec![
        Question::new(
            "age_range",
            "What is your age range?",
            MultipleChoice,
            &["Under 18", "18-24", "25-34", "35-44", "45 or older"],
        ),
        Question::new(
            "sexually_active",
            "Have you been sexually active in the last 6 months?",
            YesNo,
            &[YES, NO],
        )
        .sensitive("Your answers are anonymous and are never linked to you."),
        Question::new(
            DISCHARGE_FIELD,
            "Have you noticed any unusual discharge?",
            YesNo,
            &[YES, NO, NOT_SURE],
        ),
        Question::new(
            SORES_FIELD,
            "Have you noticed any sores, bumps, blisters or warts in the genital or anal area?",
            YesNo,
            &[YES, NO, NOT_SURE],
        ),
        Question::new(
            "sores_appearance",
            "If you have seen sores or bumps, you can compare them with reference pictures on the next screen.",
            Conditional,
            &["Show me reference pictures", "Skip"],
        )
        .shown_if(SORES_FIELD, YES)
        .sensitive("Reference pictures show close-up skin conditions."),
        Question::new(
            PAIN_FIELD,
            "Are you experiencing any of the following?",
            MultipleChoice,
            &[
                "Pain or burning when urinating",
                "Pain during sex",
                "Pelvic or lower abdominal pain",
                "Testicular pain or swelling",
                "Itching or irritation",
                NONE_OF_THESE,
            ],
        )
        .multi_select(),
        Question::new(
            FLU_LIKE_FIELD,
            "Have you had any of these flu-like symptoms recently?",
            MultipleChoice,
            &["Fever", "Swollen glands", "Body aches", "Unusual tiredness", NONE_OF_THESE],
        )
        .multi_select(),
        Question::new(
            "symptom_duration",
            "How long have you noticed these changes?",
            MultipleChoice,
            &[
                "Less than a week",
                "1-4 weeks",
                "More than a month",
                "I have not noticed any changes",
            ],
        ),
        Question::new(
            "new_partner",
            "Have you had a new sexual partner in the last 3 months?",
            YesNo,
            &[YES, NO, "Prefer not to say"],
        )
        .sensitive("There is no judgement here. This only helps tailor the guidance."),
        Question::new(
            "protection_use",
            "How often do you use condoms or other barrier protection?",
            MultipleChoice,
            &["Always", "Sometimes", "Rarely", "Never"],
        ),
        Question::new(
            LAST_TESTED_FIELD,
            "When were you last tested for STIs?",
            MultipleChoice,
            &[
                "Within the last 3 months",
                "3-12 months ago",
                "More than a year ago",
                NEVER_TESTED,
            ],
        ),
        Question::new(
            "additional_details",
            "Is there anything else you would like to mention?",
            Text,
            &[],
        ),
    ]
}

fn build_reference_images() -> Vec<ReferenceImage> {
    use ImageCategory::*;
    use ReferenceImageTag as Tag;

    vec![
        ReferenceImage {
            id: Tag::Herpes,
            label: "Small blisters or sores",
            description: "Clusters of small fluid-filled blisters that may burst and leave painful sores.",
            category: Condition,
            image_url: "/images/reference/herpes.jpg",
        },
        ReferenceImage {
            id: Tag::Warts,
            label: "Flesh-coloured bumps",
            description: "Small, painless bumps, flat or cauliflower-shaped, alone or in groups.",
            category: Condition,
            image_url: "/images/reference/warts.jpg",
        },
        ReferenceImage {
            id: Tag::Yeast,
            label: "Redness with white patches",
            description: "Red, itchy skin, sometimes with white patches or thick white discharge.",
            category: Condition,
            image_url: "/images/reference/yeast.jpg",
        },
        ReferenceImage {
            id: Tag::Scabies,
            label: "Tiny itchy bumps or lines",
            description: "Very itchy small bumps or thin raised lines, often worse at night.",
            category: Condition,
            image_url: "/images/reference/scabies.jpg",
        },
        ReferenceImage {
            id: Tag::Ulcer,
            label: "Open sore",
            description: "A single firm, round open sore, which may or may not hurt.",
            category: Condition,
            image_url: "/images/reference/ulcer.jpg",
        },
        ReferenceImage {
            id: Tag::Clear,
            label: "Clear skin",
            description: "No visible changes.",
            category: Texture,
            image_url: "/images/reference/clear.jpg",
        },
        ReferenceImage {
            id: Tag::Acne,
            label: "Pimple-like spots",
            description: "Spots similar to acne or ingrown hairs.",
            category: Texture,
            image_url: "/images/reference/acne.jpg",
        },
        ReferenceImage {
            id: Tag::Patchy,
            label: "Patchy skin",
            description: "Areas of uneven colour or texture.",
            category: Texture,
            image_url: "/images/reference/patchy.jpg",
        },
        ReferenceImage {
            id: Tag::Rash,
            label: "Rash",
            description: "A spread of red or discoloured skin.",
            category: Texture,
            image_url: "/images/reference/rash.jpg",
        },
        ReferenceImage {
            id: Tag::Blisters,
            label: "Blisters",
            description: "Raised bubbles of skin filled with fluid.",
            category: Texture,
            image_url: "/images/reference/blisters.jpg",
        },
        ReferenceImage {
            id: Tag::Dry,
            label: "Dry or flaky skin",
            description: "Dry, cracked or flaking skin.",
            category: Texture,
            image_url: "/images/reference/dry.jpg",
        },
    ]
}
