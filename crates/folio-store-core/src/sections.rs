//! Typed views of the document's content sections.
//!
//! The store commits the document as-is; nothing here gates a save. These
//! records give the editor boundary a concrete shape per section, and
//! [`audit`] reports where a submitted document disagrees with them so a
//! broken dashboard shows up in the logs instead of silently shipping
//! malformed content.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Landing banner: headline, rotating roles, CV link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub subtitle: String,
    pub title: String,
    pub tagline: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub cv_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub title: String,
    pub description: String,
    pub sub_description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// A skill bar with its proficiency percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub offensive: Vec<Skill>,
    #[serde(default)]
    pub defensive: Vec<Skill>,
}

/// A tool badge: icon class plus label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub icon: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub category: String,
    #[serde(default)]
    pub badge_class: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub link: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub link_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub role: String,
    pub date: String,
    pub company: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub title: String,
    pub subtitle: String,
    pub status: String,
    #[serde(default)]
    pub status_class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeEducation {
    pub name: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeExperience {
    pub role: String,
    pub date: String,
    pub desc: String,
}

/// The printable-resume panel, separate from the page-level sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub name: String,
    pub role: String,
    pub location: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub summary: String,
    #[serde(default)]
    pub skills_list: Vec<String>,
    #[serde(default)]
    pub edu_list: Vec<ResumeEducation>,
    #[serde(default)]
    pub exp_list: Vec<ResumeExperience>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
}

/// A known section: its id in the document and a shape check for its value.
struct SectionCheck {
    id: &'static str,
    check: fn(&Value) -> Result<(), serde_json::Error>,
}

fn check<T: DeserializeOwned>(value: &Value) -> Result<(), serde_json::Error> {
    serde_json::from_value::<T>(value.clone()).map(|_| ())
}

/// Every section the site renders, dispatched by id.
const SECTIONS: &[SectionCheck] = &[
    SectionCheck {
        id: "hero",
        check: check::<Hero>,
    },
    SectionCheck {
        id: "about",
        check: check::<About>,
    },
    SectionCheck {
        id: "skills",
        check: check::<Skills>,
    },
    SectionCheck {
        id: "tools",
        check: check::<Vec<Tool>>,
    },
    SectionCheck {
        id: "projects",
        check: check::<Vec<Project>>,
    },
    SectionCheck {
        id: "experience",
        check: check::<Vec<ExperienceEntry>>,
    },
    SectionCheck {
        id: "education",
        check: check::<Vec<EducationEntry>>,
    },
    SectionCheck {
        id: "resume",
        check: check::<Resume>,
    },
    SectionCheck {
        id: "contact",
        check: check::<Contact>,
    },
];

/// A place where a document disagrees with the known section shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionIssue {
    /// Section id, empty when the document itself is malformed.
    pub section: String,
    pub detail: String,
}

/// Compare a document against the known sections.
///
/// Missing sections are fine (the site renders what exists). Present
/// sections must match their record shape, and unknown top-level keys are
/// reported since the dashboard never produces them.
pub fn audit(document: &Value) -> Vec<SectionIssue> {
    let Some(map) = document.as_object() else {
        return vec![SectionIssue {
            section: String::new(),
            detail: "document is not a JSON object".into(),
        }];
    };

    let mut issues = Vec::new();
    for section in SECTIONS {
        if let Some(value) = map.get(section.id) {
            if let Err(e) = (section.check)(value) {
                issues.push(SectionIssue {
                    section: section.id.to_string(),
                    detail: e.to_string(),
                });
            }
        }
    }
    for key in map.keys() {
        if !SECTIONS.iter().any(|section| section.id == key) {
            issues.push(SectionIssue {
                section: key.clone(),
                detail: "unknown section".into(),
            });
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn well_formed() -> Value {
        json!({
            "hero": {
                "subtitle": "Hi, I am",
                "title": "Jordan Reyes",
                "tagline": "Security engineer",
                "roles": ["Pentester", "Analyst"],
                "cvLink": "assets/cv/cv.pdf"
            },
            "skills": {
                "offensive": [{"name": "Recon", "percent": 80}],
                "defensive": []
            },
            "tools": [{"icon": "fab fa-linux", "name": "Linux"}],
            "contact": {
                "email": "j@example.com",
                "location": "Berlin",
                "linkedin": "https://linkedin.com/in/x",
                "github": "https://github.com/x",
                "twitter": "https://twitter.com/x"
            }
        })
    }

    #[test]
    fn audit_accepts_well_formed_document() {
        assert!(audit(&well_formed()).is_empty());
    }

    #[test]
    fn audit_flags_malformed_section() {
        let mut doc = well_formed();
        doc["skills"] = json!({"offensive": [{"name": "Recon", "percent": "eighty"}]});
        let issues = audit(&doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].section, "skills");
    }

    #[test]
    fn audit_flags_unknown_sections() {
        let mut doc = well_formed();
        doc["blog"] = json!([]);
        let issues = audit(&doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].section, "blog");
        assert_eq!(issues[0].detail, "unknown section");
    }

    #[test]
    fn audit_rejects_non_object_document() {
        let issues = audit(&json!(["not", "an", "object"]));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].section.is_empty());
    }

    #[test]
    fn section_records_use_document_field_names() {
        let hero = Hero {
            subtitle: "s".into(),
            title: "t".into(),
            tagline: "tg".into(),
            roles: vec![],
            cv_link: Some("assets/cv/cv.pdf".into()),
        };
        let value = serde_json::to_value(&hero).unwrap();
        assert!(value.get("cvLink").is_some());
        assert!(value.get("cv_link").is_none());
    }
}
