use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Workflow state of a job posting. Lowercase on the wire, case-insensitive on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Viewed,
    Shortlisted,
    Longlisted,
    Applied,
    Archived,
}

impl Status {
    /// Selector order, as the dashboard has always offered it.
    pub const ALL: [Status; 6] = [
        Status::Viewed,
        Status::New,
        Status::Shortlisted,
        Status::Longlisted,
        Status::Applied,
        Status::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Viewed => "viewed",
            Status::Shortlisted => "shortlisted",
            Status::Longlisted => "longlisted",
            Status::Applied => "applied",
            Status::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Viewed => "Viewed",
            Status::Shortlisted => "Shortlisted",
            Status::Longlisted => "Longlisted",
            Status::Applied => "Applied",
            Status::Archived => "Archived",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        let lower = s.trim().to_lowercase();
        Status::ALL.into_iter().find(|st| st.as_str() == lower)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::parse(s).ok_or_else(|| {
            format!(
                "unknown status '{}' (expected one of: new, viewed, shortlisted, longlisted, applied, archived)",
                s
            )
        })
    }
}

/// Named fields of a job record. Outside this module fields are addressed by
/// variant; `wire_name` must agree with the serde renames on [`JobRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Filename,
    Status,
    LastModTime,
    JobTitle,
    GermanRequired,
    TechJob,
    Seniority,
    Company,
    Location,
    RequiredSkills,
    PreferredSkills,
    Immatrikulation,
    OtherRequirements,
    Category,
    JobUrl,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Filename,
        Field::Status,
        Field::LastModTime,
        Field::JobTitle,
        Field::GermanRequired,
        Field::TechJob,
        Field::Seniority,
        Field::Company,
        Field::Location,
        Field::RequiredSkills,
        Field::PreferredSkills,
        Field::Immatrikulation,
        Field::OtherRequirements,
        Field::Category,
        Field::JobUrl,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            Field::Filename => "Filename",
            Field::Status => "status",
            Field::LastModTime => "last_mod_time",
            Field::JobTitle => "Job title",
            Field::GermanRequired => "German language fluency required",
            Field::TechJob => "Is tech job",
            Field::Seniority => "Role seniority",
            Field::Company => "Company name",
            Field::Location => "Location",
            Field::RequiredSkills => "Required technical skills",
            Field::PreferredSkills => "Preferred technical skills",
            Field::Immatrikulation => "Immatrikulation required",
            Field::OtherRequirements => "Other requirements",
            Field::Category => "Job category",
            Field::JobUrl => "Job URL",
        }
    }
}

/// One job posting as served by `GET /api/jobs`.
///
/// The backend serialises a dataframe, so cells can arrive as strings, numbers
/// or booleans. Everything except the filename is read leniently into text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(rename = "last_mod_time", default, deserialize_with = "lenient_text")]
    pub last_mod_time: Option<String>,
    #[serde(rename = "Job title", default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(rename = "German language fluency required", default, deserialize_with = "lenient_text")]
    pub german_required: Option<String>,
    #[serde(rename = "Is tech job", default, deserialize_with = "lenient_text")]
    pub tech_job: Option<String>,
    #[serde(rename = "Role seniority", default, deserialize_with = "lenient_text")]
    pub seniority: Option<String>,
    #[serde(rename = "Company name", default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(rename = "Required technical skills", default, deserialize_with = "lenient_text")]
    pub required_skills: Option<String>,
    #[serde(rename = "Preferred technical skills", default, deserialize_with = "lenient_text")]
    pub preferred_skills: Option<String>,
    #[serde(rename = "Immatrikulation required", default, deserialize_with = "lenient_text")]
    pub immatrikulation: Option<String>,
    #[serde(rename = "Other requirements", default, deserialize_with = "lenient_text")]
    pub other_requirements: Option<String>,
    #[serde(rename = "Job category", default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(rename = "Job URL", default, deserialize_with = "lenient_text")]
    pub job_url: Option<String>,
}

impl JobRecord {
    pub fn field(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Filename => return Some(&self.filename),
            Field::Status => &self.status,
            Field::LastModTime => &self.last_mod_time,
            Field::JobTitle => &self.job_title,
            Field::GermanRequired => &self.german_required,
            Field::TechJob => &self.tech_job,
            Field::Seniority => &self.seniority,
            Field::Company => &self.company,
            Field::Location => &self.location,
            Field::RequiredSkills => &self.required_skills,
            Field::PreferredSkills => &self.preferred_skills,
            Field::Immatrikulation => &self.immatrikulation,
            Field::OtherRequirements => &self.other_requirements,
            Field::Category => &self.category,
            Field::JobUrl => &self.job_url,
        };
        value.as_deref()
    }

    pub fn status_kind(&self) -> Option<Status> {
        self.status.as_deref().and_then(Status::parse)
    }

    /// Origin URL of the posting; the backend fills missing cells with "N/A".
    pub fn external_url(&self) -> Option<&str> {
        self.job_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != "N/A")
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(Status::parse("NEW"), Some(Status::New));
        assert_eq!(Status::parse(" Shortlisted "), Some(Status::Shortlisted));
        assert_eq!(Status::parse("rejected"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn test_status_from_str_error_names_value() {
        let err = "closed".parse::<Status>().unwrap_err();
        assert!(err.contains("closed"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let body = serde_json::to_value(Status::Longlisted).unwrap();
        assert_eq!(body, json!("longlisted"));
    }

    #[test]
    fn test_record_reads_exact_wire_names() {
        let raw = json!({
            "Filename": "acme-backend.html",
            "status": "Viewed",
            "last_mod_time": "2025-01-06T14:05:00Z",
            "Job title": "Backend Engineer",
            "German language fluency required": "no",
            "Is tech job": true,
            "Role seniority": "senior",
            "Company name": "Acme",
            "Location": "Berlin",
            "Required technical skills": "Rust, Postgres",
            "Preferred technical skills": "N/A",
            "Immatrikulation required": false,
            "Other requirements": "",
            "Job category": "Engineering",
            "Job URL": "https://acme.example/jobs/1",
            "unrelated column": 3
        });

        let job: JobRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(job.filename, "acme-backend.html");
        assert_eq!(job.status_kind(), Some(Status::Viewed));
        assert_eq!(job.field(Field::JobTitle), Some("Backend Engineer"));
        assert_eq!(job.field(Field::TechJob), Some("true"));
        assert_eq!(job.field(Field::Immatrikulation), Some("false"));
        assert_eq!(job.field(Field::OtherRequirements), Some(""));
        assert_eq!(job.external_url(), Some("https://acme.example/jobs/1"));
    }

    #[test]
    fn test_record_missing_fields_are_none() {
        let job: JobRecord = serde_json::from_value(json!({ "Filename": "a.html" })).unwrap();
        assert_eq!(job.status, None);
        assert_eq!(job.status_kind(), None);
        assert_eq!(job.field(Field::Company), None);
        assert_eq!(job.field(Field::Filename), Some("a.html"));
    }

    #[test]
    fn test_record_requires_filename() {
        let result: Result<JobRecord, _> = serde_json::from_value(json!({ "status": "new" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_external_url_ignores_placeholder() {
        let mut job = JobRecord {
            filename: "a.html".to_string(),
            job_url: Some("N/A".to_string()),
            ..Default::default()
        };
        assert_eq!(job.external_url(), None);

        job.job_url = Some("  ".to_string());
        assert_eq!(job.external_url(), None);

        job.job_url = None;
        assert_eq!(job.external_url(), None);
    }

    #[test]
    fn test_field_wire_names_match_serde_keys() {
        let job = JobRecord {
            filename: "a.html".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&job).unwrap();
        let object = value.as_object().unwrap();
        for field in Field::ALL {
            assert!(
                object.contains_key(field.wire_name()),
                "missing wire key {}",
                field.wire_name()
            );
        }
        assert_eq!(object.len(), Field::ALL.len());
    }
}
