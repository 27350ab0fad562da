use serde::Deserialize;

use super::repo_types::NewMentor;
use crate::validation::{FieldCheck, MissingFields};

/// Request body for `POST /api/mentors`. Every field is optional at the
/// decode step so that absent fields are reported together.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMentorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<String>,
    pub phone: Option<String>,
}

impl CreateMentorRequest {
    pub fn validate(self) -> Result<NewMentor, MissingFields> {
        let mut check = FieldCheck::default();
        let name = check.text("name", self.name);
        let email = check.text("email", self.email);
        let skills = check.list("skills", self.skills);
        let bio = check.text("bio", self.bio);
        let phone = check.text("phone", self.phone);
        check.finish()?;

        Ok(NewMentor {
            name,
            email,
            skills,
            bio,
            phone,
        })
    }
}
