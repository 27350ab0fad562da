use serde::Deserialize;

use super::repo_types::NewStudent;
use crate::validation::{FieldCheck, MissingFields};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub courses: Option<Vec<String>>,
}

impl CreateStudentRequest {
    pub fn validate(self) -> Result<NewStudent, MissingFields> {
        let mut check = FieldCheck::default();
        let first_name = check.text("firstName", self.first_name);
        let last_name = check.text("lastName", self.last_name);
        let email = check.text("email", self.email);
        let date_of_birth = check.date("dateOfBirth", self.date_of_birth);
        let phone = check.text("phone", self.phone);
        let courses = check.list("courses", self.courses);
        check.finish()?;

        Ok(NewStudent {
            first_name,
            last_name,
            email,
            date_of_birth,
            phone,
            courses,
        })
    }
}
