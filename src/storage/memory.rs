use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use axum::async_trait;
use time::macros::date;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Entity, StoreError};
use crate::assignments::repo::AssignmentRepository;
use crate::assignments::repo_types::{Assignment, AssignmentError, DanglingPolicy};
use crate::mentors::repo::MentorRepository;
use crate::mentors::repo_types::{Mentor, NewMentor};
use crate::students::repo::StudentRepository;
use crate::students::repo_types::{NewStudent, Student};

#[derive(Default, Clone)]
struct Tables {
    mentors: HashMap<Uuid, Mentor>,
    students: HashMap<Uuid, Student>,
}

/// In-memory store used by tests. Writes can be made to fail on demand.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_mentor_writes: AtomicBool,
    fail_student_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_mentor_writes(&self, fail: bool) {
        self.fail_mentor_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_student_writes(&self, fail: bool) {
        self.fail_student_writes.store(fail, Ordering::SeqCst);
    }

    /// Removes a mentor behind the service's back, leaving dangling references.
    pub fn remove_mentor(&self, id: Uuid) {
        self.lock().mentors.remove(&id);
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn check_write(fail: &AtomicBool) -> Result<(), StoreError> {
    if fail.load(Ordering::SeqCst) {
        return Err(StoreError::Database(sqlx::Error::Protocol(
            "injected write failure".into(),
        )));
    }
    Ok(())
}

fn by_creation(mut students: Vec<Student>) -> Vec<Student> {
    students.sort_by_key(|s| (s.created_at, s.id));
    students
}

/// Complete mentor input with the given email.
pub fn sample_mentor(email: &str) -> NewMentor {
    NewMentor {
        name: "Ada Lovelace".into(),
        email: email.into(),
        skills: vec!["rust".into(), "sql".into()],
        bio: "Writes programs for engines".into(),
        phone: "+44 20 0000 0000".into(),
    }
}

/// Complete student input with the given email.
pub fn sample_student(email: &str) -> NewStudent {
    NewStudent {
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        email: email.into(),
        date_of_birth: date!(2001 - 12 - 09),
        phone: "555-0100".into(),
        courses: vec!["compilers".into()],
    }
}

#[async_trait]
impl MentorRepository for MemoryStore {
    async fn create(&self, new: NewMentor) -> Result<Mentor, StoreError> {
        let mut tables = self.lock();
        if tables.mentors.values().any(|m| m.email == new.email) {
            return Err(StoreError::DuplicateEmail {
                entity: Entity::Mentor,
                email: new.email,
            });
        }
        let now = OffsetDateTime::now_utc();
        let mentor = Mentor {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            skills: new.skills,
            bio: new.bio,
            phone: new.phone,
            students: Default::default(),
            created_at: now,
            updated_at: now,
        };
        tables.mentors.insert(mentor.id, mentor.clone());
        Ok(mentor)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Mentor>, StoreError> {
        Ok(self.lock().mentors.get(&id).cloned())
    }

    async fn list_students_of(&self, mentor_id: Uuid) -> Result<Vec<Student>, StoreError> {
        let tables = self.lock();
        let mentor = tables.mentors.get(&mentor_id).ok_or(StoreError::Missing {
            entity: Entity::Mentor,
            id: mentor_id,
        })?;
        let students = mentor
            .students
            .iter()
            .filter_map(|id| tables.students.get(id).cloned())
            .collect();
        Ok(by_creation(students))
    }
}

#[async_trait]
impl StudentRepository for MemoryStore {
    async fn create(&self, new: NewStudent) -> Result<Student, StoreError> {
        let mut tables = self.lock();
        if tables.students.values().any(|s| s.email == new.email) {
            return Err(StoreError::DuplicateEmail {
                entity: Entity::Student,
                email: new.email,
            });
        }
        let now = OffsetDateTime::now_utc();
        let student = Student {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            date_of_birth: new.date_of_birth,
            phone: new.phone,
            courses: new.courses,
            mentor: None,
            created_at: now,
            updated_at: now,
        };
        tables.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        Ok(self.lock().students.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        Ok(by_creation(self.lock().students.values().cloned().collect()))
    }

    async fn list_without_mentor(&self) -> Result<Vec<Student>, StoreError> {
        let students = self
            .lock()
            .students
            .values()
            .filter(|s| s.mentor.is_none())
            .cloned()
            .collect();
        Ok(by_creation(students))
    }

    async fn get_mentor_of(&self, student_id: Uuid) -> Result<Option<Mentor>, StoreError> {
        let tables = self.lock();
        let student = tables.students.get(&student_id).ok_or(StoreError::Missing {
            entity: Entity::Student,
            id: student_id,
        })?;
        Ok(student.mentor.and_then(|id| tables.mentors.get(&id).cloned()))
    }
}

impl MemoryStore {
    /// Applies a transfer to `t`; the caller discards `t` on error.
    fn stage_transfer(
        &self,
        t: &mut Tables,
        student_id: Uuid,
        mentor_id: Uuid,
        on_dangling: DanglingPolicy,
    ) -> Result<Assignment, AssignmentError> {
        let mut student = t
            .students
            .get(&student_id)
            .cloned()
            .ok_or(AssignmentError::NotFound(Entity::Student))?;
        if !t.mentors.contains_key(&mentor_id) {
            return Err(AssignmentError::NotFound(Entity::Mentor));
        }
        let now = OffsetDateTime::now_utc();

        if let Some(prev_id) = student.mentor.filter(|id| *id != mentor_id) {
            match t.mentors.get_mut(&prev_id) {
                Some(prev) => {
                    if prev.students.remove(&student_id) {
                        check_write(&self.fail_mentor_writes)?;
                        prev.updated_at = now;
                    }
                }
                None => on_dangling.on_missing(student_id, prev_id)?,
            }
        }

        check_write(&self.fail_student_writes)?;
        student.mentor = Some(mentor_id);
        student.updated_at = now;
        t.students.insert(student_id, student.clone());

        check_write(&self.fail_mentor_writes)?;
        let mentor = t.mentors.get_mut(&mentor_id).ok_or(StoreError::Missing {
            entity: Entity::Mentor,
            id: mentor_id,
        })?;
        mentor.students.insert(student_id);
        mentor.updated_at = now;

        Ok(Assignment {
            student,
            mentor: mentor.clone(),
        })
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn transfer(
        &self,
        student_id: Uuid,
        mentor_id: Uuid,
        on_dangling: DanglingPolicy,
    ) -> Result<Assignment, AssignmentError> {
        let mut tables = self.lock();
        let mut staged = (*tables).clone();
        let out = self.stage_transfer(&mut staged, student_id, mentor_id, on_dangling)?;
        *tables = staged;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_mentor_email_is_rejected() {
        let store = MemoryStore::new();
        MentorRepository::create(&store, sample_mentor("ada@example.com"))
            .await
            .expect("first insert");
        let err = MentorRepository::create(&store, sample_mentor("ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateEmail { entity: Entity::Mentor, .. }
        ));
    }

    #[tokio::test]
    async fn same_email_is_allowed_across_entity_types() {
        let store = MemoryStore::new();
        MentorRepository::create(&store, sample_mentor("shared@example.com"))
            .await
            .expect("mentor");
        StudentRepository::create(&store, sample_student("shared@example.com"))
            .await
            .expect("student with a mentor's email");
    }

    #[tokio::test]
    async fn list_students_of_missing_mentor_fails() {
        let store = MemoryStore::new();
        let err = store.list_students_of(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Missing { entity: Entity::Mentor, .. }
        ));
    }

    #[tokio::test]
    async fn get_mentor_of_distinguishes_missing_student_from_no_mentor() {
        let store = MemoryStore::new();
        let student = StudentRepository::create(&store, sample_student("g@example.com"))
            .await
            .expect("student");

        assert_eq!(store.get_mentor_of(student.id).await.expect("lookup"), None);
        let err = store.get_mentor_of(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Missing { entity: Entity::Student, .. }
        ));
    }

    #[tokio::test]
    async fn failed_transfer_leaves_tables_untouched() {
        let store = MemoryStore::new();
        let mentor = MentorRepository::create(&store, sample_mentor("m@example.com"))
            .await
            .expect("mentor");
        let student = StudentRepository::create(&store, sample_student("s@example.com"))
            .await
            .expect("student");

        store.fail_mentor_writes(true);
        let err = store
            .transfer(student.id, mentor.id, DanglingPolicy::Fail)
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::Store(StoreError::Database(_))));
        store.fail_mentor_writes(false);

        let unchanged = StudentRepository::get_by_id(&store, student.id)
            .await
            .expect("get")
            .expect("student exists");
        assert_eq!(unchanged, student);

        let out = store
            .transfer(student.id, mentor.id, DanglingPolicy::Fail)
            .await
            .expect("transfer");
        assert_eq!(out.student.mentor, Some(mentor.id));
        assert!(out.mentor.students.contains(&student.id));
    }
}
