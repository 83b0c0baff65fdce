use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named system-instruction template selectable to steer assistant behavior.
///
/// Built-in personas (`is_custom == false`) are seeded once and can never be
/// deleted or edited through the API. Custom personas are user-created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub teacher_id: String,
    pub name: String,
    pub prompt: String,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Teacher {
    /// A freshly created persona: `created_at == updated_at`.
    #[must_use]
    pub fn new(
        teacher_id: String,
        name: String,
        prompt: String,
        is_custom: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self { teacher_id, name, prompt, is_custom, created_at: now, updated_at: now }
    }
}

/// Wire shape of a persona: timestamps normalized to RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherInfo {
    pub teacher_id: String,
    pub name: String,
    pub prompt: String,
    pub is_custom: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Teacher> for TeacherInfo {
    fn from(teacher: &Teacher) -> Self {
        Self {
            teacher_id: teacher.teacher_id.clone(),
            name: teacher.name.clone(),
            prompt: teacher.prompt.clone(),
            is_custom: teacher.is_custom,
            created_at: teacher.created_at.to_rfc3339(),
            updated_at: teacher.updated_at.to_rfc3339(),
        }
    }
}

/// The three built-in tutor personas seeded at first durable initialization.
///
/// `now` stamps both timestamps; ids are generated by the caller so the seed
/// path controls identity the same way user creation does.
#[must_use]
pub fn builtin_teachers(ids: [String; 3], now: DateTime<Utc>) -> Vec<Teacher> {
    let specs = [
        (
            "Math Mentor",
            "You are a patient mathematics tutor. Work through problems step by step, \
             ask the student to attempt each step before revealing it, and explain the \
             underlying concept behind every rule you use.",
        ),
        (
            "Science Guide",
            "You are an enthusiastic science teacher. Explain physics, chemistry and \
             biology concepts with concrete everyday examples, and encourage the student \
             to predict outcomes before you explain them.",
        ),
        (
            "Writing Coach",
            "You are a supportive writing coach. Help the student structure essays, \
             improve clarity and grammar, and always point out one thing they did well \
             before suggesting improvements.",
        ),
    ];
    ids.into_iter()
        .zip(specs)
        .map(|(id, (name, prompt))| {
            Teacher::new(id, name.to_owned(), prompt.to_owned(), false, now)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_teachers_are_not_custom() {
        let now = Utc::now();
        let ids = ["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let seeds = builtin_teachers(ids, now);
        assert_eq!(seeds.len(), 3);
        assert!(seeds.iter().all(|t| !t.is_custom));
        assert!(seeds.iter().all(|t| !t.prompt.is_empty()));
    }

    #[test]
    fn test_teacher_info_rfc3339() {
        let now = Utc::now();
        let teacher =
            Teacher::new("t-1".to_owned(), "Math Mentor".to_owned(), "p".to_owned(), false, now);
        let info = TeacherInfo::from(&teacher);
        assert_eq!(info.created_at, now.to_rfc3339());
        assert!(!info.is_custom);
    }
}
