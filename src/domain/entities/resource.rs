#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Permissions,
    Roles,
    Users,
    QuestionGroups,
    Questions,
    TestSets,
    Assignments,
    Submissions,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Permissions,
        Resource::Roles,
        Resource::Users,
        Resource::QuestionGroups,
        Resource::Questions,
        Resource::TestSets,
        Resource::Assignments,
        Resource::Submissions,
    ];

    /// Collection path on the REST backend, also the table key in the local store.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Permissions => "permissions",
            Resource::Roles => "roles",
            Resource::Users => "users",
            Resource::QuestionGroups => "question-groups",
            Resource::Questions => "questions",
            Resource::TestSets => "test-sets",
            Resource::Assignments => "assignments",
            Resource::Submissions => "submissions",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn title(self) -> &'static str {
        match self {
            Resource::Permissions => "Permissions",
            Resource::Roles => "Roles",
            Resource::Users => "Users",
            Resource::QuestionGroups => "Question banks",
            Resource::Questions => "Questions",
            Resource::TestSets => "Test sets",
            Resource::Assignments => "Assignments",
            Resource::Submissions => "Submissions",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Resource::Permissions => "permission",
            Resource::Roles => "role",
            Resource::Users => "user",
            Resource::QuestionGroups => "question bank",
            Resource::Questions => "question",
            Resource::TestSets => "test set",
            Resource::Assignments => "assignment",
            Resource::Submissions => "submission",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(Resource::from_path(resource.path()), Some(resource));
        }
        assert_eq!(Resource::from_path("unknown"), None);
    }
}
