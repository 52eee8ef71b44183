//! Property tests for session invariants.

use proptest::prelude::*;

use sessioncraft::domain::foundation::{SessionId, SessionStatus, UserId};
use sessioncraft::domain::session::{Session, SessionFields};

fn fields(title: &str, content: &str, tags: Vec<String>) -> SessionFields {
    SessionFields {
        title: title.to_string(),
        tags,
        json_url: None,
        content: content.to_string(),
        status: SessionStatus::Draft,
    }
}

proptest! {
    /// Construction succeeds iff title and content survive trimming (and
    /// the title fits), regardless of every other field.
    #[test]
    fn creation_requires_trimmed_title_and_content(
        title in "\\PC{0,40}",
        content in "\\PC{0,40}",
        tags in proptest::collection::vec("\\PC{0,10}", 0..5),
    ) {
        let owner = UserId::new("prop-user").unwrap();
        let result = Session::new(SessionId::new(), owner, fields(&title, &content, tags));

        let should_fail = title.trim().is_empty() || content.trim().is_empty();
        prop_assert_eq!(result.is_err(), should_fail);
    }

    /// Whatever the tag input, stored tags are trimmed, non-empty, and
    /// preserve relative order.
    #[test]
    fn tags_are_normalized(
        tags in proptest::collection::vec(" {0,3}\\PC{0,10} {0,3}", 0..8),
    ) {
        let owner = UserId::new("prop-user").unwrap();
        let session = Session::new(
            SessionId::new(),
            owner,
            fields("Title", "Content", tags.clone()),
        )
        .unwrap();

        let expected: Vec<String> = tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        prop_assert_eq!(session.tags(), expected.as_slice());
    }

    /// Ownership is exact: no other identity ever matches.
    #[test]
    fn only_the_exact_owner_matches(
        owner in "[a-z0-9-]{1,20}",
        other in "[a-z0-9-]{1,20}",
    ) {
        let session = Session::new(
            SessionId::new(),
            UserId::new(owner.clone()).unwrap(),
            fields("Title", "Content", vec![]),
        )
        .unwrap();

        let other_id = UserId::new(other.clone()).unwrap();
        prop_assert_eq!(session.is_owner(&other_id), owner == other);
    }

    /// A failed replace leaves the aggregate untouched.
    #[test]
    fn failed_update_is_all_or_nothing(
        bad_title in " {0,5}",
        new_content in "\\PC{1,40}",
    ) {
        let owner = UserId::new("prop-user").unwrap();
        let mut session = Session::new(
            SessionId::new(),
            owner,
            fields("Original", "Original content", vec![]),
        )
        .unwrap();
        let before = session.clone();

        let result = session.replace_fields(fields(&bad_title, &new_content, vec![]));

        prop_assert!(result.is_err());
        prop_assert_eq!(session, before);
    }
}
