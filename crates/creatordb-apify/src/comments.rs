//! Commenter aggregation: deduplicating who commented on a post, excluding
//! the post's own author, across nested reply trees.
//!
//! The aggregation mode is a property of the platform. Instagram keeps an
//! occurrence count per commenter; LinkedIn keeps the commenter's cleaned
//! professional headline, overwritten (not accumulated) on repeat occurrence.

use std::collections::BTreeMap;

use creatordb_core::resolver::normalize_username;
use creatordb_core::textnorm;

use crate::types::{InstagramComment, LinkedinCommentItem};

/// Known author aliases that show up in comment payloads under a display
/// name that does not match the post owner's username.
const AUTHOR_ALIAS_DENYLIST: &[&str] = &["artur balicki"];

fn is_excluded(identity: &str, owner: &str) -> bool {
    identity == owner || AUTHOR_ALIAS_DENYLIST.contains(&identity)
}

/// Counts comments per commenter for an Instagram post, recursing into
/// reply trees. The post owner (and deny-listed aliases) never appear as
/// keys; keys are case-normalized usernames.
#[must_use]
pub fn count_instagram_commenters(
    owner_username: &str,
    comments: &[InstagramComment],
) -> BTreeMap<String, i64> {
    let owner = normalize_username(owner_username);
    let mut counts = BTreeMap::new();
    collect_instagram(&mut counts, &owner, comments);
    counts
}

fn collect_instagram(
    counts: &mut BTreeMap<String, i64>,
    owner: &str,
    comments: &[InstagramComment],
) {
    for comment in comments {
        if let Some(raw) = comment.owner_username.as_deref() {
            let identity = normalize_username(raw);
            if !identity.is_empty() && !is_excluded(&identity, owner) {
                *counts.entry(identity).or_insert(0) += 1;
            }
        }
        collect_instagram(counts, owner, &comment.replies);
    }
}

/// Captures commenter headlines for a batch of LinkedIn comments, grouped by
/// the post URN each comment belongs to.
///
/// Headlines pass through the text normalizer; a commenter seen twice on the
/// same post keeps the most recently visited headline. Comments without an
/// author name, headline, or post URN are skipped.
#[must_use]
pub fn capture_linkedin_headlines(
    owner_username: &str,
    items: &[LinkedinCommentItem],
) -> BTreeMap<String, BTreeMap<String, String>> {
    let owner = normalize_username(owner_username);
    let mut by_post = BTreeMap::new();
    collect_linkedin(&mut by_post, &owner, items);
    by_post
}

fn collect_linkedin(
    by_post: &mut BTreeMap<String, BTreeMap<String, String>>,
    owner: &str,
    items: &[LinkedinCommentItem],
) {
    for item in items {
        if let (Some(author), Some(urn)) = (item.author.as_ref(), item.post_input.as_deref()) {
            if let (Some(name), Some(headline)) = (author.name.as_deref(), author.headline.as_deref())
            {
                let identity = normalize_username(name);
                if !identity.is_empty() && !urn.is_empty() && !is_excluded(&identity, owner) {
                    by_post
                        .entry(urn.to_string())
                        .or_default()
                        .insert(identity, textnorm::normalize(headline));
                }
            }
        }
        collect_linkedin(by_post, owner, &item.replies);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkedinCommentAuthor;

    fn ig_comment(username: &str, replies: Vec<InstagramComment>) -> InstagramComment {
        InstagramComment {
            owner_username: Some(username.to_string()),
            text: Some("nice".to_string()),
            replies,
        }
    }

    fn li_comment(
        name: &str,
        headline: &str,
        urn: &str,
        replies: Vec<LinkedinCommentItem>,
    ) -> LinkedinCommentItem {
        LinkedinCommentItem {
            author: Some(LinkedinCommentAuthor {
                name: Some(name.to_string()),
                headline: Some(headline.to_string()),
            }),
            post_input: Some(urn.to_string()),
            replies,
        }
    }

    #[test]
    fn counts_repeat_commenters() {
        let comments = vec![
            ig_comment("alice", vec![]),
            ig_comment("bob", vec![]),
            ig_comment("alice", vec![]),
        ];
        let counts = count_instagram_commenters("jdoe", &comments);
        assert_eq!(counts.get("alice"), Some(&2));
        assert_eq!(counts.get("bob"), Some(&1));
    }

    #[test]
    fn excludes_post_owner_case_insensitively() {
        let comments = vec![ig_comment("JDoe", vec![]), ig_comment("alice", vec![])];
        let counts = count_instagram_commenters("jdoe", &comments);
        assert!(!counts.contains_key("jdoe"));
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn excludes_owner_nested_in_replies() {
        let comments = vec![ig_comment(
            "alice",
            vec![ig_comment("jdoe", vec![ig_comment("bob", vec![])])],
        )];
        let counts = count_instagram_commenters("jdoe", &comments);
        assert!(!counts.contains_key("jdoe"));
        assert_eq!(counts.get("alice"), Some(&1));
        assert_eq!(counts.get("bob"), Some(&1));
    }

    #[test]
    fn excludes_deny_listed_author_alias() {
        let comments = vec![ig_comment("Artur Balicki", vec![]), ig_comment("eve", vec![])];
        let counts = count_instagram_commenters("someone-else", &comments);
        assert!(!counts.contains_key("artur balicki"));
        assert_eq!(counts.get("eve"), Some(&1));
    }

    #[test]
    fn skips_comments_without_username() {
        let comments = vec![InstagramComment {
            owner_username: None,
            text: Some("anon".to_string()),
            replies: vec![],
        }];
        assert!(count_instagram_commenters("jdoe", &comments).is_empty());
    }

    #[test]
    fn headline_capture_groups_by_post_urn() {
        let items = vec![
            li_comment("Alice Smith", "CTO at Example", "111", vec![]),
            li_comment("Bob Jones", "Engineer", "222", vec![]),
        ];
        let by_post = capture_linkedin_headlines("jdoe-99", &items);
        assert_eq!(by_post["111"]["alice smith"], "CTO at Example");
        assert_eq!(by_post["222"]["bob jones"], "Engineer");
    }

    #[test]
    fn headline_overwrites_on_repeat_occurrence() {
        let items = vec![
            li_comment("Alice Smith", "Old Title", "111", vec![]),
            li_comment("Alice Smith", "New Title", "111", vec![]),
        ];
        let by_post = capture_linkedin_headlines("jdoe-99", &items);
        assert_eq!(by_post["111"].len(), 1);
        assert_eq!(by_post["111"]["alice smith"], "New Title");
    }

    #[test]
    fn headline_is_cleaned_before_capture() {
        let items = vec![li_comment(
            "Alice Smith",
            "CTO \u{1F680}\u{1F680}  at\nExample",
            "111",
            vec![],
        )];
        let by_post = capture_linkedin_headlines("jdoe-99", &items);
        assert_eq!(by_post["111"]["alice smith"], "CTO at Example");
    }

    #[test]
    fn headline_capture_excludes_owner_in_nested_replies() {
        let items = vec![li_comment(
            "Alice Smith",
            "CTO",
            "111",
            vec![li_comment("jdoe-99", "Author Headline", "111", vec![])],
        )];
        let by_post = capture_linkedin_headlines("jdoe-99", &items);
        assert!(!by_post["111"].contains_key("jdoe-99"));
    }

    #[test]
    fn headline_capture_skips_incomplete_comments() {
        let items = vec![LinkedinCommentItem {
            author: Some(LinkedinCommentAuthor {
                name: Some("Nameless Headline".to_string()),
                headline: None,
            }),
            post_input: Some("111".to_string()),
            replies: vec![],
        }];
        assert!(capture_linkedin_headlines("jdoe-99", &items).is_empty());
    }
}
