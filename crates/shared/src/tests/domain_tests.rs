use super::*;

#[test]
fn truncate_counts_characters_not_bytes() {
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("ab", 5), "ab");
    assert_eq!(truncate_chars("", 0), "");
}

#[test]
fn clean_submission_trims_clips_and_drops_empty_fields() {
    let long_handle = "h".repeat(150);
    let clean = CleanSubmission::from_raw(
        "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        Some(&format!("  {long_handle}  ")),
        Some("   "),
    )
    .expect("valid");
    assert_eq!(clean.address.as_str(), format!("0x{}", "a".repeat(40)));
    assert_eq!(clean.handle.as_deref().map(str::len), Some(MAX_HANDLE_CHARS));
    assert_eq!(clean.quote_url, None);
}

#[test]
fn clean_submission_rejects_bad_address() {
    let err = CleanSubmission::from_raw("0xnope", Some("ab"), None).expect_err("invalid");
    assert!(matches!(err, AddressError::WrongLength(6)));
}

#[test]
fn task_builder_sets_url_requirement() {
    let task = Task::new("quote", "Quote the post", "https://x.com/post/1").requiring_url();
    assert!(task.requires_url);
    assert_eq!(task.id.as_str(), "quote");
}
