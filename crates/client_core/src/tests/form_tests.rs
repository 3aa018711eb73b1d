use super::*;
use shared::domain::TaskId;

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

fn ready_form() -> RegistrationFormModel {
    let mut form = RegistrationFormModel::new(vec![Task::new(
        "like",
        "Like the post",
        "https://x.com/p/1",
    )]);
    form.apply(&FormEvent::HandleChanged("ab".into()))
        .expect("handle");
    form.apply(&FormEvent::Gate(GateEvent::LinkVisited(TaskId::new("like"))))
        .expect("visit");
    form.apply(&FormEvent::Gate(GateEvent::ToggleRequested(TaskId::new(
        "like",
    ))))
    .expect("toggle");
    form.apply(&FormEvent::AddressChanged(ZERO_ADDRESS.into()))
        .expect("address");
    form
}

#[test]
fn can_submit_when_all_three_predicates_hold() {
    let form = ready_form();
    assert!(form.can_submit());
    assert_eq!(form.validate(), Ok(()));
}

#[test]
fn breaking_any_single_predicate_disables_submit() {
    let mut short_handle = ready_form();
    short_handle.set_handle(" a ");
    assert!(!short_handle.can_submit());
    assert_eq!(short_handle.validate(), Err(ValidationError::HandleTooShort));

    let mut untoggled = ready_form();
    untoggled
        .apply(&FormEvent::Gate(GateEvent::ToggleRequested(TaskId::new(
            "like",
        ))))
        .expect("untoggle");
    assert!(!untoggled.can_submit());
    assert_eq!(untoggled.validate(), Err(ValidationError::TasksIncomplete));

    let mut bad_address = ready_form();
    bad_address.set_address(format!("0xZZ{}", "0".repeat(38)));
    assert!(!bad_address.can_submit());
    assert_eq!(bad_address.validate(), Err(ValidationError::InvalidAddress));
}

#[test]
fn address_is_trimmed_for_validation() {
    let mut form = ready_form();
    form.set_address(format!("  {ZERO_ADDRESS}\n"));
    assert!(form.can_submit());
}

#[test]
fn draft_lowercases_address_but_field_keeps_typed_case() {
    let mut form = ready_form();
    let typed = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";
    form.set_address(typed);

    let draft = form.build_draft();
    assert_eq!(draft.address, typed.to_ascii_lowercase());
    assert_eq!(form.address(), typed);
}

#[test]
fn draft_truncates_handle_and_quote_url() {
    let mut form = RegistrationFormModel::new(vec![
        Task::new("quote", "Quote", "https://x.com/p/1").requiring_url()
    ]);
    form.set_handle(format!("  {}  ", "h".repeat(120)));
    let quote = TaskId::new("quote");
    form.apply(&FormEvent::Gate(GateEvent::LinkVisited(quote.clone())))
        .expect("visit");
    form.apply(&FormEvent::Gate(GateEvent::UrlEntered {
        task_id: quote,
        url: format!("https://x.com/{}", "q".repeat(600)),
    }))
    .expect("url");

    let draft = form.build_draft();
    assert_eq!(draft.handle.chars().count(), MAX_HANDLE_CHARS);
    assert_eq!(
        draft.quote_url.as_deref().map(|u| u.chars().count()),
        Some(MAX_QUOTE_URL_CHARS)
    );
}

#[test]
fn draft_request_omits_empty_handle() {
    let draft = RegistrationDraft {
        handle: String::new(),
        address: ZERO_ADDRESS.into(),
        quote_url: None,
    };
    let request = draft.to_request();
    assert_eq!(request.handle, None);
    assert_eq!(request.address, ZERO_ADDRESS);
}

#[test]
fn gate_failures_surface_through_form() {
    let mut form = RegistrationFormModel::new(vec![Task::new("like", "Like", "https://x.com")]);
    let err = form
        .apply(&FormEvent::Gate(GateEvent::ToggleRequested(TaskId::new(
            "like",
        ))))
        .expect_err("gated");
    assert_eq!(err, GateError::LinkRequired(TaskId::new("like")));
}

#[test]
fn typing_replaces_connected_address() {
    let mut form = ready_form();
    form.apply(&FormEvent::AddressConnected(ZERO_ADDRESS.into()))
        .expect("connect");
    assert!(form.address_connected());
    form.apply(&FormEvent::AddressChanged("0x".into()))
        .expect("type");
    assert!(!form.address_connected());
}
