use std::fs;

use prompt_peel::definition::ChainDefinition;
use prompt_peel::node::{peel, scope, system_message, top_k, user_message};
use prompt_peel::selection::PromptRenderer;
use prompt_peel::types::{ChatMessage, InvalidPromptError, PriorityError, PromptError, Role};
use tempfile::tempdir;

const BUDGETED_CHAIN: &str = r#"[
  {"type": "system", "priority": 100, "children": [
    "1",
    {"type": "top_k", "k": 1, "priority": 10, "children": [" 2", " 3"]}
  ]},
  {"type": "user", "priority": 50, "children": [
    {"type": "scope", "priority": 1, "children": ["4 "]},
    {"type": "scope", "priority": 5, "children": ["5"]}
  ]}
]"#;

fn chain_from(json: &str) -> Result<prompt_peel::Chain, PromptError> {
    ChainDefinition::from_json(json)?.into_chain()
}

#[test]
fn definition_builds_the_same_chain_as_builders() {
    let built = peel([
        system_message()
            .child("1")
            .child(top_k(1).child(" 2").child(" 3").priority(10).build().unwrap())
            .priority(100)
            .build()
            .unwrap(),
        user_message()
            .child(scope().child("4 ").priority(1).build().unwrap())
            .child(scope().child("5").priority(5).build().unwrap())
            .priority(50)
            .build()
            .unwrap(),
    ]);

    assert_eq!(chain_from(BUDGETED_CHAIN).unwrap(), built);
}

#[test]
fn definition_renders_under_budget() {
    let chain = chain_from(BUDGETED_CHAIN).unwrap();
    let messages = PromptRenderer::cl100k().unwrap().render(&chain, Some(4)).unwrap();

    assert_eq!(
        messages,
        vec![
            ChatMessage::new(Role::System, "1 2"),
            ChatMessage::new(Role::User, "5"),
        ]
    );
}

#[test]
fn definition_from_file_with_reservations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chain.json");
    fs::write(
        &path,
        r#"[
          {"type": "reserve", "tokens": 256},
          {"type": "assistant", "children": ["Hey!", {"type": "reserve", "tokens": 3}]}
        ]"#,
    )
    .unwrap();

    let chain = ChainDefinition::from_path(&path).unwrap().into_chain().unwrap();
    let result = PromptRenderer::default().render_detailed(&chain, None).unwrap();

    assert_eq!(result.messages, vec![ChatMessage::new(Role::Assistant, "Hey!")]);
    assert_eq!(result.render.reserved_tokens, 259);
}

#[test]
fn unknown_type_is_rejected() {
    let err = chain_from(r#"[{"type": "system", "children": [{"type": "carousel"}]}]"#).unwrap_err();
    match err {
        PromptError::UnknownNode(unknown) => assert_eq!(unknown.0, "carousel"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn text_at_root_is_rejected() {
    let err = chain_from(r#"["loose text"]"#).unwrap_err();
    assert!(matches!(
        err,
        PromptError::InvalidPrompt(InvalidPromptError::NotAllowedAtRoot(ref kind)) if kind == "text"
    ));
}

#[test]
fn scope_at_root_is_rejected() {
    let err = chain_from(r#"[{"type": "scope", "children": ["x"]}]"#).unwrap_err();
    assert!(matches!(
        err,
        PromptError::InvalidPrompt(InvalidPromptError::NotAllowedAtRoot(ref kind)) if kind == "scope"
    ));
}

#[test]
fn nested_message_is_rejected() {
    let err = chain_from(r#"[{"type": "system", "children": [{"type": "user"}]}]"#).unwrap_err();
    assert!(matches!(
        err,
        PromptError::InvalidPrompt(InvalidPromptError::RootOnly(ref kind)) if kind == "user"
    ));
}

#[test]
fn missing_parameters_are_rejected() {
    let err = chain_from(r#"[{"type": "user", "children": [{"type": "top_k", "children": ["a"]}]}]"#)
        .unwrap_err();
    assert!(matches!(
        err,
        PromptError::InvalidPrompt(InvalidPromptError::MissingField { field: "k", .. })
    ));

    let err = chain_from(r#"[{"type": "reserve"}]"#).unwrap_err();
    assert!(matches!(
        err,
        PromptError::InvalidPrompt(InvalidPromptError::MissingField { field: "tokens", .. })
    ));
}

#[test]
fn priority_rules_apply_to_definitions() {
    let err = chain_from(
        r#"[{"type": "system", "priority": 1, "children": [{"type": "scope", "priority": 2}]}]"#,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        PromptError::Priority(PriorityError::ChildExceedsParent { child: 2, parent: 1 })
    ));
}

#[test]
fn malformed_json_is_serialization_error() {
    let err = chain_from(r#"[{"type": "system""#).unwrap_err();
    assert!(matches!(err, PromptError::Serialization(_)));
}
