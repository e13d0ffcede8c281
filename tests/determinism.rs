use std::thread;

use prompt_peel::node::{min_k, peel, reserve, scope, system_message, top_k, user_message, Chain, Element};
use prompt_peel::selection::{render_priority, ApproxTokenCounter, PromptRenderer};
use prompt_peel::types::{ChatMessage, PromptVersion, RenderResult, Role};

fn sample_chain() -> Chain {
    peel([
        Element::from(reserve(4)),
        Element::from(
            system_message()
                .child("You answer questions about the docs.\n")
                .child(
                    top_k(2)
                        .child(scope().child("\nSection A").priority(30).build().unwrap())
                        .child(scope().child("\nSection B").priority(20).build().unwrap())
                        .child(scope().child("\nSection C").priority(30).build().unwrap())
                        .priority(40)
                        .build()
                        .unwrap(),
                )
                .priority(50)
                .build()
                .unwrap(),
        ),
        Element::from(
            user_message()
                .child(scope().child("Earlier turn. ").priority(5).build().unwrap())
                .child(min_k(1).child("What changed?").build().unwrap())
                .priority(60)
                .build()
                .unwrap(),
        ),
    ])
}

#[test]
fn repeated_renders_are_identical() {
    let chain = sample_chain();
    let renderer = PromptRenderer::new(ApproxTokenCounter);

    for budget in [None, Some(40), Some(25)] {
        let first = renderer.render_detailed(&chain, budget).unwrap();
        let second = renderer.render_detailed(&chain, budget).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string_pretty(&first).unwrap(),
            serde_json::to_string_pretty(&second).unwrap()
        );
    }
}

#[test]
fn unbounded_render_matches_lowest_candidate() {
    let chain = sample_chain();
    let lowest = *chain.priorities().iter().next().unwrap();

    let unbounded = PromptRenderer::default().render(&chain, None).unwrap();
    assert_eq!(unbounded, render_priority(&chain, lowest).unwrap());
    assert_eq!(
        unbounded,
        vec![
            ChatMessage::new(
                Role::System,
                "You answer questions about the docs.\n\nSection A\nSection C"
            ),
            ChatMessage::new(Role::User, "Earlier turn. What changed?"),
        ]
    );
}

#[test]
fn concurrent_renders_agree() {
    let chain = sample_chain();
    let renderer = PromptRenderer::default();
    let expected = renderer.render(&chain, Some(25)).unwrap();

    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| renderer.render(&chain, Some(25)).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn version_tracks_content() {
    let hi = [ChatMessage::new(Role::System, "Hi")];
    let hi_user = [ChatMessage::new(Role::User, "Hi")];
    // Content boundaries matter: ["ab", ""] and ["a", "b"] must differ.
    let split = [
        ChatMessage::new(Role::User, "a"),
        ChatMessage::new(Role::User, "b"),
    ];
    let joined = [
        ChatMessage::new(Role::User, "ab"),
        ChatMessage::new(Role::User, ""),
    ];

    assert_eq!(PromptVersion::from_messages(&hi), PromptVersion::from_messages(&hi));
    assert_ne!(PromptVersion::from_messages(&hi), PromptVersion::from_messages(&hi_user));
    assert_ne!(PromptVersion::from_messages(&split), PromptVersion::from_messages(&joined));
    assert_eq!(
        PromptVersion::from_messages(&[]).as_str(),
        "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn golden_render_result_serialization() {
    let chain = peel([system_message().child("Hi").build().unwrap()]);
    let result = PromptRenderer::default().render_detailed(&chain, None).unwrap();

    let expected = r#"{
  "messages": [
    {
      "role": "system",
      "content": "Hi"
    }
  ],
  "render": {
    "budget": null,
    "threshold": 4294967295,
    "tokens_used": 1,
    "prompt_tokens": 1,
    "reserved_tokens": 0,
    "candidates_considered": 1
  },
  "version": "sha256:7358ac29ead4970cc790c00601b798ac90bc943a7f8e04438c5a58ad1b292ea0"
}"#;

    let json = serde_json::to_string_pretty(&result).unwrap();
    assert_eq!(json, expected, "Golden snapshot mismatch");

    let roundtrip: RenderResult = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtrip, result);
}
