use prompt_peel::format::{dedent, normalize};

#[test]
fn normalize_cases() {
    let cases = [
        ("", ""),
        ("Test", "Test"),
        ("\n            Test\n            ", "Test"),
        ("\n            Hello\n            World\n            ", "Hello\nWorld"),
        ("No leading spaces", "No leading spaces"),
        ("    Mixed\n  whitespace\n    Indentation", "Mixed\nwhitespace\n  Indentation"),
        ("\tTab\tIndented\n\tLine", "Tab\tIndented\nLine"),
        ("    Only one line with spaces     ", "Only one line with spaces"),
        ("\n\n\n   Leading and trailing newlines   \n\n", "Leading and trailing newlines"),
    ];

    for (input, expected) in cases {
        assert_eq!(normalize(input), expected, "input: {input:?}");
    }
}

#[test]
fn normalize_is_idempotent() {
    let inputs = [
        "",
        "   a\n     b\n   c   ",
        "\n\n  x\n\n  y\n",
        "\t\tdeep\n\t\t\tdeeper\n",
        "8 \n6 ",
        "  \n \t \n",
    ];

    for input in inputs {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "input: {input:?}");
    }
}

#[test]
fn dedent_blank_lines_do_not_limit_margin() {
    assert_eq!(dedent("    a\n\n  \n    b"), "a\n\n\nb");
}

#[test]
fn dedent_keeps_inner_trailing_space() {
    assert_eq!(dedent("\n8 \n6 "), "\n8 \n6 ");
    assert_eq!(normalize("\n8 \n6 "), "8 \n6");
}

#[test]
fn tabs_and_spaces_share_no_margin() {
    assert_eq!(dedent("\ta\n    b"), "\ta\n    b");
}
