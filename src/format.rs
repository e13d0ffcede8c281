//! Whitespace normalization for authored text blocks.
//!
//! Prompts are usually written as indented multi-line literals. A rendered
//! message is dedented and trimmed so the indentation of the source code
//! never reaches the model.

/// Remove the longest common leading whitespace from every line.
///
/// Lines made only of spaces and tabs are ignored when computing the margin
/// and come out empty. Tabs and spaces are not interchangeable: `"\t"` and
/// `"    "` share no margin.
pub fn dedent(text: &str) -> String {
    let margin = text
        .split('\n')
        .filter(|line| !is_blank(line))
        .map(leading_whitespace)
        .reduce(common_prefix)
        .unwrap_or("");

    text.split('\n')
        .map(|line| {
            if is_blank(line) {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dedent, then trim leading and trailing whitespace from the whole block.
///
/// `normalize(&normalize(s)) == normalize(s)` for every input.
pub fn normalize(text: &str) -> String {
    dedent(text).trim().to_string()
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

fn common_prefix<'a>(a: &'a str, b: &'a str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}
