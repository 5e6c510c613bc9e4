use serde::Deserialize;

/// One line of a newline-delimited generation body.
///
/// Every field is optional: fragments without a `response` (for instance the
/// trailing `done` record) contribute nothing to the answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseFragment {
    #[serde(default)]
    pub response: Option<String>,
}

/// Stage 1: split the body into candidate lines, dropping blank ones.
pub fn split_fragments(body: &str) -> impl Iterator<Item = &str> {
    body.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

/// Stage 2: parse each line on its own. A failure only affects its own line.
pub fn parse_fragments<'a>(
    lines: impl Iterator<Item = &'a str> + 'a,
) -> impl Iterator<Item = Result<ResponseFragment, serde_json::Error>> + 'a {
    lines.map(serde_json::from_str::<ResponseFragment>)
}

/// Stages 3 and 4: keep the fragments that parsed and join their text in order.
pub fn concat_responses(
    fragments: impl Iterator<Item = Result<ResponseFragment, serde_json::Error>>,
) -> String {
    fragments
        .filter_map(Result::ok)
        .filter_map(|fragment| fragment.response)
        .collect()
}

/// Reassemble a pseudo-streamed generation body into one answer.
///
/// Lines that are not valid JSON are skipped rather than reported, so an empty
/// or entirely garbled body yields an empty string.
pub fn reassemble(body: &str) -> String {
    concat_responses(parse_fragments(split_fragments(body)))
}
