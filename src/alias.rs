/// Well-known schedule aliases and their seven-field expressions.
const ALIASES: [(&str, &str); 7] = [
    ("@yearly", "0 0 0 1 1 * *"),
    ("@annually", "0 0 0 1 1 * *"),
    ("@monthly", "0 0 0 1 * * *"),
    ("@weekly", "0 0 0 * * 0 *"),
    ("@daily", "0 0 0 * * * *"),
    ("@midnight", "0 0 0 * * * *"),
    ("@hourly", "0 0 * * * * *"),
];

/// Returns expression of the alias, exact (case-sensitive) match only.
pub(crate) fn expand(input: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find_map(|(alias, expression)| (*alias == input).then_some(*expression))
}
