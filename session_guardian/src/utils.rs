/// Shorten a credential for log output, keeping only a short prefix.
pub(crate) fn redact_token(token: &str) -> String {
    const VISIBLE: usize = 4;

    if token.chars().count() <= VISIBLE * 2 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(VISIBLE).collect();
    format!("{prefix}***")
}
