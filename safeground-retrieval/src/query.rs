/// Site restriction for the credible-domain backend.
pub const CREDIBLE_DOMAINS: &str = "site:.gov OR site:.org OR site:.edu";
/// Site restriction for the encyclopedia backend.
pub const WIKIPEDIA_DOMAIN: &str = "site:wikipedia.org";

/// Removes quote characters so the foveation reads as a plain search query.
pub fn format_query(query: &str) -> String {
    query.replace(['"', '\''], "")
}

/// Page title without the site suffix: `"Lightning - Wikipedia"` -> `"Lightning"`.
pub fn clean_title(title: &str) -> &str {
    let head = title.split('-').next().unwrap_or(title).trim();
    head.split('–').next().unwrap_or(head).trim()
}
