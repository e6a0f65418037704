//! Strings derived from a request: the hashtag line, share text and the
//! download file name.

/// Prefix of every downloaded design.
pub const DOWNLOAD_PREFIX: &str = "lotaya-ai";

/// Join hashtags into one line, each prefixed with `#`.
///
/// Tags are trimmed, a leading `#` already present is not doubled, and empty
/// tags are skipped.
#[must_use]
pub fn hashtag_line<S: AsRef<str>>(hashtags: &[S]) -> String {
    hashtags
        .iter()
        .map(|tag| tag.as_ref().trim().trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Caption and hashtags as one block for the clipboard.
#[must_use]
pub fn share_text<S: AsRef<str>>(caption: &str, hashtags: &[S]) -> String {
    let tags = hashtag_line(hashtags);
    match (caption.trim().is_empty(), tags.is_empty()) {
        (_, true) => caption.to_string(),
        (true, false) => tags,
        (false, false) => format!("{caption}\n\n{tags}"),
    }
}

/// Lowercase `label` and replace every whitespace character with `-`.
#[must_use]
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// File name for a downloaded design, e.g. `lotaya-ai-instagram-post.png`.
#[must_use]
pub fn download_file_name(label: &str, extension: &str) -> String {
    format!("{DOWNLOAD_PREFIX}-{}.{extension}", slugify(label))
}
