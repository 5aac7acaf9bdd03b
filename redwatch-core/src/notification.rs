use crate::types::{Notification, PostRecord};

/// Longest body excerpt included in a notification, in characters.
pub const PREVIEW_CAP: usize = 500;

const PREVIEW_ELLIPSIS: &str = "...";
const PREVIEW_RULE: &str = "----------------------------------------";
const DELETED_AUTHOR: &str = "[deleted]";

/// Builds the alert for a matched post. Pure and deterministic: the same
/// post and matched set always produce byte-identical subject and body.
pub fn format_notification(
    post: &PostRecord,
    matched: &[String],
    recipient: &str,
) -> Notification {
    let keywords = matched.join(", ");
    let subject = format!(
        "Reddit Alert: Found '{}' in r/{}",
        keywords, post.subreddit
    );

    let author = post.author.as_deref().unwrap_or(DELETED_AUTHOR);
    let link = format!("https://reddit.com{}", post.permalink);
    let posted = post.created.format("%Y-%m-%d %H:%M:%S UTC");
    let preview = body_preview(&post.body, PREVIEW_CAP);

    let body = format!(
        "A new Reddit post matching your keywords was found.\n\
         \n\
         Keywords: {keywords}\n\
         Subreddit: r/{subreddit}\n\
         Post Title: {title}\n\
         Author: u/{author}\n\
         Posted: {posted}\n\
         Link: {link}\n\
         \n\
         Post Content Preview:\n\
         {rule}\n\
         {preview}\n\
         {rule}\n\
         \n\
         This is an automated message from the Reddit Monitor Bot.\n",
        keywords = keywords,
        subreddit = post.subreddit,
        title = post.title,
        author = author,
        posted = posted,
        link = link,
        rule = PREVIEW_RULE,
        preview = preview,
    );

    Notification {
        subject,
        body,
        recipient: recipient.to_string(),
    }
}

/// First `cap` characters of `body`, with an ellipsis appended only when
/// text was actually dropped. Counts characters, not bytes, so a multi-byte
/// boundary can never be split.
pub fn body_preview(body: &str, cap: usize) -> String {
    match body.char_indices().nth(cap) {
        None => body.to_string(),
        Some((cut, _)) => format!("{}{}", &body[..cut], PREVIEW_ELLIPSIS),
    }
}
