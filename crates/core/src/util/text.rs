/// Join up to `limit` names with `, `, appending `+N more` for the rest
pub fn summarize_names<S: AsRef<str>>(names: &[S], limit: usize) -> String {
    let shown: Vec<&str> = names.iter().take(limit).map(|n| n.as_ref()).collect();
    let mut out = shown.join(", ");
    if names.len() > limit {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(&format!("+{} more", names.len() - limit));
    }
    out
}

/// `1 file`, `2 files`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
