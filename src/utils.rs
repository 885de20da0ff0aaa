/// Convert a string to a sanitized filename
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let mut name = url.replace("http://", "").replace("https://", "");
    name = name.replace(['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'], "_");

    // Limit filename length without splitting a character
    match name.char_indices().nth(100) {
        Some((cut, _)) => name[..cut].to_string(),
        None => name,
    }
}
