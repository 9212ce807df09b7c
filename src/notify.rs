/// Render an issue body: the template, an attribution line naming whoever
/// added the collaborator, and a `/cc` line when `cc_list` is non-empty.
/// Sections are separated by a blank line.
pub fn compose(template: &str, actor: &str, cc_list: &str) -> String {
    let mut body = format!(
        "<h3 align=\"center\">{template}</h3>\n\n\
         <p align=\"center\">Collaborator added by: <strong>{actor}</strong></p>\n\n---"
    );

    let cc_list = cc_list.trim();
    if !cc_list.is_empty() {
        body.push_str(&format!("\n\n<h6 align=\"center\">/cc {cc_list}</h6>"));
    }

    body
}
