//! Prompt templates for the two generation passes. Pure string building, no
//! I/O; the screenshot itself travels separately as an attachment.

/// Instruction for the first pass: reproduce the screenshot as one
/// self-contained HTML file styled with the named CSS framework.
pub fn build_initial_prompt(framework: &str) -> String {
    format!(
        "Create an HTML file based on the provided image. \
         Include {framework} CSS within the HTML file to style the elements. \
         Make sure the colors used are the same as the original UI. \
         The UI needs to be responsive and mobile-first, matching the original UI \
         as closely as possible. \
         Do not include any explanations or comments. \
         Do not wrap the output in markdown code fences. \
         ONLY return the HTML code with inline CSS."
    )
}

/// Instruction for the second pass: validate the first pass against the image
/// and return an improved version under the same output constraints.
///
/// `initial_html` is embedded verbatim, fence-like substrings included. The
/// model's own output is trusted not to need escaping here.
pub fn build_refinement_prompt(framework: &str, initial_html: &str) -> String {
    format!(
        "Validate the following HTML code based on the provided image and provide a \
         refined version of the HTML code with {framework} CSS that improves accuracy, \
         responsiveness, and adherence to the original design. \
         ONLY return the refined HTML code with inline CSS. \
         Do not wrap the output in markdown code fences. \
         Here is the initial HTML: {initial_html}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_prompt_names_framework() {
        let prompt = build_initial_prompt("Bootstrap");
        assert!(prompt.contains("Bootstrap"));
        assert!(prompt.contains("inline CSS"));
    }

    #[test]
    fn test_initial_prompt_has_no_fence_marker() {
        let prompt = build_initial_prompt("Bootstrap");
        assert!(!prompt.contains("```"));
    }

    #[test]
    fn test_refinement_prompt_embeds_prior_html_verbatim() {
        let initial = "<html><body><h1>Hi</h1></body></html>";
        let prompt = build_refinement_prompt("Bootstrap", initial);
        assert!(prompt.contains(initial));
        assert!(prompt.contains("Bootstrap"));
    }

    #[test]
    fn test_refinement_prompt_passes_fence_like_text_through() {
        let initial = "```html\n<p>unsanitized</p>\n```";
        let prompt = build_refinement_prompt("Tailwind", initial);
        assert!(prompt.contains(initial));
    }
}
