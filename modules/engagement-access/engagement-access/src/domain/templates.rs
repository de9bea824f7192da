//! `{placeholder}` substitution for URL path templates.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("no value for placeholder '{0}' in template '{1}'")]
    MissingParam(String, String),

    #[error("unclosed placeholder in template '{0}'")]
    Unclosed(String),
}

/// Substitute every `{name}` in `template` with its percent-encoded value.
///
/// # Errors
///
/// - `MissingParam` if a placeholder has no value in `params`
/// - `Unclosed` for a `{` without a matching `}`
pub fn fill_template(template: &str, params: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| TemplateError::Unclosed(template.to_owned()))?;
        let name = &after[..close];
        let value = params
            .iter()
            .find_map(|(key, value)| (*key == name).then_some(*value))
            .ok_or_else(|| TemplateError::MissingParam(name.to_owned(), template.to_owned()))?;
        out.push_str(&urlencoding::encode(value));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
