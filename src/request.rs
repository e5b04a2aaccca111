//! Wire-level request descriptors and path template resolution.
//!
//! A [`RequestDescriptor`] is plain data: everything either transport needs
//! to put one request on the wire, with every `{param}` already substituted
//! and the body already encoded. Descriptors are built fresh per call and
//! never shared or reused.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};

use crate::errors::TemplateError;

/// Substitutes every `{name}` placeholder in `template` from `params`.
///
/// A placeholder with no matching parameter fails before any network
/// activity; parameters the template never mentions are ignored. The
/// resolved string contains no placeholder tokens.
pub fn resolve_template(
    template: &str,
    params: &[(&str, &str)],
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            // Unterminated placeholder; report the fragment as the name.
            return Err(TemplateError {
                template: template.to_string(),
                name: after.to_string(),
            });
        };
        let name = &after[..end];
        let value = params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| TemplateError {
                template: template.to_string(),
                name: name.to_string(),
            })?;
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// A fully-resolved request, ready for either transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Absolute URL with all path parameters substituted.
    pub url: Url,
    pub headers: HeaderMap,
    /// Encoded body bytes, absent for body-less requests.
    pub body: Option<Vec<u8>>,
    /// Per-call override; the transport default applies when absent.
    pub timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_every_placeholder() {
        let resolved = resolve_template(
            "/users/{login_name}/clusters/{cluster_id}/deployments",
            &[("login_name", "ada"), ("cluster_id", "c-7")],
        )
        .unwrap();
        assert_eq!(resolved, "/users/ada/clusters/c-7/deployments");
        assert!(!resolved.contains('{') && !resolved.contains('}'));
    }

    #[test]
    fn repeated_placeholders_are_all_substituted() {
        let resolved = resolve_template("/{a}/x/{a}", &[("a", "v")]).unwrap();
        assert_eq!(resolved, "/v/x/v");
    }

    #[test]
    fn missing_parameter_names_the_placeholder() {
        let err = resolve_template(
            "/users/{login_name}/teams/{name}",
            &[("login_name", "ada")],
        )
        .unwrap_err();
        assert_eq!(err.name, "name");
        assert_eq!(err.template, "/users/{login_name}/teams/{name}");
    }

    #[test]
    fn extra_parameters_are_ignored() {
        let resolved =
            resolve_template("/teams/{name}", &[("name", "ml"), ("unused", "x")]).unwrap();
        assert_eq!(resolved, "/teams/ml");
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        assert!(resolve_template("/users/{login", &[("login", "ada")]).is_err());
    }

    #[test]
    fn identical_inputs_build_identical_descriptors() {
        let build = || RequestDescriptor {
            method: Method::POST,
            url: Url::parse("https://llama.modelz.io/api/v1/mosec/llama/inference").unwrap(),
            headers: HeaderMap::new(),
            body: Some(br#"{"x":1}"#.to_vec()),
            timeout: Some(Duration::from_secs(30)),
        };
        assert_eq!(build(), build());
    }
}
