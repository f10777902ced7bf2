//! Submission rules for a conference form.

use url::Url;

use crate::form::{ConferenceForm, FormField};

/// Image hosts an icon URI is expected to live on.
pub const DEFAULT_TRUSTED_ICON_DOMAINS: &[&str] =
    &["gstatic.com", "googleusercontent.com", "google.com"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: FormField,
    pub message: String,
}

/// Outcome of validating a form. Only `errors` block submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    trusted_icon_domains: Vec<String>,
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new(DEFAULT_TRUSTED_ICON_DOMAINS.iter().map(|d| d.to_string()))
    }
}

impl Validator {
    pub fn new(trusted_icon_domains: impl IntoIterator<Item = String>) -> Self {
        Validator {
            trusted_icon_domains: trusted_icon_domains
                .into_iter()
                .map(|d| d.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn validate(&self, form: &ConferenceForm) -> Validation {
        let mut validation = Validation::default();

        if form.name.trim().is_empty() {
            validation.errors.push(ValidationIssue {
                field: FormField::Name,
                message: "Conference solution name is required".to_string(),
            });
        }

        if form.entry_point_uri.is_empty() {
            validation.errors.push(ValidationIssue {
                field: FormField::EntryPointUri,
                message: "Video entry point URI is required".to_string(),
            });
        } else if !is_http_uri(&form.entry_point_uri) {
            validation.errors.push(ValidationIssue {
                field: FormField::EntryPointUri,
                message: format!(
                    "Video entry point URI must be an absolute http(s) URI, got '{}'",
                    form.entry_point_uri
                ),
            });
        }

        if let Some(warning) = self.check_icon(&form.icon_uri) {
            validation.warnings.push(warning);
        }

        validation
    }

    /// Icons off the allow-list only warn. A URI that doesn't parse at all
    /// passes without comment.
    fn check_icon(&self, icon_uri: &str) -> Option<String> {
        if icon_uri.is_empty() {
            return None;
        }
        let url = Url::parse(icon_uri).ok()?;

        match url.host_str() {
            Some(host) if self.is_trusted(host) => None,
            Some(host) => Some(format!(
                "Icon host '{}' is not a trusted image host ({})",
                host,
                self.trusted_icon_domains.join(", ")
            )),
            None => Some(format!("Icon URI '{}' has no host", icon_uri)),
        }
    }

    fn is_trusted(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.trusted_icon_domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
    }
}

/// Matches `^https?://` and parses as an absolute URL with a host.
pub fn is_http_uri(uri: &str) -> bool {
    if !(uri.starts_with("http://") || uri.starts_with("https://")) {
        return false;
    }
    Url::parse(uri)
        .map(|u| u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, uri: &str, icon: &str) -> ConferenceForm {
        ConferenceForm {
            name: name.into(),
            entry_point_uri: uri.into(),
            icon_uri: icon.into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_form_passes() {
        let v = Validator::default().validate(&form("Meet", "https://meet.example/x", ""));
        assert!(v.is_valid());
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn empty_name_fails() {
        let v = Validator::default().validate(&form("", "https://meet.example/x", ""));
        assert!(!v.is_valid());
        assert_eq!(v.errors[0].field, FormField::Name);
    }

    #[test]
    fn uri_must_be_http() {
        for uri in ["", "meet.example/x", "ftp://meet.example/x", "HTTPS://x", "https://"] {
            let v = Validator::default().validate(&form("Meet", uri, ""));
            assert!(!v.is_valid(), "{uri} should be rejected");
            assert_eq!(v.errors[0].field, FormField::EntryPointUri);
        }
        assert!(is_http_uri("http://localhost:8080/room"));
    }

    #[test]
    fn untrusted_icon_only_warns() {
        let v = Validator::default().validate(&form(
            "Meet",
            "https://meet.example/x",
            "https://evil.example/icon.png",
        ));
        assert!(v.is_valid());
        assert_eq!(v.warnings.len(), 1);
        assert!(v.warnings[0].contains("evil.example"));
    }

    #[test]
    fn trusted_icon_subdomain_passes() {
        let v = Validator::default().validate(&form(
            "Meet",
            "https://meet.example/x",
            "https://fonts.gstatic.com/s/i/productlogos/meet.png",
        ));
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn unparsable_icon_passes_silently() {
        let v = Validator::default().validate(&form("Meet", "https://meet.example/x", "not a uri"));
        assert!(v.is_valid());
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn custom_allow_list() {
        let validator = Validator::new(vec![".cdn.example".to_string()]);
        let v = validator.validate(&form(
            "Meet",
            "https://meet.example/x",
            "https://img.cdn.example/icon.png",
        ));
        assert!(v.warnings.is_empty());
    }
}
