//! Company allowlist and the company filter.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllowlistError {
    #[error("failed to read company list {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse company list {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Company names whose postings are of interest.
///
/// Entries are stored lowercased; matching is substring containment, so the
/// entry `"Acme"` matches the company `"Acme Corp"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyAllowlist {
    entries: Vec<String>,
}

impl CompanyAllowlist {
    /// Build an allowlist from company names. Blank names are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { entries }
    }

    /// Load an allowlist from a JSON file containing an array of strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON string array.
    pub fn load(path: &Path) -> Result<Self, AllowlistError> {
        let content = std::fs::read_to_string(path).map_err(|e| AllowlistError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content).map_err(|e| AllowlistError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Parse an allowlist from a JSON array of strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON string array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::new(names))
    }

    /// Whether the company name contains any allowlisted name.
    #[must_use]
    pub fn matches(&self, company: &str) -> bool {
        if company.is_empty() {
            return false;
        }
        let company = company.to_lowercase();
        self.entries.iter().any(|entry| company.contains(entry.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        let allowlist = CompanyAllowlist::new(["Globex"]);
        assert!(allowlist.matches("Globex Systems"));
        assert!(!allowlist.matches("Hooli"));
    }

    #[test]
    fn test_case_insensitive() {
        let allowlist = CompanyAllowlist::new(["acme"]);
        assert!(allowlist.matches("ACME Corp"));
        assert!(allowlist.matches("Big acme"));

        let allowlist = CompanyAllowlist::new(["ACME"]);
        assert!(allowlist.matches("acme corp"));
    }

    #[test]
    fn test_empty_company_never_matches() {
        let allowlist = CompanyAllowlist::new(["Acme", "Globex"]);
        assert!(!allowlist.matches(""));
    }

    #[test]
    fn test_blank_entries_dropped() {
        let allowlist = CompanyAllowlist::new(["", "  ", "Initech"]);
        assert_eq!(allowlist.len(), 1);
        assert!(!allowlist.matches("Hooli"));
        assert!(allowlist.matches("Initech"));
    }

    #[test]
    fn test_empty_allowlist_matches_nothing() {
        let allowlist = CompanyAllowlist::default();
        assert!(allowlist.is_empty());
        assert!(!allowlist.matches("Acme Corp"));
    }

    #[test]
    fn test_from_json() {
        let allowlist = CompanyAllowlist::from_json(r#"["Acme", "Globex"]"#).unwrap();
        assert_eq!(allowlist.len(), 2);
        assert!(allowlist.matches("Globex Systems"));

        assert!(CompanyAllowlist::from_json(r#"{"companies": []}"#).is_err());
        assert!(CompanyAllowlist::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CompanyAllowlist::load(Path::new("/nonexistent/companyList.json")).unwrap_err();
        assert!(matches!(err, AllowlistError::Read { .. }));
    }
}
