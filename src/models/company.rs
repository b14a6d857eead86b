//! Company model.

use serde::{Deserialize, Serialize};

use super::deserialize_id;

/// A company. `id` is the stable key; `name` is display data that the
/// backend also happens to accept as a lookup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
}

impl Company {
    /// Resolve a company reference that may hold either an id or a name.
    ///
    /// Ids win over names when both could match.
    pub fn resolve<'a>(companies: &'a [Company], reference: &str) -> Option<&'a Company> {
        companies
            .iter()
            .find(|c| c.id == reference)
            .or_else(|| companies.iter().find(|c| c.name == reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(id: &str, name: &str) -> Company {
        Company {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_resolve_prefers_id() {
        let companies = vec![company("1", "Acme"), company("Acme", "Other")];
        assert_eq!(Company::resolve(&companies, "Acme").unwrap().name, "Other");
        assert_eq!(Company::resolve(&companies, "1").unwrap().name, "Acme");
    }

    #[test]
    fn test_resolve_by_name() {
        let companies = vec![company("1", "Acme"), company("2", "Globex")];
        assert_eq!(Company::resolve(&companies, "Globex").unwrap().id, "2");
        assert!(Company::resolve(&companies, "Initech").is_none());
    }
}
