use super::{ServiceError, ServiceResult};

/// Maintains the user-extensible list of category labels.
pub struct CategoryService;

impl CategoryService {
    /// Appends `name` unless an entry with the same name (ignoring case)
    /// exists. Returns whether the list changed.
    pub fn add(categories: &mut Vec<String>, name: &str) -> ServiceResult<bool> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Invalid("Category name must not be empty".into()));
        }
        if Self::contains(categories, trimmed) {
            return Ok(false);
        }
        categories.push(trimmed.to_string());
        Ok(true)
    }

    pub fn contains(categories: &[String], name: &str) -> bool {
        let normalized = name.trim().to_ascii_lowercase();
        categories
            .iter()
            .any(|existing| existing.trim().to_ascii_lowercase() == normalized)
    }

    /// Returns the stored spelling for `name`, falling back to the input.
    pub fn canonical(categories: &[String], name: &str) -> String {
        let normalized = name.trim().to_ascii_lowercase();
        categories
            .iter()
            .find(|existing| existing.trim().to_ascii_lowercase() == normalized)
            .cloned()
            .unwrap_or_else(|| name.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_ignored() {
        let mut categories = vec!["Groceries".to_string()];
        assert!(!CategoryService::add(&mut categories, "groceries ").unwrap());
        assert!(CategoryService::add(&mut categories, "Pets").unwrap());
        assert_eq!(categories, vec!["Groceries", "Pets"]);
        assert_eq!(CategoryService::canonical(&categories, "PETS"), "Pets");
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut categories = Vec::new();
        assert!(CategoryService::add(&mut categories, "   ").is_err());
    }
}
