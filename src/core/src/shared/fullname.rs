use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullName {
    pub first_name: String,
    pub last_name: String,
}

impl FullName {
    pub fn new(first_name: String, last_name: String) -> Self {
        FullName {
            first_name,
            last_name,
        }
    }

    /// Key used by the save store: "First Last".
    pub fn key(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Display for FullName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches_display() {
        let name = FullName::new("Molly".to_string(), "Seidel".to_string());

        assert_eq!(name.key(), "Molly Seidel");
        assert_eq!(name.to_string(), name.key());
    }
}
