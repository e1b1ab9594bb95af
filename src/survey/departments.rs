use std::fmt;

/// Closed set of departments offered by the check-in form.
///
/// Declaration order is the order used by every per-department breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Executive,
    Corp,
    HumanResources,
    Finance,
    DataOperations,
    PabeTrucking,
    KariyalaManpower,
    EdmSecurity,
    Trimega,
}

impl Department {
    pub const ALL: [Department; 9] = [
        Department::Executive,
        Department::Corp,
        Department::HumanResources,
        Department::Finance,
        Department::DataOperations,
        Department::PabeTrucking,
        Department::KariyalaManpower,
        Department::EdmSecurity,
        Department::Trimega,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Executive => "Executive",
            Department::Corp => "Corp",
            Department::HumanResources => "Human Resources",
            Department::Finance => "Finance",
            Department::DataOperations => "Data Operations",
            Department::PabeTrucking => "PABE Trucking",
            Department::KariyalaManpower => "Kariyala Manpower",
            Department::EdmSecurity => "EDM Security",
            Department::Trimega => "Trimega",
        }
    }

    /// Exact match against the display names; anything else is unknown.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dept| dept.as_str() == value)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_matches_display_names_only() {
        assert_eq!(
            Department::parse("Human Resources"),
            Some(Department::HumanResources)
        );
        assert_eq!(Department::parse("human resources"), None);
        assert_eq!(Department::parse("Other"), None);
    }

    #[test]
    fn every_department_round_trips_through_its_name() {
        for dept in Department::ALL {
            assert_eq!(Department::parse(dept.as_str()), Some(dept));
        }
    }
}
