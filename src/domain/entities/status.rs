use crate::errors::AppError;

/// Publication state shared by pages and news items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStatus {
    Published,
    Draft,
    Archived,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Published => "published",
            ContentStatus::Draft => "draft",
            ContentStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "published" => Ok(ContentStatus::Published),
            "draft" => Ok(ContentStatus::Draft),
            "archived" => Ok(ContentStatus::Archived),
            _ => Err(AppError::validation("Invalid status")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramStatus {
    Active,
    Inactive,
    Archived,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramStatus::Active => "active",
            ProgramStatus::Inactive => "inactive",
            ProgramStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "active" => Ok(ProgramStatus::Active),
            "inactive" => Ok(ProgramStatus::Inactive),
            "archived" => Ok(ProgramStatus::Archived),
            _ => Err(AppError::validation("Invalid status")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramLevel {
    Certificate,
    Diploma,
    Degree,
    Masters,
    Phd,
}

impl ProgramLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramLevel::Certificate => "certificate",
            ProgramLevel::Diploma => "diploma",
            ProgramLevel::Degree => "degree",
            ProgramLevel::Masters => "masters",
            ProgramLevel::Phd => "phd",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "certificate" => Ok(ProgramLevel::Certificate),
            "diploma" => Ok(ProgramLevel::Diploma),
            "degree" => Ok(ProgramLevel::Degree),
            "masters" => Ok(ProgramLevel::Masters),
            "phd" => Ok(ProgramLevel::Phd),
            _ => Err(AppError::validation("Invalid level")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "new" => Ok(ContactStatus::New),
            "read" => Ok(ContactStatus::Read),
            "replied" => Ok(ContactStatus::Replied),
            "archived" => Ok(ContactStatus::Archived),
            _ => Err(AppError::validation("Invalid status")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_status_round_trips_and_rejects_unknowns() {
        for s in ["published", "draft", "archived"] {
            assert_eq!(ContentStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(ContentStatus::parse("live").is_err());
        assert!(ContentStatus::parse("").is_err());
    }

    #[test]
    fn program_level_covers_the_full_value_set() {
        for s in ["certificate", "diploma", "degree", "masters", "phd"] {
            assert_eq!(ProgramLevel::parse(s).unwrap().as_str(), s);
        }
        assert!(ProgramLevel::parse("doctorate").is_err());
    }

    #[test]
    fn contact_status_rejects_unknowns() {
        for s in ["new", "read", "replied", "archived"] {
            assert_eq!(ContactStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(ContactStatus::parse("spam").is_err());
    }
}
