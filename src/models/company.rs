//! Requesting company details collected on the first wizard step

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is asking for the budget
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub company: String,
    /// Requesting department within the company (free text)
    #[serde(default)]
    pub department: String,
    pub contact_person: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl CompanyInfo {
    pub fn new(
        company: impl Into<String>,
        department: impl Into<String>,
        contact_person: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            department: department.into(),
            contact_person: contact_person.into(),
            email: email.into(),
            phone: String::new(),
        }
    }

    /// Check required fields; `known_companies` restricts the company
    /// name when it is non-empty
    pub fn validate(&self, known_companies: &[String]) -> Result<(), CompanyValidationError> {
        if self.company.trim().is_empty() {
            return Err(CompanyValidationError::MissingField("company"));
        }
        if self.department.trim().is_empty() {
            return Err(CompanyValidationError::MissingField("department"));
        }
        if self.contact_person.trim().is_empty() {
            return Err(CompanyValidationError::MissingField("contact person"));
        }
        if self.email.trim().is_empty() {
            return Err(CompanyValidationError::MissingField("email"));
        }
        if !self.email.contains('@') {
            return Err(CompanyValidationError::InvalidEmail(self.email.clone()));
        }
        if !known_companies.is_empty()
            && !known_companies
                .iter()
                .any(|c| c.eq_ignore_ascii_case(self.company.trim()))
        {
            return Err(CompanyValidationError::UnknownCompany(self.company.clone()));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate(&[]).is_ok()
    }
}

impl fmt::Display for CompanyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} <{}>)", self.company, self.contact_person, self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyValidationError {
    MissingField(&'static str),
    InvalidEmail(String),
    UnknownCompany(String),
}

impl fmt::Display for CompanyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Please fill in the {} field", field),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
            Self::UnknownCompany(name) => write!(f, "Unknown company: {}", name),
        }
    }
}

impl std::error::Error for CompanyValidationError {}
