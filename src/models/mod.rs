//! Core data models for the budget wizard
//!
//! This module contains the data structures of the wizard domain: the
//! catalog, per-department selections, license inventory, projects, terms
//! acceptance and workflow steps.

pub mod budget;
pub mod catalog;
pub mod company;
pub mod department;
pub mod ids;
pub mod license;
pub mod money;
pub mod project;
pub mod selection;
pub mod terms;
pub mod workflow;

pub use budget::{BudgetSnapshot, Submission, FISCAL_YEAR, HIGH_VALUE_THRESHOLD};
pub use catalog::{
    Catalog, CatalogValidationError, PricingModel, PricingUnit, ServiceDefinition, ServiceKey,
    SupportPackage, TermsDocument,
};
pub use company::{CompanyInfo, CompanyValidationError};
pub use department::Department;
pub use ids::{CustomServiceId, ProjectId};
pub use license::{LicenseRecord, LicenseValidationError};
pub use money::{Money, MoneyParseError};
pub use project::{
    ImplementationProject, Priority, ProjectPatch, ProjectSort, ProjectValidationError, Timeline,
};
pub use selection::{
    CustomServiceEntry, SelectionValidationError, ServiceSelection, SupportExtras,
    EXTRA_REPORT_PRICE, EXTRA_SUPPORT_REQUEST_PRICE, EXTRA_TRAINING_SESSION_PRICE,
};
pub use terms::{
    AcceptOutcome, TermsAcceptanceRecord, TermsLedger, TermsSlot, TermsStatus,
    TermsTransitionError,
};
pub use workflow::WorkflowStep;
