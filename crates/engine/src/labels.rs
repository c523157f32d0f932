//! The closed label sets a budget entry is classified by.
//!
//! Both sets are fixed: a label that is not listed here is rejected at the
//! boundary instead of being stored as free text. The display strings are
//! the ones the dashboard shows and the exports carry.

use std::fmt;

/// Department owning a budget line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Department {
    DxStrategy,
    ServiceInnovation,
    PlatformInnovation,
    BackOfficeInnovation,
}

impl Department {
    /// Every department, in canonical display order.
    pub const ALL: [Department; 4] = [
        Department::DxStrategy,
        Department::ServiceInnovation,
        Department::PlatformInnovation,
        Department::BackOfficeInnovation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DxStrategy => "DX전략 Core Group",
            Self::ServiceInnovation => "서비스혁신 Core",
            Self::PlatformInnovation => "플랫폼혁신 Core",
            Self::BackOfficeInnovation => "백오피스혁신 Core",
        }
    }

    /// Look a department up by its exact display label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == label)
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.as_str()).collect()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account category (expense type) of a budget line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccountCategory {
    Advertising,
    Communication,
    Fees,
    BankFees,
    ConsultingFees,
    MaintenanceFees,
    RoyaltyFees,
    PartnershipFees,
}

impl AccountCategory {
    /// Every category, in canonical display order.
    pub const ALL: [AccountCategory; 8] = [
        AccountCategory::Advertising,
        AccountCategory::Communication,
        AccountCategory::Fees,
        AccountCategory::BankFees,
        AccountCategory::ConsultingFees,
        AccountCategory::MaintenanceFees,
        AccountCategory::RoyaltyFees,
        AccountCategory::PartnershipFees,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advertising => "광고선전비(이벤트)",
            Self::Communication => "통신비",
            Self::Fees => "지급수수료",
            Self::BankFees => "지급수수료(은행수수료)",
            Self::ConsultingFees => "지급수수료(외부용역,자문료)",
            Self::MaintenanceFees => "지급수수료(유지보수료)",
            Self::RoyaltyFees => "지급수수료(저작료)",
            Self::PartnershipFees => "지급수수료(제휴)",
        }
    }

    /// Look a category up by its exact display label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
