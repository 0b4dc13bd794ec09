//! CRM vendor routing key

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CadError;

/// A CRM backend the gateway knows how to name
///
/// Knowing a vendor does not mean a service is registered for it; the
/// service factory decides that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Vendor {
    /// ZH CRM, token-endpoint style session ids
    Zh,
    /// Microsoft Dynamics CRM on Office365, composite security tokens
    MsOffice365,
    /// Salesforce
    Salesforce,
}

impl Vendor {
    /// Canonical routing key as sent in the `crmType` header
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Zh => "ZH",
            Vendor::MsOffice365 => "MS",
            Vendor::Salesforce => "SFDC",
        }
    }

    /// Human readable vendor name used in failure messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Zh => "ZH",
            Vendor::MsOffice365 => "MS-CRM",
            Vendor::Salesforce => "Salesforce",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Vendor {
    type Err = CadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZH" => Ok(Vendor::Zh),
            "MS" | "MSCRM" | "MS-CRM" | "MS-OFFICE365" | "MSOFFICE365" => Ok(Vendor::MsOffice365),
            "SFDC" | "SALESFORCE" => Ok(Vendor::Salesforce),
            _ => Err(CadError::routing(s)),
        }
    }
}
